use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;

use crate::foundation::error::{BloodlineError, BloodlineResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Chart appearance and animation knobs, loadable from JSON.
///
/// Every field is optional in the file; missing ones take the defaults below.
pub struct ChartSettings {
    #[serde(default)]
    pub colors: ChartColors,
    /// Spreadsheet column width in character units.
    #[serde(default = "default_column_width")]
    pub column_width: f64,
    /// Edge length of the square circular chart in pixels.
    #[serde(default = "default_image_size_px")]
    pub image_size_px: u32,
    /// Font family requested for chart labels.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub animation: AnimationSettings,
}

fn default_column_width() -> f64 {
    26.0
}

fn default_image_size_px() -> u32 {
    1600
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            colors: ChartColors::default(),
            column_width: default_column_width(),
            image_size_px: default_image_size_px(),
            font_family: default_font_family(),
            animation: AnimationSettings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// `#RRGGBB` colours.
pub struct ChartColors {
    pub male_fill: String,
    pub female_fill: String,
    pub unknown_fill: String,
    pub wedge_edge: String,
    pub inbred_sire_side: String,
    pub inbred_dam_side: String,
    pub inbred_both_sides: String,
    /// Border for repeated ancestors in the spreadsheet and HTML table.
    pub inbred_cell_border: String,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            male_fill: "#DDEBF7".to_string(),
            female_fill: "#FCE4EC".to_string(),
            unknown_fill: "#F2F2F2".to_string(),
            wedge_edge: "#FFFFFF".to_string(),
            inbred_sire_side: "#1F4E9E".to_string(),
            inbred_dam_side: "#FF0000".to_string(),
            inbred_both_sides: "#800080".to_string(),
            inbred_cell_border: "#FF0000".to_string(),
        }
    }
}

impl ChartColors {
    fn all(&self) -> [(&'static str, &str); 8] {
        [
            ("male_fill", self.male_fill.as_str()),
            ("female_fill", self.female_fill.as_str()),
            ("unknown_fill", self.unknown_fill.as_str()),
            ("wedge_edge", self.wedge_edge.as_str()),
            ("inbred_sire_side", self.inbred_sire_side.as_str()),
            ("inbred_dam_side", self.inbred_dam_side.as_str()),
            ("inbred_both_sides", self.inbred_both_sides.as_str()),
            ("inbred_cell_border", self.inbred_cell_border.as_str()),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Seconds per full rotation.
    pub seconds: f64,
    pub fps: u32,
    /// Upper bound for the encoded GIF, in MiB.
    pub max_mb: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            seconds: 8.0,
            fps: 24,
            max_mb: 15.0,
        }
    }
}

impl AnimationSettings {
    pub fn max_bytes(&self) -> usize {
        (self.max_mb * 1024.0 * 1024.0) as usize
    }

    /// Per-frame delay in whole milliseconds.
    pub fn frame_delay_ms(&self) -> u32 {
        1000 / self.fps.max(1)
    }
}

impl ChartSettings {
    /// Read settings JSON from disk and validate it.
    pub fn load(path: &Path) -> BloodlineResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open chart settings '{}'", path.display()))?;
        let settings: ChartSettings = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse chart settings '{}'", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> BloodlineResult<()> {
        for (name, value) in self.colors.all() {
            parse_hex_rgb(value).map_err(|_| {
                BloodlineError::invalid_argument(format!(
                    "colour '{name}' must be #RRGGBB (got '{value}')"
                ))
            })?;
        }
        if !(self.column_width.is_finite() && self.column_width > 0.0) {
            return Err(BloodlineError::invalid_argument(
                "column_width must be > 0",
            ));
        }
        if !(64..=16_384).contains(&self.image_size_px) {
            return Err(BloodlineError::invalid_argument(
                "image_size_px must be within 64..=16384",
            ));
        }
        if self.font_family.trim().is_empty() {
            return Err(BloodlineError::invalid_argument(
                "font_family must not be empty",
            ));
        }
        let a = &self.animation;
        if a.fps == 0 {
            return Err(BloodlineError::invalid_argument("animation fps must be > 0"));
        }
        if !(a.seconds.is_finite() && a.seconds >= 0.0) {
            return Err(BloodlineError::invalid_argument(
                "animation seconds must be >= 0",
            ));
        }
        if !(a.max_mb.is_finite() && a.max_mb > 0.0) {
            return Err(BloodlineError::invalid_argument(
                "animation max_mb must be > 0",
            ));
        }
        Ok(())
    }
}

/// Parse `#RRGGBB` (leading `#` optional) into `0xRRGGBB`.
pub fn parse_hex_rgb(value: &str) -> BloodlineResult<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BloodlineError::invalid_argument(format!(
            "invalid colour '{value}'"
        )));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|e| BloodlineError::invalid_argument(format!("invalid colour '{value}': {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/settings.rs"]
mod tests;
