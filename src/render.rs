pub mod circle;
pub mod html;
pub mod label;
pub mod settings;
pub mod table;
pub mod xlsx;

use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{BloodlineError, BloodlineResult};

#[derive(Clone, Debug)]
/// Rasterised RGBA8 image, row-major, 4 bytes per pixel.
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn from_pixmap(pixmap: resvg::tiny_skia::Pixmap) -> Self {
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            data: pixmap.take(),
            premultiplied: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha image for encoders.
    pub fn to_rgba_image(&self) -> BloodlineResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            demultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data).ok_or_else(|| {
            BloodlineError::render(format!(
                "frame buffer does not match {}x{}",
                self.width, self.height
            ))
        })
    }

    pub fn save_png(&self, path: &Path) -> BloodlineResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../tests/unit/render/frame.rs"]
mod tests;
