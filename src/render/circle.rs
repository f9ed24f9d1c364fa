use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use kurbo::{BezPath, Point, Vec2};

use crate::{
    chart::PedigreeChart,
    foundation::error::{BloodlineError, BloodlineResult},
    layout::circular::{CircularLayout, CircularSlot},
    pedigree::inbreeding::InbreedingSide,
    pedigree::record::Sex,
    pedigree::tree::AncestorNode,
    render::FrameRGBA,
    render::label::{
        COMPACT_LABEL_GENERATION, escape_markup, inbreeding_summary, title_label, wedge_label,
        wrap_summary,
    },
    render::settings::ChartSettings,
    render::table::CellFill,
};

const ARC_TOLERANCE: f64 = 0.1;

/// Outer rings from [`COMPACT_LABEL_GENERATION`] on are widened by this much (unit radius).
const EXTRA_RING_WIDTH: f64 = 0.012;

/// Labels switch from tangential to radial at this ring.
const RADIAL_LABEL_RING: u32 = 5;

const EDGE_PT: f64 = 0.5;
const INBRED_EDGE_PT: f64 = 1.2;
const TITLE_PT: f64 = 12.0;
const SUMMARY_PT: f64 = 10.0;
const MIN_LABEL_PT: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
/// One annular sector of the chart.
pub struct Wedge {
    pub primary_key: Option<String>,
    pub slot: CircularSlot,
    /// Radii in pixels from the disc centre.
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub fill: CellFill,
    /// Inbreeding side when the ancestor is flagged.
    pub edge: Option<InbreedingSide>,
    pub label: String,
    pub font_px: f64,
}

/// Ring radii on a unit disc, scaled to pixels.
#[derive(Clone, Copy, Debug)]
struct RingGeometry {
    generations: u32,
    center: f64,
    px_per_unit: f64,
    /// Typographic points to pixels.
    px_per_pt: f64,
}

impl RingGeometry {
    fn new(generations: u32, size_px: u32) -> Self {
        let g = f64::from(generations);
        let limit = 1.05 + EXTRA_RING_WIDTH * f64::from(generations.saturating_sub(7));
        let figure_inches = (2.0 + 1.3 * g).max(8.0);
        let size = f64::from(size_px);
        Self {
            generations,
            center: size * 0.5,
            px_per_unit: size * 0.5 / limit,
            px_per_pt: size / (72.0 * figure_inches),
        }
    }

    fn outer_unit(&self, ring: u32) -> f64 {
        let base = f64::from(ring) / f64::from(self.generations);
        if ring >= COMPACT_LABEL_GENERATION {
            base + EXTRA_RING_WIDTH * f64::from(ring - 7)
        } else {
            base
        }
    }

    fn inner_unit(&self, ring: u32) -> f64 {
        let base = f64::from(ring.saturating_sub(1)) / f64::from(self.generations);
        if ring >= COMPACT_LABEL_GENERATION {
            base + EXTRA_RING_WIDTH * f64::from(ring - COMPACT_LABEL_GENERATION)
        } else {
            base
        }
    }

    fn label_font_px(
        &self,
        label: &str,
        ring: u32,
        inner_unit: f64,
        outer_unit: f64,
        sweep_deg: f64,
    ) -> f64 {
        let base_pt = (11.0 / 2f64.powi(ring as i32 - 1)).max(0.3);
        let thickness = (outer_unit - inner_unit).max(0.001);
        let arc_len = (sweep_deg.to_radians() * (inner_unit + outer_unit) * 0.5).max(0.001);
        let char_width = label.chars().count().max(1) as f64 * 0.06;
        let scale = 1f64.min(arc_len / char_width).min(thickness / 0.08);
        (base_pt * scale).max(MIN_LABEL_PT) * self.px_per_pt
    }

    /// Screen point for a chart angle (degrees counter-clockwise from the top).
    fn point(&self, radius_px: f64, angle_deg: f64) -> Point {
        let t = angle_deg.to_radians();
        Point::new(self.center - radius_px * t.sin(), self.center - radius_px * t.cos())
    }
}

/// Circular pedigree: rings of wedges around the queried individual, sire half on the left.
pub struct CircularChart {
    size_px: u32,
    geometry: RingGeometry,
    title: String,
    summary: String,
    wedges: Vec<Wedge>,
    settings: ChartSettings,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl CircularChart {
    #[tracing::instrument(skip(chart, settings), fields(root = %chart.root_key))]
    pub fn new(chart: &PedigreeChart, settings: &ChartSettings) -> BloodlineResult<Self> {
        if chart.generations.get() < 1 {
            return Err(BloodlineError::invalid_argument(
                "the circular chart needs at least 1 generation",
            ));
        }
        let layout = CircularLayout::new(chart.generations)?;
        let geometry = RingGeometry::new(chart.generations.get(), settings.image_size_px);

        let mut wedges = Vec::new();
        for node in chart.tree.walk() {
            if node.path.depth() == 0 || (!node.is_known() && node.unresolved_key.is_none()) {
                continue;
            }
            let slot = layout.slot_for(node)?;
            let inner_unit = geometry.inner_unit(slot.ring);
            let outer_unit = geometry.outer_unit(slot.ring);
            let label = node_wedge_label(node);
            let font_px =
                geometry.label_font_px(&label, slot.ring, inner_unit, outer_unit, slot.sweep_deg);
            wedges.push(Wedge {
                primary_key: node.primary_key().map(str::to_owned),
                slot,
                inner_radius: inner_unit * geometry.px_per_unit,
                outer_radius: outer_unit * geometry.px_per_unit,
                fill: wedge_fill(node),
                edge: node
                    .primary_key()
                    .and_then(|k| chart.inbreeding.flag_for(k)),
                label,
                font_px,
            });
        }
        tracing::debug!(wedges = wedges.len(), "laid out circular chart");

        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();

        Ok(Self {
            size_px: settings.image_size_px,
            geometry,
            title: title_label(&chart.tree),
            summary: inbreeding_summary(chart),
            wedges,
            settings: settings.clone(),
            fontdb: Arc::new(fontdb),
        })
    }

    pub fn wedges(&self) -> &[Wedge] {
        &self.wedges
    }

    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    /// Square SVG with the disc only.
    pub fn disc_svg(&self) -> String {
        let size = self.size_px;
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        );
        self.push_disc(&mut out);
        out.push_str("</svg>\n");
        out
    }

    /// Disc with the title above and the wrapped inbreeding summary below.
    pub fn poster_svg(&self) -> String {
        let size = f64::from(self.size_px);
        let title_px = TITLE_PT * self.geometry.px_per_pt;
        let summary_px = SUMMARY_PT * self.geometry.px_per_pt;
        let line_px = summary_px * 1.3;
        let max_chars = ((size / summary_px) * 1.6).max(60.0) as usize;
        let lines = wrap_summary(&self.summary, max_chars);

        let top = (title_px * 2.5).ceil();
        let bottom = (line_px * (lines.len() as f64 + 1.0)).ceil();
        let height = size + top + bottom;
        let family = escape_markup(&self.settings.font_family);

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{height}" viewBox="0 0 {size} {height}">"#
        );
        let _ = writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" font-family="{family}" font-size="{title_px:.2}" font-weight="bold" text-anchor="middle">{}</text>"#,
            size * 0.5,
            top - title_px * 0.8,
            escape_markup(&self.title)
        );
        let _ = writeln!(out, r#"<g transform="translate(0 {top})">"#);
        self.push_disc(&mut out);
        out.push_str("</g>\n");
        for (i, line) in lines.iter().enumerate() {
            let _ = writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" font-family="{family}" font-size="{summary_px:.2}" text-anchor="middle">{}</text>"#,
                size * 0.5,
                top + size + line_px * (i as f64 + 1.0),
                escape_markup(line)
            );
        }
        out.push_str("</svg>\n");
        out
    }

    /// Parse an SVG produced by this chart, resolving fonts from the system.
    pub fn parse_svg(&self, svg: &str) -> BloodlineResult<usvg::Tree> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts).context("parse chart svg")?;
        Ok(tree)
    }

    /// Rasterise a parsed disc rotated by `angle_deg` (counter-clockwise positive) about its
    /// centre, over a white background.
    pub fn rasterize(&self, tree: &usvg::Tree, angle_deg: f64) -> BloodlineResult<FrameRGBA> {
        let size = tree.size();
        let (w, h) = (size.width().ceil() as u32, size.height().ceil() as u32);
        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| BloodlineError::render(format!("failed to allocate {w}x{h} pixmap")))?;
        pixmap.fill(resvg::tiny_skia::Color::WHITE);

        let c = self.geometry.center as f32;
        let xform = if angle_deg == 0.0 {
            resvg::tiny_skia::Transform::identity()
        } else {
            resvg::tiny_skia::Transform::from_rotate_at(-angle_deg as f32, c, c)
        };
        resvg::render(tree, xform, &mut pixmap.as_mut());
        Ok(FrameRGBA::from_pixmap(pixmap))
    }

    pub fn render_disc(&self, angle_deg: f64) -> BloodlineResult<FrameRGBA> {
        let tree = self.parse_svg(&self.disc_svg())?;
        self.rasterize(&tree, angle_deg)
    }

    pub fn render_poster(&self) -> BloodlineResult<FrameRGBA> {
        let tree = self.parse_svg(&self.poster_svg())?;
        self.rasterize(&tree, 0.0)
    }

    /// Write `<base>.png` (poster) and `<base>_circle.png` (disc only).
    pub fn write_pngs(&self, base: &Path) -> BloodlineResult<(PathBuf, PathBuf)> {
        let poster_path = base.with_extension("png");
        let stem = base
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                BloodlineError::invalid_argument(format!(
                    "output path '{}' has no file name",
                    base.display()
                ))
            })?;
        let disc_path = base.with_file_name(format!("{stem}_circle.png"));

        self.render_poster()?.save_png(&poster_path)?;
        self.render_disc(0.0)?.save_png(&disc_path)?;
        tracing::info!(poster = %poster_path.display(), disc = %disc_path.display(), "wrote circular chart");
        Ok((poster_path, disc_path))
    }

    fn push_disc(&self, out: &mut String) {
        let colors = &self.settings.colors;
        let family = escape_markup(&self.settings.font_family);
        let center = Point::new(self.geometry.center, self.geometry.center);

        for wedge in &self.wedges {
            let fill = match wedge.fill {
                CellFill::Male => &colors.male_fill,
                CellFill::Female => &colors.female_fill,
                CellFill::Unknown | CellFill::Plain => &colors.unknown_fill,
            };
            let (edge, edge_pt) = match wedge.edge {
                Some(InbreedingSide::Sire) => (&colors.inbred_sire_side, INBRED_EDGE_PT),
                Some(InbreedingSide::Dam) => (&colors.inbred_dam_side, INBRED_EDGE_PT),
                Some(InbreedingSide::Both) => (&colors.inbred_both_sides, INBRED_EDGE_PT),
                None => (&colors.wedge_edge, EDGE_PT),
            };
            let path = wedge_path(
                center,
                wedge.inner_radius,
                wedge.outer_radius,
                wedge.slot.start_deg,
                wedge.slot.sweep_deg,
            );
            let _ = writeln!(
                out,
                r#"<path d="{}" fill="{fill}" stroke="{edge}" stroke-width="{:.2}"/>"#,
                path.to_svg(),
                edge_pt * self.geometry.px_per_pt
            );
        }

        // Labels after all wedges so neighbouring fills never cover them.
        for wedge in &self.wedges {
            if wedge.label.is_empty() {
                continue;
            }
            push_label(out, &self.geometry, wedge, &family);
        }
    }
}

fn push_label(out: &mut String, geometry: &RingGeometry, wedge: &Wedge, family: &str) {
    let Some(mid) = wedge.slot.angle_deg() else {
        return;
    };
    let radius = (wedge.inner_radius + wedge.outer_radius) * 0.5;
    let at = geometry.point(radius, mid);
    let rotation = upright(if wedge.slot.ring >= RADIAL_LABEL_RING {
        -(mid + 90.0)
    } else {
        -mid
    });

    let lines: Vec<&str> = wedge.label.lines().collect();
    let line_px = wedge.font_px * 1.2;
    let first_dy = wedge.font_px * 0.35 - line_px * (lines.len() as f64 - 1.0) * 0.5;

    let _ = write!(
        out,
        r#"<text x="{x:.2}" y="{y:.2}" font-family="{family}" font-size="{:.2}" text-anchor="middle" transform="rotate({rotation:.2} {x:.2} {y:.2})">"#,
        wedge.font_px,
        x = at.x,
        y = at.y,
    );
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { first_dy } else { line_px };
        let _ = write!(
            out,
            r#"<tspan x="{:.2}" dy="{dy:.2}">{}</tspan>"#,
            at.x,
            escape_markup(line)
        );
    }
    out.push_str("</text>\n");
}

/// Normalise a clockwise text rotation into `(-90, 90]` so labels never read upside down.
fn upright(rotation_deg: f64) -> f64 {
    let mut r = rotation_deg.rem_euclid(360.0);
    if r > 180.0 {
        r -= 360.0;
    }
    if r > 90.0 {
        r -= 180.0;
    } else if r <= -90.0 {
        r += 180.0;
    }
    r
}

fn node_wedge_label(node: &AncestorNode) -> String {
    match (&node.record, &node.unresolved_key) {
        (Some(rec), _) => wedge_label(rec, node.path.depth()),
        (None, Some(key)) => key.clone(),
        (None, None) => String::new(),
    }
}

/// Wedges are coloured by recorded sex only; unknown sex stays grey.
fn wedge_fill(node: &AncestorNode) -> CellFill {
    match node.record.as_ref().map(|r| r.sex) {
        Some(Sex::Male) => CellFill::Male,
        Some(Sex::Female) => CellFill::Female,
        _ => CellFill::Unknown,
    }
}

/// Annular sector between two radii. Chart angles run counter-clockwise from the top; on
/// screen that is `phi = -(theta + 90deg)` in kurbo's y-down convention.
fn wedge_path(center: Point, inner: f64, outer: f64, start_deg: f64, sweep_deg: f64) -> BezPath {
    let phi0 = -(start_deg + 90.0).to_radians();
    let dphi = -sweep_deg.to_radians();
    let at = |r: f64, phi: f64| center + Vec2::from_angle(phi) * r;

    let mut path = BezPath::new();
    path.move_to(at(outer, phi0));
    let outer_arc = kurbo::Arc {
        center,
        radii: Vec2::new(outer, outer),
        start_angle: phi0,
        sweep_angle: dphi,
        x_rotation: 0.0,
    };
    path.extend(outer_arc.append_iter(ARC_TOLERANCE));
    if inner > 0.0 {
        path.line_to(at(inner, phi0 + dphi));
        let inner_arc = kurbo::Arc {
            center,
            radii: Vec2::new(inner, inner),
            start_angle: phi0 + dphi,
            sweep_angle: -dphi,
            x_rotation: 0.0,
        };
        path.extend(inner_arc.append_iter(ARC_TOLERANCE));
    } else {
        path.line_to(center);
    }
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/render/circle.rs"]
mod tests;
