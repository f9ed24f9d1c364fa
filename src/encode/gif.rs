use std::path::Path;

use anyhow::Context;
use image::{
    Delay, Frame,
    codecs::gif::{GifEncoder, Repeat},
};
use rayon::prelude::*;

use crate::{
    animation::rotation::RotationSequence,
    foundation::error::{BloodlineError, BloodlineResult},
    render::FrameRGBA,
    render::circle::CircularChart,
    render::settings::AnimationSettings,
};

/// NeuQuant speed passed to the encoder (1 best, 30 fastest).
const GIF_SPEED: i32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct GifConfig {
    pub delay_ms: u32,
    /// Retry with fewer frames while the output is larger than this.
    pub max_bytes: usize,
    /// Worker threads for frame rendering; `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl GifConfig {
    pub fn from_settings(animation: &AnimationSettings) -> Self {
        Self {
            delay_ms: animation.frame_delay_ms(),
            max_bytes: animation.max_bytes(),
            threads: None,
        }
    }

    pub fn validate(&self) -> BloodlineResult<()> {
        if self.delay_ms == 0 {
            return Err(BloodlineError::invalid_argument("gif frame delay must be > 0"));
        }
        if self.max_bytes == 0 {
            return Err(BloodlineError::invalid_argument("gif size budget must be > 0"));
        }
        if self.threads == Some(0) {
            return Err(BloodlineError::invalid_argument(
                "gif 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct GifOutcome {
    pub bytes: Vec<u8>,
    pub frames: usize,
    /// Decimation step that produced `bytes`.
    pub step: u32,
}

impl GifOutcome {
    pub fn write_to(&self, path: &Path) -> BloodlineResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("write gif '{}'", path.display()))?;
        Ok(())
    }
}

/// Encode already rendered frames as an infinitely looping GIF.
pub fn encode_gif(frames: &[FrameRGBA], delay_ms: u32) -> BloodlineResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(BloodlineError::encode("gif needs at least one frame"));
    }
    let mut buf = Vec::new();
    {
        let mut encoder = new_encoder(&mut buf)?;
        for frame in frames {
            encoder
                .encode_frame(gif_frame(frame, delay_ms)?)
                .context("encode gif frame")?;
        }
    }
    Ok(buf)
}

/// Spin the disc through `sequence` and encode it, thinning frames until the file fits
/// `config.max_bytes` or only two frames remain.
#[tracing::instrument(skip(chart, config), fields(frames = sequence.base_frames()))]
pub fn render_rotating_gif(
    chart: &CircularChart,
    sequence: RotationSequence,
    config: &GifConfig,
) -> BloodlineResult<GifOutcome> {
    config.validate()?;
    let svg = chart.disc_svg();
    chart.parse_svg(&svg)?;
    let pool = build_thread_pool(config.threads)?;
    let chunk_len = pool.current_num_threads().max(1) * 2;

    let mut step = sequence.step();
    loop {
        let seq = sequence.decimated(step);
        let angles = seq.angles();
        let bytes = encode_angles(chart, &svg, &angles, config.delay_ms, &pool, chunk_len)?;
        tracing::debug!(step, frames = angles.len(), bytes = bytes.len(), "encoded gif attempt");
        if bytes.len() <= config.max_bytes || angles.len() <= 2 {
            if bytes.len() > config.max_bytes {
                tracing::warn!(
                    bytes = bytes.len(),
                    max_bytes = config.max_bytes,
                    "gif still exceeds the size budget at the minimum frame count"
                );
            }
            return Ok(GifOutcome {
                bytes,
                frames: angles.len(),
                step,
            });
        }
        step += 1;
    }
}

fn encode_angles(
    chart: &CircularChart,
    svg: &str,
    angles: &[f64],
    delay_ms: u32,
    pool: &rayon::ThreadPool,
    chunk_len: usize,
) -> BloodlineResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = new_encoder(&mut buf)?;
        for chunk in angles.chunks(chunk_len) {
            for frame in render_chunk(chart, svg, chunk, pool)? {
                encoder
                    .encode_frame(gif_frame(&frame, delay_ms)?)
                    .context("encode gif frame")?;
            }
        }
    }
    Ok(buf)
}

fn render_chunk(
    chart: &CircularChart,
    svg: &str,
    angles: &[f64],
    pool: &rayon::ThreadPool,
) -> BloodlineResult<Vec<FrameRGBA>> {
    let rendered = pool.install(|| {
        angles
            .par_iter()
            .map_init(
                || chart.parse_svg(svg).map_err(|e| format!("{e:#}")),
                |tree, angle| -> BloodlineResult<FrameRGBA> {
                    let tree = tree.as_ref().map_err(|msg| {
                        BloodlineError::render(format!("worker failed to parse chart svg: {msg}"))
                    })?;
                    chart.rasterize(tree, *angle)
                },
            )
            .collect::<Vec<_>>()
    });
    rendered.into_iter().collect()
}

fn new_encoder(buf: &mut Vec<u8>) -> BloodlineResult<GifEncoder<&mut Vec<u8>>> {
    let mut encoder = GifEncoder::new_with_speed(buf, GIF_SPEED);
    encoder
        .set_repeat(Repeat::Infinite)
        .context("set gif repeat")?;
    Ok(encoder)
}

fn gif_frame(frame: &FrameRGBA, delay_ms: u32) -> BloodlineResult<Frame> {
    Ok(Frame::from_parts(
        frame.to_rgba_image()?,
        0,
        0,
        Delay::from_numer_denom_ms(delay_ms, 1),
    ))
}

fn build_thread_pool(threads: Option<usize>) -> BloodlineResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BloodlineError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
