use crate::foundation::error::{BloodlineError, BloodlineResult};

/// Clockwise full turn in chart degrees (counter-clockwise positive).
pub const CLOCKWISE_TURN_DEG: f64 = -360.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Evenly spaced rotation angles for spinning the circular chart.
///
/// Angles share the chart convention: degrees counter-clockwise, 0 at the top where the sire
/// half begins. Frame 0 is always the unrotated chart.
pub struct RotationSequence {
    frames: u32,
    sweep_deg: f64,
    step: u32,
}

impl RotationSequence {
    pub fn new(frames: u32, sweep_deg: f64) -> BloodlineResult<Self> {
        if frames == 0 {
            return Err(BloodlineError::invalid_argument(
                "rotation needs at least one frame",
            ));
        }
        if !sweep_deg.is_finite() {
            return Err(BloodlineError::invalid_argument(
                "rotation sweep must be finite",
            ));
        }
        Ok(Self {
            frames,
            sweep_deg,
            step: 1,
        })
    }

    /// One clockwise turn lasting `seconds` at `fps`.
    pub fn from_timing(seconds: f64, fps: u32) -> BloodlineResult<Self> {
        if fps == 0 {
            return Err(BloodlineError::invalid_argument("fps must be > 0"));
        }
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(BloodlineError::invalid_argument(
                "rotation seconds must be finite and >= 0",
            ));
        }
        let frames = ((seconds * f64::from(fps)).floor() as u32).max(1);
        Self::new(frames, CLOCKWISE_TURN_DEG)
    }

    /// Keep every `step`-th frame of the full sequence.
    pub fn decimated(self, step: u32) -> Self {
        Self {
            step: step.max(1),
            ..self
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Frames of the undecimated sequence.
    pub fn base_frames(&self) -> u32 {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.div_ceil(self.step) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn angles(&self) -> Vec<f64> {
        (0..self.frames)
            .step_by(self.step as usize)
            .map(|i| self.sweep_deg * f64::from(i) / f64::from(self.frames))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/rotation.rs"]
mod tests;
