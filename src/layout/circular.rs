use crate::{
    foundation::core::{Generations, MAX_ADDRESSABLE_GENERATIONS, ParentSide},
    foundation::error::{BloodlineError, BloodlineResult},
    pedigree::tree::AncestorNode,
};

/// Degrees of the full turn shared by the two halves.
pub const FULL_TURN_DEG: f64 = 360.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Ring and angular span for the radial chart.
///
/// Angles are degrees counter-clockwise from the top of the chart. Sire ancestry fills
/// `[0, 180)`, dam ancestry `[180, 360)`.
pub struct CircularSlot {
    pub ring: u32,
    pub start_deg: f64,
    pub sweep_deg: f64,
}

impl CircularSlot {
    /// Midpoint of the span; the root (ring 0) is the centre and has no angle.
    pub fn angle_deg(&self) -> Option<f64> {
        (self.ring > 0).then(|| self.start_deg + self.sweep_deg * 0.5)
    }

    pub fn end_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg
    }
}

/// Which angular half holds each parent side.
pub fn half_range_deg(side: ParentSide) -> (f64, f64) {
    match side {
        ParentSide::Sire => (0.0, FULL_TURN_DEG * 0.5),
        ParentSide::Dam => (FULL_TURN_DEG * 0.5, FULL_TURN_DEG),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Ring/angle projection of an ancestry tree.
///
/// Every parent's span is split equally between its two child slots, sire first, so the
/// ordering matches [`crate::TabularLayout`] top-to-bottom.
pub struct CircularLayout {
    generations: Generations,
}

impl CircularLayout {
    pub fn new(generations: Generations) -> BloodlineResult<Self> {
        if generations.get() > MAX_ADDRESSABLE_GENERATIONS {
            return Err(BloodlineError::layout(format!(
                "circular layout supports at most {MAX_ADDRESSABLE_GENERATIONS} generations (got {generations})"
            )));
        }
        Ok(Self { generations })
    }

    pub fn generations(&self) -> Generations {
        self.generations
    }

    /// Number of rings outside the centre.
    pub fn rings(&self) -> u32 {
        self.generations.get()
    }

    pub fn slot_for(&self, node: &AncestorNode) -> BloodlineResult<CircularSlot> {
        let d = node.path.depth();
        if d > self.generations.get() {
            return Err(BloodlineError::layout(format!(
                "node at depth {d} is outside the chart ({} rings)",
                self.generations
            )));
        }
        let sweep = FULL_TURN_DEG / (1u64 << d) as f64;
        Ok(CircularSlot {
            ring: d,
            start_deg: node.path.index() as f64 * sweep,
            sweep_deg: sweep,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/circular.rs"]
mod tests;
