use std::fmt;

use crate::foundation::error::{BloodlineError, BloodlineResult};

/// Highest generation count the layouts can address with 64-bit slot indices.
pub const MAX_ADDRESSABLE_GENERATIONS: u32 = 62;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Number of ancestor generations to expand below the queried individual.
///
/// `Generations(0)` is the individual alone, `Generations(1)` adds sire and dam.
pub struct Generations(pub u32);

impl Generations {
    /// Validate a raw (possibly negative) request.
    pub fn new(requested: i64) -> BloodlineResult<Self> {
        if requested < 0 {
            return Err(BloodlineError::invalid_argument(format!(
                "max generations must be >= 0 (got {requested})"
            )));
        }
        let value = u32::try_from(requested).map_err(|_| {
            BloodlineError::invalid_argument(format!("max generations too large: {requested}"))
        })?;
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl fmt::Display for Generations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
/// Which parent link a path step follows.
pub enum ParentSide {
    /// Father; always expanded and laid out first.
    Sire,
    /// Mother.
    Dam,
}

impl ParentSide {
    fn bit(self) -> u64 {
        match self {
            ParentSide::Sire => 0,
            ParentSide::Dam => 1,
        }
    }

    fn letter(self) -> char {
        match self {
            ParentSide::Sire => 'S',
            ParentSide::Dam => 'D',
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
/// Sequence of parent steps from the root to a node.
pub struct AncestorPath(Vec<ParentSide>);

impl AncestorPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_steps(steps: impl IntoIterator<Item = ParentSide>) -> Self {
        Self(steps.into_iter().collect())
    }

    /// Path extended by one step.
    pub fn child(&self, side: ParentSide) -> Self {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.extend_from_slice(&self.0);
        steps.push(side);
        Self(steps)
    }

    pub fn depth(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn steps(&self) -> &[ParentSide] {
        &self.0
    }

    /// First step from the root; `None` for the root itself.
    pub fn side(&self) -> Option<ParentSide> {
        self.0.first().copied()
    }

    /// Last step, i.e. which parent of its child this node is.
    pub fn last(&self) -> Option<ParentSide> {
        self.0.last().copied()
    }

    /// Position among all `2^depth` slots of the same depth, sire before dam.
    ///
    /// Only meaningful up to 64 steps; layouts reject deeper trees earlier.
    pub fn index(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, side| (acc << 1) | side.bit())
    }

    /// `true` when `self` is a strict prefix of `other` (an ancestor position of `other`'s descendant chain).
    pub fn is_strict_prefix_of(&self, other: &AncestorPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for AncestorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("-");
        }
        for side in &self.0 {
            write!(f, "{}", side.letter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
