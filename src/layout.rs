pub mod circular;
pub mod tabular;

use crate::{
    foundation::core::Generations,
    foundation::error::BloodlineResult,
    layout::circular::{CircularLayout, CircularSlot},
    layout::tabular::{TabularLayout, TabularSlot},
    pedigree::tree::AncestorNode,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Tabular,
    Circular,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
/// Geometric position of one node for the chosen projection.
pub enum Slot {
    Tabular(TabularSlot),
    Circular(CircularSlot),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Either projection behind one `slot_for` entry point.
pub enum Layout {
    Tabular(TabularLayout),
    Circular(CircularLayout),
}

impl Layout {
    pub fn new(mode: LayoutMode, generations: Generations) -> BloodlineResult<Self> {
        Ok(match mode {
            LayoutMode::Tabular => Layout::Tabular(TabularLayout::new(generations)?),
            LayoutMode::Circular => Layout::Circular(CircularLayout::new(generations)?),
        })
    }

    pub fn mode(&self) -> LayoutMode {
        match self {
            Layout::Tabular(_) => LayoutMode::Tabular,
            Layout::Circular(_) => LayoutMode::Circular,
        }
    }

    pub fn slot_for(&self, node: &AncestorNode) -> BloodlineResult<Slot> {
        match self {
            Layout::Tabular(l) => l.slot_for(node).map(Slot::Tabular),
            Layout::Circular(l) => l.slot_for(node).map(Slot::Circular),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/layout/mode.rs"]
mod tests;
