use crate::{
    foundation::core::{Generations, MAX_ADDRESSABLE_GENERATIONS},
    foundation::error::{BloodlineError, BloodlineResult},
    pedigree::tree::AncestorNode,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Cell position for the right-expanding table.
pub struct TabularSlot {
    /// In-order row of the node within the full binary tree.
    pub row: u64,
    /// Generation, root at column 0.
    pub column: u32,
    /// First sheet row of the band this node spans. A leaf at the layout depth spans one row.
    pub band_first: u64,
    /// Last sheet row (inclusive) of the band this node spans.
    pub band_last: u64,
}

impl TabularSlot {
    pub fn band_len(&self) -> u64 {
        self.band_last - self.band_first + 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Row/column projection of an ancestry tree.
///
/// A node at depth `d` with path index `i` sits at in-order row `(2i + 1) * 2^(g-d) - 1`, so
/// sire subtrees stay above dam subtrees, each subtree's rows are contiguous, and every parent
/// row is the mean of its children's rows. Sheet bands are `[i * 2^(g-d), (i + 1) * 2^(g-d) - 1]`,
/// so a `g`-generation table needs `2^g` sheet rows.
pub struct TabularLayout {
    generations: Generations,
}

impl TabularLayout {
    pub fn new(generations: Generations) -> BloodlineResult<Self> {
        if generations.get() > MAX_ADDRESSABLE_GENERATIONS {
            return Err(BloodlineError::layout(format!(
                "tabular layout supports at most {MAX_ADDRESSABLE_GENERATIONS} generations (got {generations})"
            )));
        }
        Ok(Self { generations })
    }

    pub fn generations(&self) -> Generations {
        self.generations
    }

    pub fn columns(&self) -> u32 {
        self.generations.get() + 1
    }

    /// Sheet rows covered by the root band.
    pub fn total_rows(&self) -> u64 {
        1u64 << self.generations.get()
    }

    pub fn slot_for(&self, node: &AncestorNode) -> BloodlineResult<TabularSlot> {
        let g = self.generations.get();
        let d = node.path.depth();
        if d > g {
            return Err(BloodlineError::layout(format!(
                "node at depth {d} is deeper than the layout ({g} generations)"
            )));
        }
        let i = node.path.index();
        let band = 1u64 << (g - d);
        Ok(TabularSlot {
            row: (2 * i + 1) * band - 1,
            column: d,
            band_first: i * band,
            band_last: (i + 1) * band - 1,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/tabular.rs"]
mod tests;
