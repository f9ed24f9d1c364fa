use crate::{
    foundation::core::Generations,
    foundation::error::BloodlineResult,
    layout::{Layout, LayoutMode},
    pedigree::inbreeding::InbreedingReport,
    pedigree::record::HorseRecord,
    pedigree::store::PedigreeRecordStore,
    pedigree::tree::{AncestorNode, AncestryTreeBuilder},
};

#[derive(Clone, Debug, serde::Serialize)]
/// Everything a renderer needs for one individual: tree, repeat report, depth.
pub struct PedigreeChart {
    pub root_key: String,
    pub generations: Generations,
    pub tree: AncestorNode,
    pub inbreeding: InbreedingReport,
}

impl PedigreeChart {
    /// Build tree and inbreeding report for `root_key`.
    #[tracing::instrument(skip(store))]
    pub fn prepare(
        store: &PedigreeRecordStore,
        root_key: &str,
        max_generations: i64,
    ) -> BloodlineResult<Self> {
        let generations = Generations::new(max_generations)?;
        Ok(Self::prepare_with(store, root_key, generations))
    }

    pub fn prepare_with(
        store: &PedigreeRecordStore,
        root_key: &str,
        generations: Generations,
    ) -> Self {
        let tree = AncestryTreeBuilder::new(store).build_to(root_key, generations);
        let inbreeding = InbreedingReport::from_tree(&tree);
        Self {
            root_key: root_key.to_owned(),
            generations,
            tree,
            inbreeding,
        }
    }

    pub fn layout(&self, mode: LayoutMode) -> BloodlineResult<Layout> {
        Layout::new(mode, self.generations)
    }

    pub fn root_record(&self) -> Option<&HorseRecord> {
        self.tree.record.as_ref()
    }

    /// Record behind a repeated key, looked up at its first position in the tree.
    pub fn record_for(&self, primary_key: &str) -> Option<&HorseRecord> {
        let entry = self.inbreeding.get(primary_key)?;
        self.tree.find(entry.first_occurrence())?.record.as_ref()
    }
}

#[cfg(test)]
#[path = "../tests/unit/chart.rs"]
mod tests;
