use std::collections::HashMap;

use crate::{
    foundation::core::{AncestorPath, ParentSide},
    pedigree::tree::AncestorNode,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
/// Which half of the pedigree the repeated occurrences come from.
pub enum InbreedingSide {
    Sire,
    Dam,
    Both,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// An ancestor found at more than one tree position.
pub struct InbreedingEntry {
    pub primary_key: String,
    /// Positions in pre-order (sire before dam).
    pub occurrences: Vec<AncestorPath>,
}

impl InbreedingEntry {
    pub fn first_occurrence(&self) -> &AncestorPath {
        &self.occurrences[0]
    }

    /// Generation of each occurrence, in traversal order.
    pub fn generations(&self) -> Vec<u32> {
        self.occurrences.iter().map(AncestorPath::depth).collect()
    }

    /// Sum of `0.5^generation` over all occurrences, as a percentage.
    pub fn contribution_percent(&self) -> f64 {
        self.occurrences
            .iter()
            .map(|p| 0.5f64.powi(p.depth() as i32))
            .sum::<f64>()
            * 100.0
    }

    pub fn side(&self) -> InbreedingSide {
        let mut sire = false;
        let mut dam = false;
        for side in self.occurrences.iter().filter_map(AncestorPath::side) {
            match side {
                ParentSide::Sire => sire = true,
                ParentSide::Dam => dam = true,
            }
        }
        match (sire, dam) {
            (true, false) => InbreedingSide::Sire,
            (false, true) => InbreedingSide::Dam,
            _ => InbreedingSide::Both,
        }
    }
}

/// Finds primary keys that occur at more than one node of a built tree.
pub struct InbreedingDetector;

impl InbreedingDetector {
    /// Duplicated ancestors ordered by their first occurrence in pre-order.
    ///
    /// Identity is the primary key only: the root reappearing in its own ancestry is reported
    /// like any other repeat.
    #[tracing::instrument(skip(tree))]
    pub fn detect(tree: &AncestorNode) -> Vec<InbreedingEntry> {
        let mut order = Vec::<(&str, Vec<AncestorPath>)>::new();
        let mut slot_by_key = HashMap::<&str, usize>::new();

        for node in tree.walk() {
            let Some(key) = node.primary_key() else {
                continue;
            };
            match slot_by_key.get(key) {
                Some(&slot) => order[slot].1.push(node.path.clone()),
                None => {
                    slot_by_key.insert(key, order.len());
                    order.push((key, vec![node.path.clone()]));
                }
            }
        }

        let entries: Vec<InbreedingEntry> = order
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(key, occurrences)| InbreedingEntry {
                primary_key: key.to_owned(),
                occurrences,
            })
            .collect();
        tracing::debug!(duplicates = entries.len(), "detected repeated ancestors");
        entries
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Detector output plus the flags renderers need.
pub struct InbreedingReport {
    entries: Vec<InbreedingEntry>,
    subsumed: Vec<bool>,
}

impl InbreedingReport {
    pub fn from_tree(tree: &AncestorNode) -> Self {
        Self::from_entries(InbreedingDetector::detect(tree))
    }

    pub fn from_entries(entries: Vec<InbreedingEntry>) -> Self {
        let subsumed = (0..entries.len())
            .map(|idx| is_subsumed(&entries, idx))
            .collect();
        Self { entries, subsumed }
    }

    pub fn entries(&self) -> &[InbreedingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, primary_key: &str) -> Option<&InbreedingEntry> {
        self.entries.iter().find(|e| e.primary_key == primary_key)
    }

    /// `true` when every occurrence of the entry lies below an occurrence of another repeated
    /// ancestor, i.e. it only repeats because that descendant repeats.
    pub fn is_subsumed(&self, primary_key: &str) -> bool {
        self.entries
            .iter()
            .position(|e| e.primary_key == primary_key)
            .is_some_and(|idx| self.subsumed[idx])
    }

    /// Entries that charts should highlight, in first-occurrence order.
    pub fn flagged(&self) -> impl Iterator<Item = &InbreedingEntry> {
        self.entries
            .iter()
            .zip(&self.subsumed)
            .filter(|(_, subsumed)| !**subsumed)
            .map(|(e, _)| e)
    }

    /// Highlight side for a node's key, if the key is flagged.
    pub fn flag_for(&self, primary_key: &str) -> Option<InbreedingSide> {
        self.flagged()
            .find(|e| e.primary_key == primary_key)
            .map(InbreedingEntry::side)
    }

    /// Flagged entries by descending contribution; ties keep first-occurrence order.
    pub fn by_contribution(&self) -> Vec<&InbreedingEntry> {
        let mut out: Vec<&InbreedingEntry> = self.flagged().collect();
        out.sort_by(|a, b| b.contribution_percent().total_cmp(&a.contribution_percent()));
        out
    }
}

fn is_subsumed(entries: &[InbreedingEntry], idx: usize) -> bool {
    let target = &entries[idx];
    entries.iter().enumerate().any(|(other_idx, other)| {
        other_idx != idx
            && target.occurrences.iter().all(|occ| {
                other
                    .occurrences
                    .iter()
                    .any(|pos| pos.is_strict_prefix_of(occ))
            })
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pedigree/inbreeding.rs"]
mod tests;
