use std::{
    collections::{HashMap, HashSet},
    io::Read,
    path::Path,
};

use anyhow::Context;

use crate::{
    foundation::core::Generations,
    foundation::error::{BloodlineError, BloodlineResult},
    pedigree::record::{CsvRow, HorseRecord},
};

#[derive(Clone, Debug, Default)]
/// Read-only lookup from primary key to horse record.
///
/// Built once per invocation and passed explicitly to the tree builder, so tests can build
/// several stores side by side.
pub struct PedigreeRecordStore {
    records: HashMap<String, HorseRecord>,
}

impl PedigreeRecordStore {
    /// Build a store from records; a later record replaces an earlier one with the same key.
    pub fn from_records(records: impl IntoIterator<Item = HorseRecord>) -> Self {
        let mut map = HashMap::new();
        for r in records {
            map.insert(r.primary_key.clone(), r);
        }
        Self { records: map }
    }

    /// Load `bloodline.csv`-style data from disk.
    #[tracing::instrument]
    pub fn load_csv(path: &Path) -> BloodlineResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read record file '{}'", path.display()))?;
        let store = Self::from_csv_reader(text.as_bytes())?;
        tracing::debug!(records = store.len(), "loaded pedigree records");
        Ok(store)
    }

    /// Parse CSV with a header row. A leading UTF-8 BOM is ignored.
    pub fn from_csv_reader<R: Read>(mut reader: R) -> BloodlineResult<Self> {
        let mut raw = String::new();
        reader
            .read_to_string(&mut raw)
            .context("read record csv as utf-8")?;
        let text = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = csv_reader.headers().context("read csv header row")?;
        if !headers.iter().any(|h| h.trim() == "PrimaryKey") {
            return Err(BloodlineError::data("csv header has no 'PrimaryKey' column"));
        }

        let mut records = Vec::new();
        for (idx, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            // +2: header line and 1-based numbering.
            let row = row.with_context(|| format!("parse csv line {}", idx + 2))?;
            if let Some(rec) = row.into_record() {
                records.push(rec);
            }
        }
        Ok(Self::from_records(records))
    }

    pub fn get(&self, primary_key: &str) -> Option<&HorseRecord> {
        self.records.get(primary_key)
    }

    pub fn contains(&self, primary_key: &str) -> bool {
        self.records.contains_key(primary_key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Longest chain of known ancestors above `primary_key`, in generations.
    ///
    /// A link back to a horse already on the current chain counts as a leaf, so
    /// self-referencing data still yields a finite answer.
    pub fn lineage_depth(&self, primary_key: &str) -> u32 {
        let mut memo = HashMap::<&str, u32>::new();
        let mut on_chain = HashSet::<&str>::new();
        let mut stack = Vec::<DepthFrame<'_>>::new();

        let mut finished = self.enter_depth(primary_key, &mut memo, &mut on_chain, &mut stack);
        while let Some(frame) = stack.last_mut() {
            if let Some(parent_depth) = finished.take() {
                frame.depth = frame.depth.max(1 + parent_depth);
            }
            if let Some(parent) = frame.next_parent() {
                finished = self.enter_depth(parent, &mut memo, &mut on_chain, &mut stack);
                continue;
            }
            let Some(done) = stack.pop() else {
                break;
            };
            on_chain.remove(done.key);
            memo.insert(done.key, done.depth);
            finished = Some(done.depth);
        }
        finished.unwrap_or(0)
    }

    /// Resolves `key` immediately when possible, otherwise pushes a frame and returns `None`.
    fn enter_depth<'a>(
        &'a self,
        key: &'a str,
        memo: &mut HashMap<&'a str, u32>,
        on_chain: &mut HashSet<&'a str>,
        stack: &mut Vec<DepthFrame<'a>>,
    ) -> Option<u32> {
        if let Some(&d) = memo.get(key) {
            return Some(d);
        }
        if on_chain.contains(key) {
            return Some(0);
        }
        let Some(rec) = self.records.get(key) else {
            memo.insert(key, 0);
            return Some(0);
        };
        on_chain.insert(key);
        stack.push(DepthFrame {
            key,
            parents: [rec.sire_key.as_deref(), rec.dam_key.as_deref()],
            next: 0,
            depth: 0,
        });
        None
    }

    /// Clamp a requested generation count to the lineage actually present in the data.
    pub fn effective_generations(&self, primary_key: &str, requested: Generations) -> Generations {
        requested.min(Generations(self.lineage_depth(primary_key)))
    }
}

struct DepthFrame<'a> {
    key: &'a str,
    parents: [Option<&'a str>; 2],
    next: usize,
    depth: u32,
}

impl<'a> DepthFrame<'a> {
    fn next_parent(&mut self) -> Option<&'a str> {
        while let Some(slot) = self.parents.get(self.next) {
            self.next += 1;
            if slot.is_some() {
                return *slot;
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pedigree/store.rs"]
mod tests;
