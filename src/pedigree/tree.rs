use crate::{
    foundation::core::{AncestorPath, Generations, ParentSide},
    foundation::error::BloodlineResult,
    pedigree::record::HorseRecord,
    pedigree::store::PedigreeRecordStore,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One position in an individual's ancestry tree.
///
/// The same horse may sit at several positions; each position is its own node.
pub struct AncestorNode {
    /// `None` for an unknown ancestor (blank link or key missing from the store).
    pub record: Option<HorseRecord>,
    /// Key that failed to resolve, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_key: Option<String>,
    pub depth: u32,
    pub path: AncestorPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sire: Option<Box<AncestorNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dam: Option<Box<AncestorNode>>,
}

impl AncestorNode {
    fn unknown(unresolved_key: Option<&str>, path: AncestorPath) -> Self {
        Self {
            record: None,
            unresolved_key: unresolved_key.map(str::to_owned),
            depth: path.depth(),
            path,
            sire: None,
            dam: None,
        }
    }

    fn known(record: HorseRecord, path: AncestorPath) -> Self {
        Self {
            record: Some(record),
            unresolved_key: None,
            depth: path.depth(),
            path,
            sire: None,
            dam: None,
        }
    }

    fn attach(&mut self, side: ParentSide, child: AncestorNode) {
        let slot = match side {
            ParentSide::Sire => &mut self.sire,
            ParentSide::Dam => &mut self.dam,
        };
        *slot = Some(Box::new(child));
    }

    pub fn is_known(&self) -> bool {
        self.record.is_some()
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.primary_key.as_str())
    }

    /// Present children, sire first.
    pub fn children(&self) -> impl Iterator<Item = &AncestorNode> {
        self.sire.iter().chain(self.dam.iter()).map(|b| b.as_ref())
    }

    pub fn child(&self, side: ParentSide) -> Option<&AncestorNode> {
        match side {
            ParentSide::Sire => self.sire.as_deref(),
            ParentSide::Dam => self.dam.as_deref(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.sire.is_none() && self.dam.is_none()
    }

    /// Pre-order traversal, sire subtree before dam subtree.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Node at `path` relative to this node.
    pub fn find(&self, path: &AncestorPath) -> Option<&AncestorNode> {
        path.steps()
            .iter()
            .try_fold(self, |node, side| node.child(*side))
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    pub fn max_depth(&self) -> u32 {
        self.walk().map(|n| n.depth).max().unwrap_or(self.depth)
    }
}

impl Drop for AncestorNode {
    // Unlinks boxed parents onto a heap stack so long chains do not unwind one frame per
    // generation.
    fn drop(&mut self) {
        if self.is_leaf() {
            return;
        }
        let mut stack: Vec<Box<AncestorNode>> = Vec::new();
        stack.extend(self.sire.take());
        stack.extend(self.dam.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.sire.take());
            stack.extend(node.dam.take());
        }
    }
}

/// Iterator returned by [`AncestorNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a AncestorNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a AncestorNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(dam) = node.dam.as_deref() {
            self.stack.push(dam);
        }
        if let Some(sire) = node.sire.as_deref() {
            self.stack.push(sire);
        }
        Some(node)
    }
}

/// Expands sire/dam links from the record store into an [`AncestorNode`] tree.
pub struct AncestryTreeBuilder<'s> {
    store: &'s PedigreeRecordStore,
}

impl<'s> AncestryTreeBuilder<'s> {
    pub fn new(store: &'s PedigreeRecordStore) -> Self {
        Self { store }
    }

    /// Build the tree for `root_key`, `max_generations` deep.
    ///
    /// Unknown keys are not an error: they produce an unknown node. Negative depths are.
    #[tracing::instrument(skip(self))]
    pub fn build(&self, root_key: &str, max_generations: i64) -> BloodlineResult<AncestorNode> {
        let limit = Generations::new(max_generations)?;
        Ok(self.build_to(root_key, limit))
    }

    /// Same as [`Self::build`] with an already validated depth.
    pub fn build_to(&self, root_key: &str, limit: Generations) -> AncestorNode {
        let root = self.expand(root_key, limit);
        tracing::debug!(
            nodes = root.node_count(),
            known = root.walk().filter(|n| n.is_known()).count(),
            "built ancestry tree"
        );
        root
    }

    // Depth-first with an explicit work stack; `limit` is what terminates self-referencing data.
    fn expand(&self, root_key: &str, limit: Generations) -> AncestorNode {
        let mut built = Vec::<Pending>::new();
        let mut work = vec![(Some(root_key), AncestorPath::root(), None)];

        while let Some((key, path, parent)) = work.pop() {
            let index = built.len();
            let node = match key.and_then(|k| self.store.get(k)) {
                None => AncestorNode::unknown(key, path),
                Some(record) => {
                    if path.depth() < limit.get() {
                        let dam_path = path.child(ParentSide::Dam);
                        let sire_path = path.child(ParentSide::Sire);
                        work.push((record.dam_key.as_deref(), dam_path, Some((index, ParentSide::Dam))));
                        work.push((record.sire_key.as_deref(), sire_path, Some((index, ParentSide::Sire))));
                    }
                    AncestorNode::known(record.clone(), path)
                }
            };
            built.push(Pending { node, parent });
        }

        // Children always sit after their parent, so popping from the back completes every
        // subtree before it is attached.
        let mut root = None;
        while let Some(Pending { node, parent }) = built.pop() {
            match parent {
                Some((index, side)) => built[index].node.attach(side, node),
                None => root = Some(node),
            }
        }
        root.unwrap_or_else(|| AncestorNode::unknown(Some(root_key), AncestorPath::root()))
    }
}

struct Pending {
    node: AncestorNode,
    parent: Option<(usize, ParentSide)>,
}

#[cfg(test)]
#[path = "../../tests/unit/pedigree/tree.rs"]
mod tests;
