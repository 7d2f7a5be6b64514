//! Memoized schema store

use crate::identity::TypeIdentity;
use crate::schema::SchemaNode;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One computed [`SchemaNode`] per concrete type identity
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    nodes: BTreeMap<TypeIdentity, Arc<SchemaNode>>,
    synthesized: usize,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored node, ignoring indirection
    pub fn get(&self, id: &TypeIdentity) -> Option<Arc<SchemaNode>> {
        self.nodes.get(id).cloned()
    }

    pub fn contains(&self, id: &TypeIdentity) -> bool {
        self.nodes.contains_key(id)
    }

    /// Store a freshly synthesized node and return the shared handle.
    ///
    /// A type is only ever stored once; storing it again keeps the first node.
    pub fn insert(&mut self, id: &TypeIdentity, node: SchemaNode) -> Arc<SchemaNode> {
        if let Some(existing) = self.nodes.get(id) {
            return Arc::clone(existing);
        }
        self.synthesized += 1;
        let node = Arc::new(node);
        self.nodes.insert(id.concrete(), Arc::clone(&node));
        node
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of times a node was synthesized and stored
    pub fn synthesis_count(&self) -> usize {
        self.synthesized
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeIdentity, &Arc<SchemaNode>)> {
        self.nodes.iter()
    }
}
