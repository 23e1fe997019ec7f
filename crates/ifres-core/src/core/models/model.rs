use super::ids::ChainId;
use std::collections::HashMap;

/// One coordinate set of a structure (e.g. a single NMR conformer).
///
/// Crystal structures usually contain exactly one model. Chain identifiers are unique
/// within a model, but the same identifier may appear in several models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub serial: usize,                                 // Model number from the source file
    pub(crate) chains: Vec<ChainId>,                   // Chains in file order
    pub(crate) chain_id_map: HashMap<String, ChainId>, // Map from chain identifier to its key
}

impl Model {
    pub(crate) fn new(serial: usize) -> Self {
        Self {
            serial,
            chains: Vec::new(),
            chain_id_map: HashMap::new(),
        }
    }

    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    pub fn find_chain(&self, id: &str) -> Option<ChainId> {
        self.chain_id_map.get(id).copied()
    }
}
