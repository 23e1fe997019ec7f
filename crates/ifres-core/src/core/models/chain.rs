use super::ids::{ModelId, ResidueId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: String,                      // Chain identifier (e.g., "A", "E", "AA")
    pub model_id: ModelId,               // ID of the parent model
    pub(crate) residues: Vec<ResidueId>, // Ordered list of residue IDs belonging to this chain
}

impl Chain {
    pub(crate) fn new(id: &str, model_id: ModelId) -> Self {
        Self {
            id: id.to_string(),
            model_id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    #[test]
    fn new_chain_starts_empty() {
        let model_id = ModelId::from(KeyData::from_ffi(1));
        let chain = Chain::new("E", model_id);
        assert_eq!(chain.id, "E");
        assert_eq!(chain.model_id, model_id);
        assert!(chain.residues().is_empty());
    }
}
