use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ModelId, ResidueId};
use super::model::Model;
use super::residue::Residue;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Represents a complete solved structure: one or more models of chains, residues and atoms.
///
/// This struct is the root of the structural hierarchy. It exclusively owns every model,
/// chain, residue and atom through slot-map arenas; child-to-parent links are plain keys.
/// A `Structure` is assembled once through a
/// [`StructureBuilder`](super::builder::StructureBuilder) and is read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Source identifier of the structure (e.g. a PDB accession such as "6M0J").
    name: String,
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Primary storage for models.
    models: SlotMap<ModelId, Model>,
    /// Models in file order.
    model_order: Vec<ModelId>,
    /// Lookup map for finding residues by chain key, residue number and insertion code.
    residue_id_map: HashMap<(ChainId, isize, Option<char>), ResidueId>,
}

impl Structure {
    /// Creates a new, empty structure with the given source identifier.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Returns the source identifier of the structure.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Retrieves an immutable reference to a model by its ID.
    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id)
    }

    /// Returns the total number of atoms across all models.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Returns the number of models in the structure.
    pub fn model_count(&self) -> usize {
        self.model_order.len()
    }

    /// Returns the ID of the model at the given position in file order.
    ///
    /// # Arguments
    ///
    /// * `index` - Zero-based position of the model (0 is the first model).
    ///
    /// # Return
    ///
    /// Returns `Some(ModelId)` if the structure has that many models, otherwise `None`.
    pub fn model_at(&self, index: usize) -> Option<ModelId> {
        self.model_order.get(index).copied()
    }

    /// Returns an iterator over all models in file order.
    pub fn models(&self) -> impl Iterator<Item = (ModelId, &Model)> {
        self.model_order
            .iter()
            .filter_map(|&id| self.models.get(id).map(|model| (id, model)))
    }

    /// Returns an iterator over the chains of a model in file order.
    ///
    /// The iterator is empty if the model does not exist.
    pub fn chains_in(&self, model_id: ModelId) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.models
            .get(model_id)
            .map(|model| model.chains.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Returns an iterator over the residues of a chain in file order.
    ///
    /// The iterator is empty if the chain does not exist.
    pub fn residues_in(&self, chain_id: ChainId) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.chains
            .get(chain_id)
            .map(|chain| chain.residues.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.residues.get(id).map(|residue| (id, residue)))
    }

    /// Returns an iterator over the atoms of a residue in file order.
    ///
    /// The iterator is empty if the residue does not exist.
    pub fn atoms_in(&self, residue_id: ResidueId) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.residues
            .get(residue_id)
            .map(|residue| residue.atoms.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.atoms.get(id).map(|atom| (id, atom)))
    }

    /// Finds a chain by its identifier within a model.
    ///
    /// # Arguments
    ///
    /// * `model_id` - The model to search.
    /// * `id` - The chain identifier (e.g. "E").
    ///
    /// # Return
    ///
    /// Returns `Some(ChainId)` if the chain exists in that model, otherwise `None`.
    pub fn find_chain(&self, model_id: ModelId, id: &str) -> Option<ChainId> {
        self.models.get(model_id)?.find_chain(id)
    }

    /// Finds a residue without an insertion code by its chain key and residue number.
    pub fn find_residue(&self, chain_id: ChainId, residue_number: isize) -> Option<ResidueId> {
        self.find_inserted_residue(chain_id, residue_number, None)
    }

    /// Finds a residue by its chain key, residue number and insertion code.
    pub fn find_inserted_residue(
        &self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number, insertion_code))
            .copied()
    }

    pub(crate) fn add_model(&mut self, serial: usize) -> ModelId {
        let model_id = self.models.insert(Model::new(serial));
        self.model_order.push(model_id);
        model_id
    }

    /// Adds a new chain to a model or returns the existing one with the same identifier.
    pub(crate) fn add_chain(&mut self, model_id: ModelId, id: &str) -> Option<ChainId> {
        let model = self.models.get_mut(model_id)?;
        if let Some(&chain_id) = model.chain_id_map.get(id) {
            return Some(chain_id);
        }
        let chain_id = self.chains.insert(Chain::new(id, model_id));
        model.chain_id_map.insert(id.to_string(), chain_id);
        model.chains.push(chain_id);
        Some(chain_id)
    }

    /// Adds a new residue to a chain or returns the existing one with the same number and
    /// insertion code.
    pub(crate) fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number, insertion_code);

        if let Some(&residue_id) = self.residue_id_map.get(&key) {
            return Some(residue_id);
        }

        let residue = Residue::new(residue_number, name, chain_id).with_insertion_code(insertion_code);
        let residue_id = self.residues.insert(residue);
        self.residue_id_map.insert(key, residue_id);
        chain.residues.push(residue_id);
        Some(residue_id)
    }

    pub(crate) fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues[residue_id].add_atom(&name, atom_id);
        Some(atom_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    struct TestRefs {
        model_id: ModelId,
        chain_a_id: ChainId,
        chain_b_id: ChainId,
        gly_id: ResidueId,
        ala_id: ResidueId,
        gly_n_id: AtomId,
        gly_ca_id: AtomId,
    }

    fn create_two_chain_structure() -> (Structure, TestRefs) {
        let mut structure = Structure::new("TEST");
        let model_id = structure.add_model(1);

        let chain_a_id = structure.add_chain(model_id, "A").unwrap();
        let gly_id = structure.add_residue(chain_a_id, 1, None, "GLY").unwrap();
        let gly_n = Atom::new("N", "N", gly_id, Point3::new(0.0, 0.0, 0.0));
        let gly_ca = Atom::new("CA", "C", gly_id, Point3::new(1.4, 0.0, 0.0));
        let gly_n_id = structure.add_atom_to_residue(gly_id, gly_n).unwrap();
        let gly_ca_id = structure.add_atom_to_residue(gly_id, gly_ca).unwrap();

        let chain_b_id = structure.add_chain(model_id, "B").unwrap();
        let ala_id = structure.add_residue(chain_b_id, 2, None, "ALA").unwrap();
        let ala_ca = Atom::new("CA", "C", ala_id, Point3::new(5.0, 0.0, 0.0));
        structure.add_atom_to_residue(ala_id, ala_ca).unwrap();

        let refs = TestRefs {
            model_id,
            chain_a_id,
            chain_b_id,
            gly_id,
            ala_id,
            gly_n_id,
            gly_ca_id,
        };
        (structure, refs)
    }

    #[test]
    fn structure_creation_and_access() {
        let (structure, refs) = create_two_chain_structure();

        assert_eq!(structure.name(), "TEST");
        assert_eq!(structure.model_count(), 1);
        assert_eq!(structure.model_at(0), Some(refs.model_id));
        assert_eq!(structure.model_at(1), None);
        assert_eq!(structure.atom_count(), 3);

        assert_eq!(structure.find_chain(refs.model_id, "A"), Some(refs.chain_a_id));
        assert_eq!(structure.find_chain(refs.model_id, "B"), Some(refs.chain_b_id));
        assert_eq!(structure.find_chain(refs.model_id, "Z"), None);

        assert_eq!(structure.find_residue(refs.chain_a_id, 1), Some(refs.gly_id));
        assert_eq!(structure.find_residue(refs.chain_b_id, 2), Some(refs.ala_id));
        assert_eq!(structure.find_residue(refs.chain_a_id, 2), None);
    }

    #[test]
    fn traversal_preserves_file_order() {
        let (structure, refs) = create_two_chain_structure();

        let chain_ids: Vec<&str> = structure
            .chains_in(refs.model_id)
            .map(|(_, chain)| chain.id.as_str())
            .collect();
        assert_eq!(chain_ids, vec!["A", "B"]);

        let atom_ids: Vec<AtomId> = structure.atoms_in(refs.gly_id).map(|(id, _)| id).collect();
        assert_eq!(atom_ids, vec![refs.gly_n_id, refs.gly_ca_id]);

        let residue_numbers: Vec<isize> = structure
            .residues_in(refs.chain_a_id)
            .map(|(_, residue)| residue.number)
            .collect();
        assert_eq!(residue_numbers, vec![1]);
    }

    #[test]
    fn back_references_point_to_parents() {
        let (structure, refs) = create_two_chain_structure();

        let atom = structure.atom(refs.gly_ca_id).unwrap();
        assert_eq!(atom.residue_id, refs.gly_id);
        let residue = structure.residue(atom.residue_id).unwrap();
        assert_eq!(residue.chain_id, refs.chain_a_id);
        let chain = structure.chain(residue.chain_id).unwrap();
        assert_eq!(chain.model_id, refs.model_id);
    }

    #[test]
    fn add_chain_and_residue_are_idempotent() {
        let (mut structure, refs) = create_two_chain_structure();

        let chain_again = structure.add_chain(refs.model_id, "A").unwrap();
        assert_eq!(chain_again, refs.chain_a_id);
        assert_eq!(structure.model(refs.model_id).unwrap().chains().len(), 2);

        let residue_again = structure.add_residue(refs.chain_a_id, 1, None, "ALA").unwrap();
        assert_eq!(residue_again, refs.gly_id);
        assert_eq!(structure.chain(refs.chain_a_id).unwrap().residues().len(), 1);
        assert_eq!(structure.residue(refs.gly_id).unwrap().name, "GLY");
    }

    #[test]
    fn insertion_codes_make_distinct_residues() {
        let (mut structure, refs) = create_two_chain_structure();

        let plain = structure.add_residue(refs.chain_a_id, 52, None, "SER").unwrap();
        let inserted = structure
            .add_residue(refs.chain_a_id, 52, Some('A'), "GLY")
            .unwrap();
        assert_ne!(plain, inserted);
        assert_eq!(structure.find_residue(refs.chain_a_id, 52), Some(plain));
        assert_eq!(
            structure.find_inserted_residue(refs.chain_a_id, 52, Some('A')),
            Some(inserted)
        );
        assert_eq!(structure.find_inserted_residue(refs.chain_a_id, 52, Some('B')), None);

        let labels: Vec<String> = structure
            .residues_in(refs.chain_a_id)
            .map(|(_, residue)| residue.label())
            .collect();
        assert_eq!(labels, vec!["1", "52", "52A"]);
    }

    #[test]
    fn same_chain_identifier_is_distinct_across_models() {
        let mut structure = Structure::new("NMR");
        let first = structure.add_model(1);
        let second = structure.add_model(2);
        let a1 = structure.add_chain(first, "A").unwrap();
        let a2 = structure.add_chain(second, "A").unwrap();

        assert_ne!(a1, a2);
        let models: Vec<usize> = structure.models().map(|(_, m)| m.serial).collect();
        assert_eq!(models, vec![1, 2]);
    }

    #[test]
    fn traversal_of_missing_keys_yields_nothing() {
        let structure = Structure::new("EMPTY");
        assert_eq!(structure.chains_in(ModelId::default()).count(), 0);
        assert_eq!(structure.residues_in(ChainId::default()).count(), 0);
        assert_eq!(structure.atoms_in(ResidueId::default()).count(), 0);
    }

    #[test]
    fn adding_to_missing_parents_fails() {
        let mut structure = Structure::new("EMPTY");
        assert!(structure.add_chain(ModelId::default(), "A").is_none());
        assert!(structure.add_residue(ChainId::default(), 1, None, "ALA").is_none());
        let atom = Atom::new("CA", "C", ResidueId::default(), Point3::origin());
        assert!(
            structure
                .add_atom_to_residue(ResidueId::default(), atom)
                .is_none()
        );
    }
}
