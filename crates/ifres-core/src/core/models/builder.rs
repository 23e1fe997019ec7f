use super::atom::{Atom, DEFAULT_B_FACTOR, DEFAULT_OCCUPANCY};
use super::ids::{AtomId, ChainId, ModelId, ResidueId};
use super::structure::Structure;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Cannot start residue {residue_number} without a current chain")]
    NoCurrentChain { residue_number: isize },
    #[error("Cannot add atom '{atom_name}' without a current residue")]
    NoCurrentResidue { atom_name: String },
    #[error("Atom '{atom_name}' has no element symbol and none could be inferred from its name")]
    MissingElement { atom_name: String },
}

/// Incrementally assembles a [`Structure`] in file order.
///
/// The builder tracks a cursor (current model, chain and residue) so that readers can feed
/// records one at a time. Starting a chain or residue that already exists moves the cursor
/// back to it instead of creating a duplicate. A chain started before any model implicitly
/// opens model 1.
pub struct StructureBuilder {
    structure: Structure,

    // --- Builder-specific cursor state ---
    current_model: Option<ModelId>,
    current_chain: Option<ChainId>,
    current_residue: Option<ResidueId>,
}

impl StructureBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            structure: Structure::new(name),
            current_model: None,
            current_chain: None,
            current_residue: None,
        }
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.structure.set_name(name);
        self
    }

    pub fn start_model(&mut self, serial: usize) -> &mut Self {
        self.current_model = Some(self.structure.add_model(serial));
        self.current_chain = None;
        self.current_residue = None;
        self
    }

    pub fn start_chain(&mut self, id: &str) -> &mut Self {
        let model_id = match self.current_model {
            Some(model_id) => model_id,
            None => {
                let model_id = self.structure.add_model(1);
                self.current_model = Some(model_id);
                model_id
            }
        };
        self.current_chain = self.structure.add_chain(model_id, id);
        self.current_residue = None;
        self
    }

    pub fn start_residue(&mut self, number: isize, name: &str) -> Result<&mut Self, BuildError> {
        self.start_inserted_residue(number, None, name)
    }

    /// Starts (or returns to) the residue identified by `number` and `insertion_code`.
    ///
    /// Residues 52 and 52A are distinct even though they share a sequence number.
    pub fn start_inserted_residue(
        &mut self,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> Result<&mut Self, BuildError> {
        let chain_id = self.current_chain.ok_or(BuildError::NoCurrentChain {
            residue_number: number,
        })?;
        self.current_residue = self
            .structure
            .add_residue(chain_id, number, insertion_code, name);
        Ok(self)
    }

    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        element: &str,
        position: Point3<f64>,
    ) -> Result<AtomId, BuildError> {
        self.add_atom_with_factors(
            serial,
            name,
            element,
            position,
            DEFAULT_OCCUPANCY,
            DEFAULT_B_FACTOR,
        )
    }

    /// Adds an atom carrying the occupancy and temperature factor read from its record.
    pub fn add_atom_with_factors(
        &mut self,
        serial: usize,
        name: &str,
        element: &str,
        position: Point3<f64>,
        occupancy: f64,
        b_factor: f64,
    ) -> Result<AtomId, BuildError> {
        let residue_id = self
            .current_residue
            .ok_or_else(|| BuildError::NoCurrentResidue {
                atom_name: name.to_string(),
            })?;
        let atom = Atom::new(name, element, residue_id, position)
            .with_serial(serial)
            .with_occupancy(occupancy)
            .with_b_factor(b_factor);
        if atom.element.is_empty() {
            return Err(BuildError::MissingElement {
                atom_name: name.to_string(),
            });
        }
        self.structure
            .add_atom_to_residue(residue_id, atom)
            .ok_or_else(|| BuildError::NoCurrentResidue {
                atom_name: name.to_string(),
            })
    }

    /// Returns `true` if the current residue already holds an atom with the given name.
    ///
    /// Readers use this to keep only the first alternate location of each atom.
    pub fn current_residue_has_atom(&self, name: &str) -> bool {
        self.current_residue
            .and_then(|id| self.structure.residue(id))
            .is_some_and(|residue| residue.has_atom_named(name.trim()))
    }

    pub fn is_empty(&self) -> bool {
        self.structure.atom_count() == 0
    }

    pub fn build(self) -> Structure {
        self.structure
    }
}
