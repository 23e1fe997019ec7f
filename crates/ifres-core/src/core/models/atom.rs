use super::ids::ResidueId;
use crate::core::utils::identifiers::{infer_element_from_name, is_hydrogen_element};
use nalgebra::Point3;

/// Occupancy assumed when a file leaves the field blank.
pub const DEFAULT_OCCUPANCY: f64 = 1.0;
/// Isotropic displacement assumed when a file leaves the field blank.
pub const DEFAULT_B_FACTOR: f64 = 0.0;

/// Represents a single atom of a solved structure.
///
/// Atoms are owned by the [`Structure`](super::structure::Structure) arena and refer back to
/// their parent residue through a [`ResidueId`] key. The back-reference is navigational only;
/// ownership always flows downward from the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number of the atom as found in the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "OG1").
    pub name: String,
    /// The upper-case chemical element symbol (e.g., "C", "N", "SE").
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Fractional occupancy of this position.
    pub occupancy: f64,
    /// Isotropic temperature factor in square Angstroms.
    pub b_factor: f64,
}

impl Atom {
    /// Creates a new `Atom` with an explicit element symbol.
    ///
    /// The element is normalized to upper case. If `element` is blank, the element is
    /// inferred from the atom name instead.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `element` - The element symbol, possibly empty.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, element: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        let name = name.trim();
        let element = element.trim();
        let element = if element.is_empty() {
            infer_element_from_name(name)
        } else {
            element.to_ascii_uppercase()
        };
        Self {
            serial: 0,
            name: name.to_string(),
            element,
            residue_id,
            position,
            occupancy: DEFAULT_OCCUPANCY,
            b_factor: DEFAULT_B_FACTOR,
        }
    }

    /// Sets the serial number of the atom, returning the updated atom.
    pub fn with_serial(mut self, serial: usize) -> Self {
        self.serial = serial;
        self
    }

    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn with_b_factor(mut self, b_factor: f64) -> Self {
        self.b_factor = b_factor;
        self
    }

    /// Returns `true` if this atom is a hydrogen (protium or deuterium).
    pub fn is_hydrogen(&self) -> bool {
        is_hydrogen_element(&self.element)
    }

    /// Returns `true` if all three coordinates are finite numbers.
    pub fn has_finite_position(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }
}
