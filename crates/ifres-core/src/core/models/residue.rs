use super::ids::{AtomId, ChainId};
use crate::core::utils::identifiers::standard_residue_type;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The twenty standard amino acids.
///
/// Only residues classified as one of these types take part in interface detection.
/// Ligands, waters, ions, nucleotides and modified residues have no `ResidueType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueType {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Positively Charged (Basic) ---
    Arginine,
    Histidine,
    Lysine,

    // --- Negatively Charged (Acidic) ---
    AsparticAcid,
    GlutamicAcid,
}

impl ResidueType {
    pub fn three_letter_code(&self) -> &'static str {
        match self {
            Self::Alanine => "ALA",
            Self::Glycine => "GLY",
            Self::Isoleucine => "ILE",
            Self::Leucine => "LEU",
            Self::Proline => "PRO",
            Self::Valine => "VAL",
            Self::Phenylalanine => "PHE",
            Self::Tryptophan => "TRP",
            Self::Tyrosine => "TYR",
            Self::Asparagine => "ASN",
            Self::Cysteine => "CYS",
            Self::Glutamine => "GLN",
            Self::Serine => "SER",
            Self::Threonine => "THR",
            Self::Methionine => "MET",
            Self::Arginine => "ARG",
            Self::Histidine => "HIS",
            Self::Lysine => "LYS",
            Self::AsparticAcid => "ASP",
            Self::GlutamicAcid => "GLU",
        }
    }

    pub fn one_letter_code(&self) -> char {
        match self {
            Self::Alanine => 'A',
            Self::Glycine => 'G',
            Self::Isoleucine => 'I',
            Self::Leucine => 'L',
            Self::Proline => 'P',
            Self::Valine => 'V',
            Self::Phenylalanine => 'F',
            Self::Tryptophan => 'W',
            Self::Tyrosine => 'Y',
            Self::Asparagine => 'N',
            Self::Cysteine => 'C',
            Self::Glutamine => 'Q',
            Self::Serine => 'S',
            Self::Threonine => 'T',
            Self::Methionine => 'M',
            Self::Arginine => 'R',
            Self::Histidine => 'H',
            Self::Lysine => 'K',
            Self::AsparticAcid => 'D',
            Self::GlutamicAcid => 'E',
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a standard amino acid code")]
pub struct ParseResidueTypeError(pub String);

impl FromStr for ResidueType {
    type Err = ParseResidueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        standard_residue_type(s).ok_or_else(|| ParseResidueTypeError(s.to_string()))
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.three_letter_code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                      // Residue sequence number from source file
    pub insertion_code: Option<char>,       // Insertion code (e.g. 'A' in "52A"), if any
    pub name: String,                       // Name of the residue (e.g., "ALA", "HOH")
    pub residue_type: Option<ResidueType>,  // Standard amino acid classification, if any
    pub chain_id: ChainId,                  // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,          // Atoms in file order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its first occurrence
}

impl Residue {
    pub(crate) fn new(number: isize, name: &str, chain_id: ChainId) -> Self {
        let name = name.trim();
        Self {
            number,
            insertion_code: None,
            name: name.to_string(),
            residue_type: standard_residue_type(name),
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn with_insertion_code(mut self, insertion_code: Option<char>) -> Self {
        self.insertion_code = insertion_code;
        self
    }

    /// The residue position as written in files: the number followed by any insertion
    /// code, e.g. "52" or "52A".
    pub fn label(&self) -> String {
        match self.insertion_code {
            Some(code) => format!("{}{}", self.number, code),
            None => self.number.to_string(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    pub fn has_atom_named(&self, name: &str) -> bool {
        self.atom_name_map.contains_key(name)
    }

    pub fn is_standard_amino_acid(&self) -> bool {
        self.residue_type.is_some()
    }
}
