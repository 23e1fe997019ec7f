use crate::core::models::residue::ResidueType;
use phf::{Map, phf_map};

static STANDARD_RESIDUE_CODES: Map<&'static str, ResidueType> = phf_map! {
    "ALA" => ResidueType::Alanine,
    "ARG" => ResidueType::Arginine,
    "ASN" => ResidueType::Asparagine,
    "ASP" => ResidueType::AsparticAcid,
    "CYS" => ResidueType::Cysteine,
    "GLN" => ResidueType::Glutamine,
    "GLU" => ResidueType::GlutamicAcid,
    "GLY" => ResidueType::Glycine,
    "HIS" => ResidueType::Histidine,
    "ILE" => ResidueType::Isoleucine,
    "LEU" => ResidueType::Leucine,
    "LYS" => ResidueType::Lysine,
    "MET" => ResidueType::Methionine,
    "PHE" => ResidueType::Phenylalanine,
    "PRO" => ResidueType::Proline,
    "SER" => ResidueType::Serine,
    "THR" => ResidueType::Threonine,
    "TRP" => ResidueType::Tryptophan,
    "TYR" => ResidueType::Tyrosine,
    "VAL" => ResidueType::Valine,
};

/// Classifies a three-letter residue code as one of the twenty standard amino acids.
///
/// Matching is exact after trimming surrounding whitespace and upper-casing. Modified
/// residues (e.g. "MSE"), waters, ions, nucleotides and "UNK" are not standard.
pub fn standard_residue_type(code: &str) -> Option<ResidueType> {
    let code = code.trim();
    if code.len() != 3 {
        return None;
    }
    STANDARD_RESIDUE_CODES
        .get(code.to_ascii_uppercase().as_str())
        .copied()
}

pub fn is_hydrogen_element(element: &str) -> bool {
    matches!(element.trim(), "H" | "D" | "h" | "d")
}

/// Infers an element symbol from an atom name when the source file omits it.
///
/// Leading digits are skipped (PDB v2 names such as "1HB"), and the first letter of the
/// remaining name is taken as the element. This is correct for every atom of the standard
/// amino acids, which are the only residues the detector ever considers.
pub fn infer_element_from_name(atom_name: &str) -> String {
    atom_name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}
