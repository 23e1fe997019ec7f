use super::config::AtomFilter;
use crate::core::spatial::IndexKind;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The parameters a result was produced with, as resolved against the structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionParameters {
    pub target_chain: String,
    pub cutoff: f64,
    /// Partner chain identifiers actually used, in resolution order.
    pub partner_chains: Vec<String>,
    pub model_index: usize,
    pub model_serial: usize,
    pub atom_filter: AtomFilter,
    pub index_kind: IndexKind,
}

/// Interface residues of the target chain.
///
/// Residue positions are sorted ascending and free of duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceResult {
    residues: Vec<isize>,
    parameters: DetectionParameters,
}

impl InterfaceResult {
    /// Creates a result from any collection of residue positions; they are sorted and
    /// deduplicated here.
    pub fn new(residues: impl IntoIterator<Item = isize>, parameters: DetectionParameters) -> Self {
        let residues: Vec<isize> = residues.into_iter().sorted_unstable().dedup().collect();
        Self {
            residues,
            parameters,
        }
    }

    pub fn residues(&self) -> &[isize] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn contains(&self, residue_number: isize) -> bool {
        self.residues.binary_search(&residue_number).is_ok()
    }

    pub fn parameters(&self) -> &DetectionParameters {
        &self.parameters
    }

    /// Builds the serializable record written as the JSON output.
    pub fn to_record(&self, source_id: &str) -> InterfaceRecord {
        InterfaceRecord {
            source_id: source_id.to_string(),
            chain: self.parameters.target_chain.clone(),
            cutoff: self.parameters.cutoff,
            residue_indices: self.residues.clone(),
        }
    }

    /// Residue positions separated by single spaces, without a trailing newline.
    pub fn to_text(&self) -> String {
        self.residues.iter().join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    #[serde(rename = "pdb_id")]
    pub source_id: String,
    pub chain: String,
    #[serde(rename = "cutoff_A")]
    pub cutoff: f64,
    pub residue_indices: Vec<isize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters() -> DetectionParameters {
        DetectionParameters {
            target_chain: "E".to_string(),
            cutoff: 8.0,
            partner_chains: vec!["A".to_string()],
            model_index: 0,
            model_serial: 1,
            atom_filter: AtomFilter::HeavyAtomsOnly,
            index_kind: IndexKind::KdTree,
        }
    }

    #[test]
    fn residues_are_sorted_and_distinct() {
        let result = InterfaceResult::new([417, 19, 455, 19, -3], parameters());
        assert_eq!(result.residues(), &[-3, 19, 417, 455]);
        assert_eq!(result.len(), 4);
        assert!(result.contains(417));
        assert!(!result.contains(418));
    }

    #[test]
    fn empty_result_has_empty_text() {
        let result = InterfaceResult::new(Vec::new(), parameters());
        assert!(result.is_empty());
        assert_eq!(result.to_text(), "");
    }

    #[test]
    fn text_projection_is_space_separated() {
        let result = InterfaceResult::new([502, 417, 449], parameters());
        assert_eq!(result.to_text(), "417 449 502");
    }

    #[test]
    fn record_carries_source_chain_and_cutoff() {
        let result = InterfaceResult::new([11], parameters());
        let record = result.to_record("6M0J");
        assert_eq!(
            record,
            InterfaceRecord {
                source_id: "6M0J".to_string(),
                chain: "E".to_string(),
                cutoff: 8.0,
                residue_indices: vec![11],
            }
        );
    }
}
