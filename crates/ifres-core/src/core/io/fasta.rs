use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::squared_distance;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Longest C–N distance, in Ångströms, still treated as a peptide bond.
pub const MAX_PEPTIDE_BOND: f64 = 1.8;

fn is_peptide_bonded(structure: &Structure, prev: &Residue, next: &Residue) -> bool {
    let carbon = prev
        .get_atom_id_by_name("C")
        .and_then(|id| structure.atom(id));
    let nitrogen = next
        .get_atom_id_by_name("N")
        .and_then(|id| structure.atom(id));
    match (carbon, nitrogen) {
        (Some(c), Some(n)) => {
            squared_distance(&c.position, &n.position) <= MAX_PEPTIDE_BOND * MAX_PEPTIDE_BOND
        }
        _ => false,
    }
}

/// Splits a chain into peptide fragments.
///
/// A fragment is a maximal run of consecutive standard amino acids in which each residue's
/// backbone C is within [`MAX_PEPTIDE_BOND`] of the next residue's N. Any other residue
/// ends the current fragment. Residues not bonded to a neighbour on either side belong to
/// no fragment.
pub fn peptide_fragments(structure: &Structure, chain_id: ChainId) -> Vec<Vec<ResidueId>> {
    let mut fragments: Vec<Vec<ResidueId>> = Vec::new();
    let mut current: Vec<ResidueId> = Vec::new();
    let mut prev: Option<(ResidueId, &Residue)> = None;

    for (residue_id, residue) in structure.residues_in(chain_id) {
        if !residue.is_standard_amino_acid() {
            if current.len() > 1 {
                fragments.push(std::mem::take(&mut current));
            }
            current.clear();
            prev = None;
            continue;
        }

        match prev {
            Some((prev_id, prev_residue)) if is_peptide_bonded(structure, prev_residue, residue) => {
                if current.is_empty() {
                    current.push(prev_id);
                }
                current.push(residue_id);
            }
            _ => {
                if current.len() > 1 {
                    fragments.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
        prev = Some((residue_id, residue));
    }

    if current.len() > 1 {
        fragments.push(current);
    }
    fragments
}

/// Returns the one-letter sequence of a chain, concatenating its peptide fragments.
pub fn chain_sequence(structure: &Structure, chain_id: ChainId) -> String {
    peptide_fragments(structure, chain_id)
        .iter()
        .flatten()
        .filter_map(|&id| structure.residue(id))
        .filter_map(|residue| residue.residue_type)
        .map(|residue_type| residue_type.one_letter_code())
        .collect()
}

/// A single FASTA entry. The sequence is written on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer, ">{}", self.header)?;
        writeln!(writer, "{}", self.sequence)
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::PdbFile;
    use crate::core::io::traits::StructureReader;
    use crate::core::models::builder::StructureBuilder;
    use nalgebra::Point3;
    use std::io::Cursor;

    /// Adds a residue with N at `x` and C at `x + 1.0` along the x axis.
    fn add_backbone(builder: &mut StructureBuilder, number: isize, name: &str, x: f64) {
        builder.start_residue(number, name).unwrap();
        builder
            .add_atom(0, "N", "N", Point3::new(x, 0.0, 0.0))
            .unwrap();
        builder
            .add_atom(0, "C", "C", Point3::new(x + 1.0, 0.0, 0.0))
            .unwrap();
    }

    fn chain_of(structure: &Structure) -> ChainId {
        let model_id = structure.model_at(0).unwrap();
        structure.find_chain(model_id, "A").unwrap()
    }

    #[test]
    fn splits_at_chain_breaks_and_drops_isolated_residues() {
        let mut builder = StructureBuilder::new("T");
        builder.start_chain("A");
        add_backbone(&mut builder, 1, "MET", 0.0);
        add_backbone(&mut builder, 2, "LYS", 2.3);
        add_backbone(&mut builder, 3, "TRP", 4.6);
        // Gap of 10 Å: residue 4 is alone.
        add_backbone(&mut builder, 4, "GLY", 15.6);
        add_backbone(&mut builder, 5, "ASP", 30.0);
        add_backbone(&mut builder, 6, "GLU", 32.8);
        let structure = builder.build();

        let chain = chain_of(&structure);
        let sizes: Vec<usize> = peptide_fragments(&structure, chain)
            .iter()
            .map(Vec::len)
            .collect();
        assert_eq!(sizes, vec![3, 2]);
        assert_eq!(chain_sequence(&structure, chain), "MKWDE");
    }

    #[test]
    fn bond_at_the_length_limit_is_accepted() {
        let mut builder = StructureBuilder::new("T");
        builder.start_chain("A");
        add_backbone(&mut builder, 1, "ALA", 0.0);
        add_backbone(&mut builder, 2, "ALA", 2.8);
        let structure = builder.build();
        assert_eq!(chain_sequence(&structure, chain_of(&structure)), "AA");
    }

    #[test]
    fn non_standard_residues_end_a_fragment() {
        let mut builder = StructureBuilder::new("T");
        builder.start_chain("A");
        add_backbone(&mut builder, 1, "SER", 0.0);
        add_backbone(&mut builder, 2, "MSE", 2.3);
        add_backbone(&mut builder, 3, "THR", 4.6);
        add_backbone(&mut builder, 4, "VAL", 6.9);
        builder.start_residue(100, "HOH").unwrap();
        builder
            .add_atom(0, "O", "O", Point3::new(50.0, 0.0, 0.0))
            .unwrap();
        let structure = builder.build();
        assert_eq!(chain_sequence(&structure, chain_of(&structure)), "TV");
    }

    #[test]
    fn residues_missing_backbone_atoms_are_not_bonded() {
        let mut builder = StructureBuilder::new("T");
        builder.start_chain("A");
        add_backbone(&mut builder, 1, "ALA", 0.0);
        builder.start_residue(2, "GLY").unwrap();
        builder
            .add_atom(0, "CA", "C", Point3::new(2.5, 0.0, 0.0))
            .unwrap();
        let structure = builder.build();
        assert!(peptide_fragments(&structure, chain_of(&structure)).is_empty());
    }

    #[test]
    fn inserted_residues_keep_their_place_in_the_sequence() {
        let text = "\
ATOM      1  N   ALA A  51       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  C   ALA A  51       1.000   0.000   0.000  1.00  0.00           C
ATOM      3  N   SER A  52       2.300   0.000   0.000  1.00  0.00           N
ATOM      4  C   SER A  52       3.300   0.000   0.000  1.00  0.00           C
ATOM      5  N   GLY A  52A      4.600   0.000   0.000  1.00  0.00           N
ATOM      6  C   GLY A  52A      5.600   0.000   0.000  1.00  0.00           C
ATOM      7  N   TRP A  53       6.900   0.000   0.000  1.00  0.00           N
ATOM      8  C   TRP A  53       7.900   0.000   0.000  1.00  0.00           C
END
";
        let structure = PdbFile::read_from(&mut Cursor::new(text)).unwrap();
        let chain = chain_of(&structure);
        assert_eq!(peptide_fragments(&structure, chain).len(), 1);
        assert_eq!(chain_sequence(&structure, chain), "ASGW");
    }

    #[test]
    fn record_is_written_as_header_and_single_sequence_line() {
        let record = FastaRecord::new("6M0J_E", "NITNLCPF");
        let mut buffer = Vec::new();
        record.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), ">6M0J_E\nNITNLCPF\n");
    }
}
