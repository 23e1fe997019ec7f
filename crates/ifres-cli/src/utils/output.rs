use std::path::{Path, PathBuf};

/// The identifier used in output file names: the structure's own name, falling back to the
/// input file stem.
pub fn source_id(structure_name: &str, input: &Path) -> String {
    let name = structure_name.trim();
    if !name.is_empty() {
        return name.to_string();
    }
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("structure")
        .to_string()
}

/// `{dir}/{id}_chain{chain}{suffix}`, e.g. `6M0J_chainE.pdb`.
pub fn chain_file(dir: &Path, id: &str, chain: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{}_chain{}{}", id, chain, suffix))
}

/// Formats residue positions for the console, eight per line.
pub fn format_residue_list(residues: &[isize]) -> String {
    residues
        .chunks(8)
        .map(|row| {
            row.iter()
                .map(|number| format!("{:>6}", number))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_prefers_the_structure_name() {
        assert_eq!(source_id("6M0J", Path::new("x/6m0j.cif")), "6M0J");
        assert_eq!(source_id("  ", Path::new("x/complex.pdb")), "complex");
    }

    #[test]
    fn chain_files_follow_the_naming_scheme() {
        assert_eq!(
            chain_file(Path::new("data/target"), "6M0J", "E", "_interface_residues.json"),
            PathBuf::from("data/target/6M0J_chainE_interface_residues.json")
        );
        assert_eq!(
            chain_file(Path::new("out"), "1ABC", "A", ".fasta"),
            PathBuf::from("out/1ABC_chainA.fasta")
        );
    }

    #[test]
    fn residue_list_wraps_after_eight_entries() {
        let residues: Vec<isize> = (1..=10).collect();
        let formatted = format_residue_list(&residues);
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "     9    10");
        assert_eq!(format_residue_list(&[]), "");
    }
}
