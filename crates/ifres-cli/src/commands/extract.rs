use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use crate::utils::output::{chain_file, source_id};
use ifres::core::io::fasta::{FastaRecord, chain_sequence};
use ifres::core::io::pdb::PdbFile;
use ifres::core::io::read_structure;
use ifres::core::models::structure::Structure;
use ifres::engine::error::EngineError;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Paths of the two files written for one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFiles {
    pub pdb: PathBuf,
    pub fasta: PathBuf,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    info!("Loading input structure from {:?}", &args.input);
    let structure = read_structure(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let id = source_id(structure.name(), &args.input);
    let files = export_chain(&structure, &id, &args.chain, args.model, &args.output_dir)?;

    println!("✓ Chain {} written to:", args.chain);
    println!("  {}", files.pdb.display());
    println!("  {}", files.fasta.display());
    Ok(())
}

/// Writes `{id}_chain{chain}.pdb` and `{id}_chain{chain}.fasta` into `output_dir`.
pub fn export_chain(
    structure: &Structure,
    id: &str,
    chain: &str,
    model_index: usize,
    output_dir: &Path,
) -> Result<ExtractedFiles> {
    let model_id = structure
        .model_at(model_index)
        .ok_or(EngineError::ModelNotFound {
            index: model_index,
            count: structure.model_count(),
        })?;
    let chain_id = structure
        .find_chain(model_id, chain)
        .ok_or_else(|| EngineError::ChainNotFound {
            chain_id: chain.to_string(),
            model: model_index,
        })?;

    std::fs::create_dir_all(output_dir)?;

    let pdb = chain_file(output_dir, id, chain, ".pdb");
    PdbFile::write_chain_to_path(structure, chain_id, &pdb).map_err(|e| {
        CliError::FileWriting {
            path: pdb.clone(),
            source: e.into(),
        }
    })?;

    let sequence = chain_sequence(structure, chain_id);
    if sequence.is_empty() {
        warn!(chain, "Chain has no peptide-bonded residues; FASTA sequence is empty.");
    }
    let fasta = chain_file(output_dir, id, chain, ".fasta");
    FastaRecord::new(format!("{}_{}", id, chain), sequence)
        .write_to_path(&fasta)
        .map_err(|e| CliError::FileWriting {
            path: fasta.clone(),
            source: e.into(),
        })?;

    info!(pdb = ?pdb, fasta = ?fasta, "Exported chain {}.", chain);
    Ok(ExtractedFiles { pdb, fasta })
}
