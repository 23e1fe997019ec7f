use crate::cli::DetectArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::output::{chain_file, format_residue_list, source_id};
use crate::utils::progress::CliProgressHandler;
use ifres::core::io::read_structure;
use ifres::engine::progress::ProgressReporter;
use ifres::engine::result::InterfaceResult;
use ifres::workflows;
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths of the result files written for one detection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFiles {
    pub json: PathBuf,
    pub text: PathBuf,
}

pub fn run(args: DetectArgs, quiet: bool) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;

    info!("Loading input structure from {:?}", &args.input);
    let structure = read_structure(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let progress_handler = CliProgressHandler::new(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the interface detection workflow...");
    let result = tokio::task::block_in_place(|| {
        workflows::detect::run(&structure, &settings.detection, &reporter)
    })?;

    let id = source_id(structure.name(), &args.input);
    println!(
        "Found {} interface residue(s) on chain {} (cutoff {} Å):",
        result.len(),
        settings.detection.target_chain,
        settings.detection.cutoff
    );
    if !result.is_empty() {
        println!("{}", format_residue_list(result.residues()));
    }

    let files = write_results(&result, &id, &settings.output_dir)?;
    println!("✓ Results written to:");
    println!("  {}", files.json.display());
    println!("  {}", files.text.display());
    Ok(())
}

/// Writes the JSON record and the space-separated residue list into `output_dir`.
pub fn write_results(result: &InterfaceResult, id: &str, output_dir: &Path) -> Result<ResultFiles> {
    std::fs::create_dir_all(output_dir)?;
    let chain = &result.parameters().target_chain;

    let json = chain_file(output_dir, id, chain, "_interface_residues.json");
    let record = serde_json::to_string_pretty(&result.to_record(id)).map_err(|e| {
        CliError::FileWriting {
            path: json.clone(),
            source: e.into(),
        }
    })?;
    std::fs::write(&json, record + "\n")?;

    let text = chain_file(output_dir, id, chain, "_interface_residues.txt");
    std::fs::write(&text, result.to_text() + "\n")?;

    info!(json = ?json, text = ?text, residues = result.len(), "Wrote interface residues.");
    Ok(ResultFiles { json, text })
}
