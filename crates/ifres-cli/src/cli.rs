use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "ifres CLI - Detect protein-protein interface residues in solved structures using heavy-atom distance cutoffs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress bars; errors are still printed
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to scan target residues.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a structure from the RCSB PDB in mmCIF format.
    Fetch(FetchArgs),
    /// Export one chain of a structure as a chain-only PDB file and a FASTA sequence.
    Extract(ExtractArgs),
    /// Detect the interface residues of a target chain.
    Detect(DetectArgs),
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Four-character PDB identifier (e.g., 6M0J).
    #[arg(required = true, value_name = "PDB_ID")]
    pub pdb_id: String,

    /// Directory the structure file is saved to.
    #[arg(short, long, value_name = "DIR", default_value = "data/target")]
    pub output_dir: PathBuf,

    /// Download again even if the file already exists.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to the input structure file (.pdb, .ent, .cif or .mmcif).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Identifier of the chain to export.
    #[arg(short, long, required = true, value_name = "CHAIN")]
    pub chain: String,

    /// Directory the exported files are written to.
    #[arg(short, long, value_name = "DIR", default_value = "data/target")]
    pub output_dir: PathBuf,

    /// Zero-based index of the model to export from.
    #[arg(long, value_name = "INT", default_value_t = 0)]
    pub model: usize,
}

/// Arguments for the `detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectArgs {
    // --- Core Arguments ---
    /// Path to the input structure file (.pdb, .ent, .cif or .mmcif).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the result files are written to, overriding the config file.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    // --- Detection Overrides ---
    /// Identifier of the target chain, overriding the config file.
    #[arg(short, long, value_name = "CHAIN")]
    pub chain: Option<String>,

    /// Distance cutoff in Ångströms, overriding the config file.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Comma-separated partner chains (e.g., A,B). Defaults to every other chain.
    #[arg(long, value_name = "CHAINS", value_delimiter = ',')]
    pub partners: Vec<String>,

    /// Zero-based index of the model to analyse.
    #[arg(long, value_name = "INT")]
    pub model: Option<usize>,

    /// Let hydrogen atoms take part in distance tests.
    #[arg(long)]
    pub include_hydrogens: bool,

    /// Spatial index used for neighbour queries (kdtree, grid or linear).
    #[arg(long, value_name = "KIND")]
    pub index: Option<String>,

    /// Set a specific configuration value, overriding the config file and flags.
    /// Can be used multiple times. Example: -S detection.cutoff=5.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
