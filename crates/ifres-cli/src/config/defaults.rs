use ifres::core::spatial::IndexKind;
use ifres::engine::config::DEFAULT_CUTOFF;
use std::path::PathBuf;

/// Values used when neither the config file, the flags nor `--set` provide one.
pub struct DefaultsConfig {
    pub target_chain: String,
    pub cutoff: f64,
    pub model: usize,
    pub include_hydrogens: bool,
    pub index: IndexKind,
    pub output_directory: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            target_chain: "E".to_string(),
            cutoff: DEFAULT_CUTOFF,
            model: 0,
            include_hydrogens: false,
            index: IndexKind::KdTree,
            output_directory: PathBuf::from("data/target"),
        }
    }
}
