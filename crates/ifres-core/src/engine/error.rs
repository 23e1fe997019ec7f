use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid detection configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Model index {index} is out of range (structure has {count} model(s))")]
    ModelNotFound { index: usize, count: usize },

    #[error("Chain '{chain_id}' not found in model {model}")]
    ChainNotFound { chain_id: String, model: usize },

    #[error("Atom '{atom}' of residue {residue} in chain '{chain_id}' has a non-finite coordinate")]
    NonFiniteCoordinate {
        chain_id: String,
        residue: isize,
        atom: String,
    },
}
