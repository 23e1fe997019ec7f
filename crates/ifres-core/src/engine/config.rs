use crate::core::models::atom::Atom;
use crate::core::spatial::IndexKind;
use serde::Serialize;
use thiserror::Error;

/// Interface distance cutoff used when none is given, in Ångströms.
pub const DEFAULT_CUTOFF: f64 = 8.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Cutoff must be a finite, non-negative distance (got {0})")]
    InvalidCutoff(f64),
    #[error("Target chain '{0}' cannot also be a partner chain")]
    TargetInPartners(String),
    #[error("Explicit partner chain list is empty")]
    EmptyPartnerList,
}

/// Which chains count as binding partners of the target chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PartnerSelection {
    /// Every chain of the model except the target.
    #[default]
    AllOthers,
    /// Only the listed chains.
    Explicit(Vec<String>),
}

/// Which atoms take part in distance tests, on both the target and the partner side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomFilter {
    #[default]
    HeavyAtomsOnly,
    AllAtoms,
}

impl AtomFilter {
    #[inline]
    pub fn accepts(&self, atom: &Atom) -> bool {
        match self {
            AtomFilter::HeavyAtomsOnly => !atom.is_hydrogen(),
            AtomFilter::AllAtoms => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub target_chain: String,
    pub cutoff: f64,
    pub partners: PartnerSelection,
    /// Zero-based position of the model in the structure.
    pub model_index: usize,
    pub atom_filter: AtomFilter,
    pub index_kind: IndexKind,
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cutoff.is_finite() || self.cutoff < 0.0 {
            return Err(ConfigError::InvalidCutoff(self.cutoff));
        }
        if let PartnerSelection::Explicit(chains) = &self.partners {
            if chains.is_empty() {
                return Err(ConfigError::EmptyPartnerList);
            }
            if chains.iter().any(|c| c == &self.target_chain) {
                return Err(ConfigError::TargetInPartners(self.target_chain.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct DetectionConfigBuilder {
    target_chain: Option<String>,
    cutoff: Option<f64>,
    partners: Option<PartnerSelection>,
    model_index: Option<usize>,
    atom_filter: Option<AtomFilter>,
    index_kind: Option<IndexKind>,
}

impl DetectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_chain(mut self, chain_id: impl Into<String>) -> Self {
        self.target_chain = Some(chain_id.into());
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn partners(mut self, selection: PartnerSelection) -> Self {
        self.partners = Some(selection);
        self
    }
    pub fn partner_chains<I, S>(self, chain_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partners(PartnerSelection::Explicit(
            chain_ids.into_iter().map(Into::into).collect(),
        ))
    }
    pub fn model_index(mut self, index: usize) -> Self {
        self.model_index = Some(index);
        self
    }
    pub fn atom_filter(mut self, filter: AtomFilter) -> Self {
        self.atom_filter = Some(filter);
        self
    }
    pub fn index_kind(mut self, kind: IndexKind) -> Self {
        self.index_kind = Some(kind);
        self
    }

    pub fn build(self) -> Result<DetectionConfig, ConfigError> {
        let config = DetectionConfig {
            target_chain: self
                .target_chain
                .ok_or(ConfigError::MissingParameter("target_chain"))?,
            cutoff: self.cutoff.unwrap_or(DEFAULT_CUTOFF),
            partners: self.partners.unwrap_or_default(),
            model_index: self.model_index.unwrap_or(0),
            atom_filter: self.atom_filter.unwrap_or_default(),
            index_kind: self.index_kind.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}
