use super::config::{DetectionConfig, PartnerSelection};
use super::error::EngineError;
use super::progress::ProgressReporter;
use crate::core::models::ids::{ChainId, ModelId};
use crate::core::models::structure::Structure;

/// The resolved inputs of one detection run.
///
/// Holds the chosen model and the target and partner chains as arena keys, so tasks never
/// repeat name lookups.
#[derive(Clone, Copy)]
pub struct DetectionContext<'a> {
    pub structure: &'a Structure,
    pub config: &'a DetectionConfig,
    pub reporter: &'a ProgressReporter<'a>,
    pub model_id: ModelId,
    pub target_chain: ChainId,
    partner_chains: &'a [ChainId],
}

/// Owned storage for the partner chain list borrowed by a [`DetectionContext`].
pub struct ResolvedChains {
    pub model_id: ModelId,
    pub target_chain: ChainId,
    pub partner_chains: Vec<ChainId>,
}

impl ResolvedChains {
    /// Resolves the model, target chain and partner chains named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelNotFound`] if the model index is out of range and
    /// [`EngineError::ChainNotFound`] if the target or an explicitly listed partner chain
    /// does not exist in that model.
    pub fn resolve(structure: &Structure, config: &DetectionConfig) -> Result<Self, EngineError> {
        let model_id =
            structure
                .model_at(config.model_index)
                .ok_or(EngineError::ModelNotFound {
                    index: config.model_index,
                    count: structure.model_count(),
                })?;

        let find = |chain_id: &str| {
            structure
                .find_chain(model_id, chain_id)
                .ok_or_else(|| EngineError::ChainNotFound {
                    chain_id: chain_id.to_string(),
                    model: config.model_index,
                })
        };

        let target_chain = find(&config.target_chain)?;

        let partner_chains = match &config.partners {
            PartnerSelection::AllOthers => structure
                .chains_in(model_id)
                .filter(|(id, _)| *id != target_chain)
                .map(|(id, _)| id)
                .collect(),
            PartnerSelection::Explicit(ids) => {
                let mut resolved: Vec<ChainId> = Vec::with_capacity(ids.len());
                for id in ids {
                    let chain = find(id)?;
                    if !resolved.contains(&chain) {
                        resolved.push(chain);
                    }
                }
                resolved
            }
        };

        Ok(Self {
            model_id,
            target_chain,
            partner_chains,
        })
    }
}

impl<'a> DetectionContext<'a> {
    pub fn new(
        structure: &'a Structure,
        config: &'a DetectionConfig,
        reporter: &'a ProgressReporter<'a>,
        resolved: &'a ResolvedChains,
    ) -> Self {
        Self {
            structure,
            config,
            reporter,
            model_id: resolved.model_id,
            target_chain: resolved.target_chain,
            partner_chains: &resolved.partner_chains,
        }
    }

    pub fn partner_chains(&self) -> &'a [ChainId] {
        self.partner_chains
    }

    /// Returns the identifiers of the partner chains, in resolution order.
    pub fn partner_chain_ids(&self) -> Vec<String> {
        self.partner_chains
            .iter()
            .filter_map(|&id| self.structure.chain(id))
            .map(|chain| chain.id.clone())
            .collect()
    }

    pub fn model_serial(&self) -> usize {
        self.structure
            .model(self.model_id)
            .map_or(self.config.model_index + 1, |m| m.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::StructureBuilder;
    use crate::engine::config::DetectionConfigBuilder;
    use nalgebra::Point3;

    fn three_chain_structure() -> Structure {
        let mut builder = StructureBuilder::new("T");
        builder.start_model(1);
        for chain in ["A", "E", "B"] {
            builder.start_chain(chain);
            builder.start_residue(1, "ALA").unwrap();
            builder.add_atom(1, "CA", "C", Point3::origin()).unwrap();
        }
        builder.build()
    }

    fn chain_names(structure: &Structure, ids: &[ChainId]) -> Vec<String> {
        ids.iter()
            .map(|&id| structure.chain(id).unwrap().id.clone())
            .collect()
    }

    #[test]
    fn all_others_selects_every_other_chain_in_file_order() {
        let structure = three_chain_structure();
        let config = DetectionConfigBuilder::new().target_chain("E").build().unwrap();
        let resolved = ResolvedChains::resolve(&structure, &config).unwrap();
        assert_eq!(chain_names(&structure, &resolved.partner_chains), vec!["A", "B"]);

        let reporter = ProgressReporter::new();
        let context = DetectionContext::new(&structure, &config, &reporter, &resolved);
        assert_eq!(context.partner_chain_ids(), vec!["A", "B"]);
        assert_eq!(context.model_serial(), 1);
    }

    #[test]
    fn explicit_partners_are_deduplicated_in_listed_order() {
        let structure = three_chain_structure();
        let config = DetectionConfigBuilder::new()
            .target_chain("E")
            .partner_chains(["B", "A", "B"])
            .build()
            .unwrap();
        let resolved = ResolvedChains::resolve(&structure, &config).unwrap();
        assert_eq!(chain_names(&structure, &resolved.partner_chains), vec!["B", "A"]);
    }

    #[test]
    fn unknown_chains_are_reported() {
        let structure = three_chain_structure();
        let config = DetectionConfigBuilder::new().target_chain("Z").build().unwrap();
        assert!(matches!(
            ResolvedChains::resolve(&structure, &config),
            Err(EngineError::ChainNotFound { chain_id, model: 0 }) if chain_id == "Z"
        ));

        let config = DetectionConfigBuilder::new()
            .target_chain("E")
            .partner_chains(["A", "Q"])
            .build()
            .unwrap();
        assert!(matches!(
            ResolvedChains::resolve(&structure, &config),
            Err(EngineError::ChainNotFound { chain_id, .. }) if chain_id == "Q"
        ));
    }

    #[test]
    fn out_of_range_model_is_reported() {
        let structure = three_chain_structure();
        let config = DetectionConfigBuilder::new()
            .target_chain("E")
            .model_index(3)
            .build()
            .unwrap();
        assert!(matches!(
            ResolvedChains::resolve(&structure, &config),
            Err(EngineError::ModelNotFound { index: 3, count: 1 })
        ));
    }
}
