use crate::core::models::structure::Structure;
use crate::core::spatial::build_index;
use crate::engine::config::DetectionConfig;
use crate::engine::context::{DetectionContext, ResolvedChains};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::result::{DetectionParameters, InterfaceResult};
use crate::engine::tasks;
use tracing::{debug, info, instrument};

/// Finds the residues of the target chain that lie at an interface with the partner chains.
///
/// A standard amino-acid residue of the target chain is reported when at least one of its
/// atoms (after the atom filter) lies within `config.cutoff` Ångströms, inclusive, of an
/// atom (after the same filter) belonging to a standard amino-acid residue of a partner
/// chain. Only the model at `config.model_index` is considered.
///
/// # Arguments
///
/// * `structure` - The structure to analyse. It is not modified.
/// * `config` - Target chain, cutoff, partner selection and the other run parameters.
/// * `reporter` - Receives phase and per-residue progress events, plus a message when there
///   are no partner atoms to test against.
///
/// # Return
///
/// The sorted, distinct residue positions together with the resolved parameters.
///
/// # Errors
///
/// * [`EngineError::InvalidConfiguration`] if the configuration fails validation.
/// * [`EngineError::ModelNotFound`] / [`EngineError::ChainNotFound`] if the model, the
///   target chain or an explicitly listed partner chain does not exist.
/// * [`EngineError::NonFiniteCoordinate`] if a participating atom has a NaN or infinite
///   coordinate.
#[instrument(skip_all, name = "detection_workflow")]
pub fn run(
    structure: &Structure,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<InterfaceResult, EngineError> {
    // === Phase 1: Validate configuration and resolve chains ===
    reporter.report(Progress::PhaseStart {
        name: "Resolving Chains",
    });
    config.validate()?;
    let resolved = ResolvedChains::resolve(structure, config)?;
    let context = DetectionContext::new(structure, config, reporter, &resolved);
    let parameters = DetectionParameters {
        target_chain: config.target_chain.clone(),
        cutoff: config.cutoff,
        partner_chains: context.partner_chain_ids(),
        model_index: config.model_index,
        model_serial: context.model_serial(),
        atom_filter: config.atom_filter,
        index_kind: config.index_kind,
    };
    info!(
        structure = structure.name(),
        target_chain = %config.target_chain,
        partner_chains = ?parameters.partner_chains,
        cutoff = config.cutoff,
        "Starting interface detection."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Index partner atoms ===
    reporter.report(Progress::PhaseStart {
        name: "Indexing Partner Atoms",
    });
    let partner_points = tasks::partner_atoms::run(&context)?;
    if partner_points.is_empty() {
        reporter.report(Progress::PhaseFinish);
        info!("No partner atoms to test against; interface is empty.");
        reporter.report(Progress::Message(format!(
            "No partner atoms passed the atom filter; chain {} has no interface residues.",
            config.target_chain
        )));
        return Ok(InterfaceResult::new(Vec::new(), parameters));
    }
    let index = build_index(config.index_kind, &partner_points, config.cutoff);
    debug!(index = %config.index_kind, points = index.len(), "Built spatial index.");
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Scan target residues ===
    reporter.report(Progress::PhaseStart {
        name: "Scanning Target Residues",
    });
    let interface = tasks::residue_scan::run(&context, index.as_ref())?;
    reporter.report(Progress::PhaseFinish);

    let result = InterfaceResult::new(interface, parameters);
    info!(
        interface_residues = result.len(),
        "Interface detection finished."
    );
    Ok(result)
}
