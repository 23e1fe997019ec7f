use crate::core::models::ids::ResidueId;
use crate::core::models::residue::Residue;
use crate::core::spatial::SpatialIndex;
use crate::core::utils::geometry::is_finite_point;
use crate::engine::context::DetectionContext;
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use std::collections::BTreeSet;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Tests every standard amino-acid residue of the target chain against the partner index.
///
/// A residue is an interface residue as soon as one of its filter-passing atoms has a
/// partner atom within the cutoff; its remaining atoms are not examined. With the
/// `parallel` feature, residues are evaluated concurrently and merged into an ordered set,
/// so the outcome does not depend on scheduling.
///
/// # Errors
///
/// Returns [`EngineError::NonFiniteCoordinate`] if a tested target atom has a NaN or
/// infinite coordinate.
#[instrument(skip_all, name = "residue_scan_task")]
pub fn run(
    context: &DetectionContext,
    index: &dyn SpatialIndex,
) -> Result<BTreeSet<isize>, EngineError> {
    let structure = context.structure;
    let target_residues: Vec<(ResidueId, &Residue)> = structure
        .residues_in(context.target_chain)
        .filter(|(_, residue)| residue.is_standard_amino_acid())
        .collect();

    info!(
        target_residues = target_residues.len(),
        cutoff = context.config.cutoff,
        "Scanning target residues."
    );

    if target_residues.is_empty() {
        return Ok(BTreeSet::new());
    }

    context.reporter.report(Progress::TaskStart {
        total_steps: target_residues.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = target_residues.iter();

    #[cfg(feature = "parallel")]
    let iterator = target_residues.par_iter();

    let hits: Vec<Option<isize>> = iterator
        .map(|&(residue_id, residue)| {
            let hit = scan_residue(context, index, residue_id, residue);
            context.reporter.report(Progress::TaskIncrement);
            hit
        })
        .collect::<Result<_, _>>()?;

    context.reporter.report(Progress::TaskFinish);

    let interface: BTreeSet<isize> = hits.into_iter().flatten().collect();
    info!(interface_residues = interface.len(), "Residue scan complete.");
    Ok(interface)
}

fn scan_residue(
    context: &DetectionContext,
    index: &dyn SpatialIndex,
    residue_id: ResidueId,
    residue: &Residue,
) -> Result<Option<isize>, EngineError> {
    let cutoff = context.config.cutoff;
    let filter = context.config.atom_filter;

    for (_, atom) in context.structure.atoms_in(residue_id) {
        if !filter.accepts(atom) {
            continue;
        }
        if !is_finite_point(&atom.position) {
            return Err(EngineError::NonFiniteCoordinate {
                chain_id: context
                    .structure
                    .chain(residue.chain_id)
                    .map(|c| c.id.clone())
                    .unwrap_or_default(),
                residue: residue.number,
                atom: atom.name.clone(),
            });
        }
        if index.any_within(&atom.position, cutoff) {
            return Ok(Some(residue.number));
        }
    }
    Ok(None)
}
