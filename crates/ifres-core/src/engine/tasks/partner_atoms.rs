use crate::core::models::ids::ChainId;
use crate::core::utils::geometry::is_finite_point;
use crate::engine::context::DetectionContext;
use crate::engine::error::EngineError;
use nalgebra::Point3;
use tracing::{debug, instrument};

/// Collects the positions of every atom that may trigger an interface hit.
///
/// Only atoms of standard amino-acid residues in the partner chains are taken, filtered by
/// the configured [`AtomFilter`](crate::engine::config::AtomFilter). Order follows the
/// structure: chains in partner order, then residues and atoms in file order.
///
/// # Errors
///
/// Returns [`EngineError::NonFiniteCoordinate`] for the first collected atom whose position
/// is NaN or infinite.
#[instrument(skip_all, name = "partner_atoms_task")]
pub fn run(context: &DetectionContext) -> Result<Vec<Point3<f64>>, EngineError> {
    let mut points = Vec::new();
    for &chain_id in context.partner_chains() {
        collect_chain(context, chain_id, &mut points)?;
    }
    debug!(
        partner_chains = context.partner_chains().len(),
        partner_atoms = points.len(),
        "Collected partner atoms."
    );
    Ok(points)
}

fn collect_chain(
    context: &DetectionContext,
    chain_id: ChainId,
    points: &mut Vec<Point3<f64>>,
) -> Result<(), EngineError> {
    let structure = context.structure;
    let filter = context.config.atom_filter;

    for (residue_id, residue) in structure.residues_in(chain_id) {
        if !residue.is_standard_amino_acid() {
            continue;
        }
        for (_, atom) in structure.atoms_in(residue_id) {
            if !filter.accepts(atom) {
                continue;
            }
            if !is_finite_point(&atom.position) {
                return Err(EngineError::NonFiniteCoordinate {
                    chain_id: structure
                        .chain(chain_id)
                        .map(|c| c.id.clone())
                        .unwrap_or_default(),
                    residue: residue.number,
                    atom: atom.name.clone(),
                });
            }
            points.push(atom.position);
        }
    }
    Ok(())
}
