//! Computational steps of a detection run.
//!
//! Each task takes the resolved [`DetectionContext`](super::context::DetectionContext) and
//! performs one stage: gathering the partner atoms that are indexed, and scanning the
//! target residues against that index.

pub mod partner_atoms;
pub mod residue_scan;
