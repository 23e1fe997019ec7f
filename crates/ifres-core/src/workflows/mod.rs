//! # Workflows Module
//!
//! High-level entry points that tie the [`core`](crate::core) data model and the
//! [`engine`](crate::engine) together.
//!
//! - **Detection Workflow** ([`detect`]) - Interface residue detection on one model of a
//!   structure: validate, resolve chains, index partner atoms, scan target residues.

pub mod detect;
