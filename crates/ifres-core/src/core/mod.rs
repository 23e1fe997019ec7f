//! # Core Module
//!
//! Stateless building blocks: the structural data model, spatial indexing, file I/O and
//! small shared utilities.
//!
//! ## Architecture
//!
//! - **Structural Representation** ([`models`]) - Structures, models, chains, residues and atoms
//! - **Spatial Indexing** ([`spatial`]) - Closed-ball radius queries over 3-D points
//! - **File I/O** ([`io`]) - PDB and mmCIF readers, chain-only PDB and FASTA writers
//! - **Utilities** ([`utils`]) - Residue and element identification, distance helpers

pub mod io;
pub mod models;
pub mod spatial;
pub mod utils;
