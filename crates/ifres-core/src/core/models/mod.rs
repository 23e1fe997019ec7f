//! # Core Models Module
//!
//! This module contains the data structures used to represent solved macromolecular
//! structures in ifres.
//!
//! ## Overview
//!
//! A [`structure::Structure`] owns one or more models; each model owns chains, each chain
//! owns residues and each residue owns atoms. Storage is arena-based (slot maps), so every
//! child refers to its parent through a small copyable key rather than a pointer. After a
//! structure has been built it is treated as read-only.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom name, element, serial number, coordinates, occupancy and B-factor
//! - [`residue`] - Residues (number plus insertion code) and the amino acid classification
//! - [`chain`] - Chains and their ordered residues
//! - [`model`] - Coordinate sets (models) and per-model chain lookup
//! - [`structure`] - The root container and read-only traversal
//! - [`builder`] - Incremental, file-order construction used by readers and tests
//! - [`ids`] - Arena keys for atoms, residues, chains and models
//!
//! ## Usage
//!
//! ```
//! use ifres::core::models::builder::StructureBuilder;
//! use nalgebra::Point3;
//!
//! let mut builder = StructureBuilder::new("DEMO");
//! builder.start_model(1).start_chain("A");
//! builder.start_residue(1, "ALA")?;
//! builder.add_atom(1, "CA", "C", Point3::new(0.0, 0.0, 0.0))?;
//! let structure = builder.build();
//!
//! assert_eq!(structure.atom_count(), 1);
//! # Ok::<(), ifres::core::models::builder::BuildError>(())
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ids;
pub mod model;
pub mod residue;
pub mod structure;
