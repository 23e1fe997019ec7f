//! # ifres Core Library
//!
//! Detection of interface residues in solved protein structures: the residues of a target
//! chain that have at least one heavy atom within a distance cutoff of a heavy atom of
//! another chain.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** The read-only structural model (`Structure`), spatial
//!   indexes answering radius queries, and readers and writers for PDB, mmCIF and FASTA.
//!
//! - **[`engine`]: The Logic Core.** Detection configuration and validation, resolution of
//!   target and partner chains, the partner-atom and residue-scan tasks, progress
//!   reporting and the result set.
//!
//! - **[`workflows`]: The Public API.** [`workflows::detect::run`] ties the layers together
//!   into one call from a structure and a configuration to an interface result.
//!
//! ## Example
//!
//! ```
//! use ifres::core::models::builder::StructureBuilder;
//! use ifres::engine::config::DetectionConfigBuilder;
//! use ifres::engine::progress::ProgressReporter;
//! use ifres::workflows::detect;
//! use nalgebra::Point3;
//!
//! let mut builder = StructureBuilder::new("DEMO");
//! builder.start_chain("E");
//! builder.start_residue(11, "GLY")?;
//! builder.add_atom(1, "CA", "C", Point3::new(0.0, 0.0, 0.0))?;
//! builder.start_chain("A");
//! builder.start_residue(1, "LEU")?;
//! builder.add_atom(2, "CB", "C", Point3::new(0.0, 0.0, 6.0))?;
//! let structure = builder.build();
//!
//! let config = DetectionConfigBuilder::new().target_chain("E").cutoff(8.0).build()?;
//! let result = detect::run(&structure, &config, &ProgressReporter::new())?;
//! assert_eq!(result.residues(), &[11]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
