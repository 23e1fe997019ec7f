//! # Engine Module
//!
//! The stateful side of interface detection: configuration, resolution of the chains a run
//! works on, the computational tasks, and the result set.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - [`config::DetectionConfig`], its builder and validation
//! - **Context** ([`context`]) - Model, target and partner chains resolved against a structure
//! - **Tasks** ([`tasks`]) - Partner atom collection and the per-residue scan
//! - **Results** ([`result`]) - Sorted interface residues and their JSON and text projections
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - [`error::EngineError`]

pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod result;
pub(crate) mod tasks;
