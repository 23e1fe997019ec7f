//! Reading and writing structure files.
//!
//! Readers implement [`traits::StructureReader`] and produce a
//! [`Structure`](crate::core::models::structure::Structure). [`read_structure`] picks the
//! reader from the file extension. Writers cover the two exports of a single chain: a
//! chain-only PDB file and a FASTA sequence.

pub mod cif;
pub mod fasta;
pub mod pdb;
pub mod traits;

use crate::core::models::structure::Structure;
use cif::{CifError, CifFile};
use pdb::{PdbError, PdbFile};
use std::path::{Path, PathBuf};
use thiserror::Error;
use traits::StructureReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Pdb,
    Mmcif,
}

impl StructureFormat {
    /// Guesses the format from a file extension (`.pdb`, `.ent`, `.cif`, `.mmcif`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdb" | "ent" => Some(Self::Pdb),
            "cif" | "mmcif" => Some(Self::Mmcif),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Unsupported structure file extension: {0}")]
    UnsupportedFormat(PathBuf),
    #[error(transparent)]
    Pdb(#[from] PdbError),
    #[error(transparent)]
    Cif(#[from] CifError),
}

/// Reads a structure file, choosing the reader from the file extension.
pub fn read_structure<P: AsRef<Path>>(path: P) -> Result<Structure, ReadError> {
    let path = path.as_ref();
    match StructureFormat::from_path(path) {
        Some(StructureFormat::Pdb) => Ok(PdbFile::read_from_path(path)?),
        Some(StructureFormat::Mmcif) => Ok(CifFile::read_from_path(path)?),
        None => Err(ReadError::UnsupportedFormat(path.to_path_buf())),
    }
}
