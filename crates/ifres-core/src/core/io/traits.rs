use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading a structure file format.
///
/// Implementors handle format-specific parsing and hand the records to a
/// [`StructureBuilder`](crate::core::models::builder::StructureBuilder).
pub trait StructureReader {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error>;

    /// Reads a structure from a file path.
    ///
    /// When the file itself does not name the structure, the file stem is used as its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Structure, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut structure = Self::read_from(&mut reader)?;
        if structure.name().is_empty() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                structure.set_name(stem);
            }
        }
        Ok(structure)
    }
}
