use crate::core::io::traits::StructureReader;
use crate::core::models::atom::{DEFAULT_B_FACTOR, DEFAULT_OCCUPANCY};
use crate::core::models::builder::{BuildError, StructureBuilder};
use crate::core::models::ids::ChainId;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Chain '{chain_id}' cannot be written to PDB: chain identifiers are one character")]
    ChainIdTooLong { chain_id: String },
    #[error("Chain not found in structure")]
    UnknownChain,
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
    #[error(transparent)]
    Build(#[from] BuildError),
}

const COORDINATE_END: usize = 54;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    (start, end): (usize, usize),
    line_num: usize,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, (start, end): (usize, usize), line_num: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Parses an optional numeric field, falling back to `default` when the columns are blank or
/// past the end of the line.
fn parse_float_or(
    line: &str,
    columns: (usize, usize),
    line_num: usize,
    default: f64,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, columns.0, columns.1).is_empty() {
        return Ok(default);
    }
    parse_float(line, columns, line_num)
}

/// Reader and chain-level writer for the fixed-column PDB format.
///
/// Only the records needed to rebuild the coordinate hierarchy are interpreted: `HEADER`
/// (for the entry identifier), `MODEL`/`ENDMDL`, `ATOM`/`HETATM` and `END`. Everything else
/// is skipped. Of several alternate locations of one atom, the first one in the file is kept.
pub struct PdbFile;

impl StructureReader for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut builder = StructureBuilder::new("");
        let mut models_seen = 0usize;
        let mut current_chain: Option<String> = None;
        let mut current_residue: Option<(isize, Option<char>, String)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "HEADER" => {
                    let id_code = slice_and_trim(&line, 62, 66);
                    if !id_code.is_empty() {
                        builder.set_name(id_code);
                    }
                }
                "MODEL" => {
                    models_seen += 1;
                    let serial_str = slice_and_trim(&line, 6, 20);
                    let serial = if serial_str.is_empty() {
                        models_seen
                    } else {
                        parse_int(&line, (6, 20), line_num)?
                    };
                    builder.start_model(serial);
                    current_chain = None;
                    current_residue = None;
                }
                "ENDMDL" => {
                    current_chain = None;
                    current_residue = None;
                }
                "END" => break,
                "ATOM" | "HETATM" => {
                    if line.len() < COORDINATE_END {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let serial: usize = parse_int(&line, (6, 11), line_num)?;
                    let name = slice_and_trim(&line, 12, 16);
                    let alt_loc = slice_and_trim(&line, 16, 17);
                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_id = match slice_and_trim(&line, 21, 22) {
                        "" => "A",
                        id => id,
                    };
                    let res_seq: isize = parse_int(&line, (22, 26), line_num)?;
                    let i_code = slice_and_trim(&line, 26, 27).chars().next();
                    let x = parse_float(&line, (30, 38), line_num)?;
                    let y = parse_float(&line, (38, 46), line_num)?;
                    let z = parse_float(&line, (46, 54), line_num)?;
                    let occupancy = parse_float_or(&line, (54, 60), line_num, DEFAULT_OCCUPANCY)?;
                    let b_factor = parse_float_or(&line, (60, 66), line_num, DEFAULT_B_FACTOR)?;
                    let element = slice_and_trim(&line, 76, 78);

                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }

                    if current_chain.as_deref() != Some(chain_id) {
                        builder.start_chain(chain_id);
                        current_chain = Some(chain_id.to_string());
                        current_residue = None;
                    }
                    let residue_key = (res_seq, i_code, res_name.to_string());
                    if current_residue.as_ref() != Some(&residue_key) {
                        builder
                            .start_inserted_residue(res_seq, i_code, res_name)
                            .map_err(|e| PdbError::Parse {
                                line: line_num,
                                kind: e.into(),
                            })?;
                        current_residue = Some(residue_key);
                    }

                    if !alt_loc.is_empty() && builder.current_residue_has_atom(name) {
                        continue;
                    }

                    builder
                        .add_atom_with_factors(
                            serial,
                            name,
                            element,
                            Point3::new(x, y, z),
                            occupancy,
                            b_factor,
                        )
                        .map_err(|e| PdbError::Parse {
                            line: line_num,
                            kind: e.into(),
                        })?;
                }
                _ => {}
            }
        }

        if builder.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok(builder.build())
    }
}

impl PdbFile {
    /// Writes the atoms of a single chain as a standalone PDB file.
    ///
    /// Standard amino acids are written as `ATOM`, everything else as `HETATM`. Atom serials
    /// are renumbered from 1, while insertion codes, occupancies and B-factors are written as
    /// read. The chain is closed with `TER` and the file with `END`.
    pub fn write_chain_to(
        structure: &Structure,
        chain_id: ChainId,
        writer: &mut impl Write,
    ) -> Result<(), PdbError> {
        let chain = structure.chain(chain_id).ok_or(PdbError::UnknownChain)?;
        if chain.id.chars().count() != 1 {
            return Err(PdbError::ChainIdTooLong {
                chain_id: chain.id.clone(),
            });
        }

        let mut serial = 0usize;
        let mut last_residue = None;
        for (residue_id, residue) in structure.residues_in(chain_id) {
            let record_type = if residue.is_standard_amino_acid() {
                "ATOM"
            } else {
                "HETATM"
            };
            for (_, atom) in structure.atoms_in(residue_id) {
                serial += 1;
                writeln!(
                    writer,
                    "{:<6}{:>5} {} {:>3} {:1}{:>4}{:1}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                    record_type,
                    serial % 100_000,
                    format_atom_name(&atom.name, &atom.element),
                    residue.name,
                    chain.id,
                    residue.number,
                    residue.insertion_code.unwrap_or(' '),
                    atom.position.x,
                    atom.position.y,
                    atom.position.z,
                    atom.occupancy,
                    atom.b_factor,
                    atom.element
                )?;
            }
            last_residue = Some(residue);
        }

        if let Some(residue) = last_residue {
            serial += 1;
            writeln!(
                writer,
                "TER   {:>5}      {:>3} {:1}{:>4}{}",
                serial % 100_000,
                residue.name,
                chain.id,
                residue.number,
                residue.insertion_code.map(String::from).unwrap_or_default()
            )?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }

    pub fn write_chain_to_path<P: AsRef<Path>>(
        structure: &Structure,
        chain_id: ChainId,
        path: P,
    ) -> Result<(), PdbError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_chain_to(structure, chain_id, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Places an atom name in the four-character name field.
///
/// Names of one-letter elements start in the second column of the field (" CA "), while
/// four-character names and names of two-letter elements start in the first ("FE  ").
fn format_atom_name(name: &str, element: &str) -> String {
    if name.len() >= 4 || element.len() == 2 {
        format!("{:<4}", name)
    } else {
        format!(" {:<3}", name)
    }
}
