use crate::core::io::traits::StructureReader;
use crate::core::models::atom::{DEFAULT_B_FACTOR, DEFAULT_OCCUPANCY};
use crate::core::models::builder::{BuildError, StructureBuilder};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: CifParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum CifParseErrorKind {
    #[error("Unterminated quoted value")]
    UnterminatedQuote,
    #[error("Unterminated ';' text field")]
    UnterminatedTextField,
    #[error("Loop has {values} values, which is not a multiple of its {tags} tags")]
    LoopMismatch { values: usize, tags: usize },
    #[error("Loop '_atom_site' has no column for {0}")]
    MissingColumn(&'static str),
    #[error("Value for {tag} is missing")]
    MissingValue { tag: &'static str },
    #[error("Invalid integer for {tag} (value: '{value}')")]
    InvalidInt { tag: &'static str, value: String },
    #[error("Invalid float for {tag} (value: '{value}')")]
    InvalidFloat { tag: &'static str, value: String },
    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    line: usize,
}

fn parse_error(line: usize, kind: CifParseErrorKind) -> CifError {
    CifError::Parse { line, kind }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CifError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut index = 0;
    let mut line = 1;
    let mut line_start = true;

    let is_blank = |b: u8| matches!(b, b' ' | b'\t' | b'\r' | b'\n');

    while index < bytes.len() {
        match bytes[index] {
            b'\n' => {
                line += 1;
                line_start = true;
                index += 1;
            }
            b'\r' | b'\t' | b' ' => index += 1,
            b'#' => {
                while index < bytes.len() && bytes[index] != b'\n' {
                    index += 1;
                }
            }
            b';' if line_start => {
                let start_line = line;
                let start = index + 1;
                index += 1;
                let mut end = None;
                while index < bytes.len() {
                    if bytes[index] == b'\n' {
                        line += 1;
                        if bytes.get(index + 1) == Some(&b';') {
                            end = Some(index);
                            index += 2;
                            break;
                        }
                    }
                    index += 1;
                }
                let end = end
                    .ok_or_else(|| parse_error(start_line, CifParseErrorKind::UnterminatedTextField))?;
                tokens.push(Token {
                    text: input[start..end].trim_end_matches('\r').to_string(),
                    line: start_line,
                });
                line_start = false;
            }
            quote @ (b'"' | b'\'') => {
                // A quote only closes the value when followed by whitespace or end of input.
                index += 1;
                let start = index;
                loop {
                    match bytes.get(index) {
                        None | Some(b'\n') => {
                            return Err(parse_error(line, CifParseErrorKind::UnterminatedQuote));
                        }
                        Some(&b) if b == quote
                            && bytes.get(index + 1).is_none_or(|&next| is_blank(next)) =>
                        {
                            break;
                        }
                        Some(_) => index += 1,
                    }
                }
                tokens.push(Token {
                    text: input[start..index].to_string(),
                    line,
                });
                index += 1;
                line_start = false;
            }
            _ => {
                let start = index;
                while index < bytes.len() && !is_blank(bytes[index]) {
                    index += 1;
                }
                tokens.push(Token {
                    text: input[start..index].to_string(),
                    line,
                });
                line_start = false;
            }
        }
    }

    Ok(tokens)
}

/// Returns `None` for the CIF null markers `?` and `.`.
fn non_null(value: &str) -> Option<&str> {
    match value {
        "" | "?" | "." => None,
        v => Some(v),
    }
}

/// Column positions of the `_atom_site` items the reader understands.
#[derive(Debug, Default)]
struct AtomSiteColumns {
    id: Option<usize>,
    type_symbol: Option<usize>,
    label_atom_id: Option<usize>,
    auth_atom_id: Option<usize>,
    label_alt_id: Option<usize>,
    label_comp_id: Option<usize>,
    auth_comp_id: Option<usize>,
    label_asym_id: Option<usize>,
    auth_asym_id: Option<usize>,
    label_seq_id: Option<usize>,
    auth_seq_id: Option<usize>,
    ins_code: Option<usize>,
    cartn_x: Option<usize>,
    cartn_y: Option<usize>,
    cartn_z: Option<usize>,
    occupancy: Option<usize>,
    b_iso: Option<usize>,
    model_num: Option<usize>,
}

impl AtomSiteColumns {
    fn from_tags(tags: &[Token]) -> Self {
        let mut columns = Self::default();
        for (i, tag) in tags.iter().enumerate() {
            let item = tag.text.to_ascii_lowercase();
            let slot = match item.trim_start_matches("_atom_site.") {
                "id" => &mut columns.id,
                "type_symbol" => &mut columns.type_symbol,
                "label_atom_id" => &mut columns.label_atom_id,
                "auth_atom_id" => &mut columns.auth_atom_id,
                "label_alt_id" => &mut columns.label_alt_id,
                "label_comp_id" => &mut columns.label_comp_id,
                "auth_comp_id" => &mut columns.auth_comp_id,
                "label_asym_id" => &mut columns.label_asym_id,
                "auth_asym_id" => &mut columns.auth_asym_id,
                "label_seq_id" => &mut columns.label_seq_id,
                "auth_seq_id" => &mut columns.auth_seq_id,
                "pdbx_pdb_ins_code" => &mut columns.ins_code,
                "cartn_x" => &mut columns.cartn_x,
                "cartn_y" => &mut columns.cartn_y,
                "cartn_z" => &mut columns.cartn_z,
                "occupancy" => &mut columns.occupancy,
                "b_iso_or_equiv" => &mut columns.b_iso,
                "pdbx_pdb_model_num" => &mut columns.model_num,
                _ => continue,
            };
            *slot = Some(i);
        }
        columns
    }

    fn require(column: Option<usize>, name: &'static str, line: usize) -> Result<usize, CifError> {
        column.ok_or_else(|| parse_error(line, CifParseErrorKind::MissingColumn(name)))
    }
}

/// Reads one row of an `_atom_site` loop into the builder.
struct AtomSiteRow<'a> {
    values: &'a [Token],
    line: usize,
}

impl<'a> AtomSiteRow<'a> {
    fn get(&self, column: Option<usize>) -> Option<&'a str> {
        column
            .and_then(|i| self.values.get(i))
            .and_then(|t| non_null(&t.text))
    }

    /// Returns the first non-null value among the given columns.
    fn first_of(&self, columns: &[Option<usize>]) -> Option<&'a str> {
        columns.iter().find_map(|&c| self.get(c))
    }

    fn int<T: std::str::FromStr>(&self, value: &str, tag: &'static str) -> Result<T, CifError> {
        value.parse().map_err(|_| {
            parse_error(
                self.line,
                CifParseErrorKind::InvalidInt {
                    tag,
                    value: value.to_string(),
                },
            )
        })
    }

    fn float(&self, column: usize, tag: &'static str) -> Result<f64, CifError> {
        let value = self
            .get(Some(column))
            .ok_or_else(|| parse_error(self.line, CifParseErrorKind::MissingValue { tag }))?;
        self.parse_float(value, tag)
    }

    /// Like [`Self::float`], but a missing column or null value yields `default`.
    fn float_or(
        &self,
        column: Option<usize>,
        tag: &'static str,
        default: f64,
    ) -> Result<f64, CifError> {
        match self.get(column) {
            Some(value) => self.parse_float(value, tag),
            None => Ok(default),
        }
    }

    fn parse_float(&self, value: &str, tag: &'static str) -> Result<f64, CifError> {
        // Strip a standard uncertainty suffix such as "12.345(6)".
        let value = value.split('(').next().unwrap_or(value);
        value.parse().map_err(|_| {
            parse_error(
                self.line,
                CifParseErrorKind::InvalidFloat {
                    tag,
                    value: value.to_string(),
                },
            )
        })
    }
}

/// Reader for the `_atom_site` category of PDBx/mmCIF files.
///
/// Author-assigned identifiers (`auth_asym_id`, `auth_seq_id`) are preferred over the
/// label identifiers, matching the chain and residue numbering used by PDB files and most
/// downstream tools. The name of the first `data_` block becomes the structure name.
pub struct CifFile;

impl StructureReader for CifFile {
    type Error = CifError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let tokens = tokenize(&input)?;

        let mut builder = StructureBuilder::new("");
        let mut named = false;
        let mut found_atom_site = false;
        let mut cursor = 0;

        while cursor < tokens.len() {
            let token = &tokens[cursor];
            if let Some(block) = token.text.strip_prefix("data_") {
                if !named {
                    builder.set_name(block);
                    named = true;
                }
                cursor += 1;
            } else if token.text.eq_ignore_ascii_case("loop_") {
                let loop_line = token.line;
                cursor += 1;
                let tag_start = cursor;
                while cursor < tokens.len() && tokens[cursor].text.starts_with('_') {
                    cursor += 1;
                }
                let tags = &tokens[tag_start..cursor];
                let value_start = cursor;
                while cursor < tokens.len() && !is_structural(&tokens[cursor].text) {
                    cursor += 1;
                }
                let values = &tokens[value_start..cursor];

                let is_atom_site = !tags.is_empty()
                    && tags
                        .iter()
                        .all(|t| t.text.to_ascii_lowercase().starts_with("_atom_site."));
                if !is_atom_site {
                    continue;
                }
                if values.len() % tags.len() != 0 {
                    return Err(parse_error(
                        loop_line,
                        CifParseErrorKind::LoopMismatch {
                            values: values.len(),
                            tags: tags.len(),
                        },
                    ));
                }
                read_atom_site_loop(&mut builder, tags, values, loop_line)?;
                found_atom_site = true;
            } else {
                // Single-valued items and anything outside a loop carry no coordinates.
                cursor += 1;
            }
        }

        if !found_atom_site || builder.is_empty() {
            return Err(CifError::MissingRecord("_atom_site loop".into()));
        }
        Ok(builder.build())
    }
}

fn is_structural(text: &str) -> bool {
    text.starts_with('_')
        || text.eq_ignore_ascii_case("loop_")
        || text.starts_with("data_")
        || text.starts_with("save_")
}

fn read_atom_site_loop(
    builder: &mut StructureBuilder,
    tags: &[Token],
    values: &[Token],
    loop_line: usize,
) -> Result<(), CifError> {
    let columns = AtomSiteColumns::from_tags(tags);
    let x_col = AtomSiteColumns::require(columns.cartn_x, "Cartn_x", loop_line)?;
    let y_col = AtomSiteColumns::require(columns.cartn_y, "Cartn_y", loop_line)?;
    let z_col = AtomSiteColumns::require(columns.cartn_z, "Cartn_z", loop_line)?;

    let mut current_model: Option<usize> = None;
    let mut current_chain: Option<&str> = None;
    let mut current_residue: Option<(isize, Option<char>, &str)> = None;

    for (row_index, chunk) in values.chunks(tags.len()).enumerate() {
        let row = AtomSiteRow {
            values: chunk,
            line: chunk.first().map_or(loop_line, |t| t.line),
        };
        let build_error = |e: BuildError| parse_error(row.line, e.into());

        let model_serial: usize = match row.get(columns.model_num) {
            Some(v) => row.int(v, "pdbx_PDB_model_num")?,
            None => 1,
        };
        if current_model != Some(model_serial) {
            builder.start_model(model_serial);
            current_model = Some(model_serial);
            current_chain = None;
            current_residue = None;
        }

        let chain_id = row
            .first_of(&[columns.auth_asym_id, columns.label_asym_id])
            .ok_or_else(|| {
                parse_error(row.line, CifParseErrorKind::MissingValue { tag: "auth_asym_id" })
            })?;
        if current_chain != Some(chain_id) {
            builder.start_chain(chain_id);
            current_chain = Some(chain_id);
            current_residue = None;
        }

        let seq_id = row
            .first_of(&[columns.auth_seq_id, columns.label_seq_id])
            .ok_or_else(|| {
                parse_error(row.line, CifParseErrorKind::MissingValue { tag: "auth_seq_id" })
            })?;
        let number: isize = row.int(seq_id, "auth_seq_id")?;
        let comp_id = row
            .first_of(&[columns.auth_comp_id, columns.label_comp_id])
            .unwrap_or("UNK");
        let insertion_code = row.get(columns.ins_code).and_then(|code| code.chars().next());
        if current_residue != Some((number, insertion_code, comp_id)) {
            builder
                .start_inserted_residue(number, insertion_code, comp_id)
                .map_err(build_error)?;
            current_residue = Some((number, insertion_code, comp_id));
        }

        let atom_name = row
            .first_of(&[columns.auth_atom_id, columns.label_atom_id])
            .ok_or_else(|| {
                parse_error(row.line, CifParseErrorKind::MissingValue { tag: "label_atom_id" })
            })?;
        if row.get(columns.label_alt_id).is_some() && builder.current_residue_has_atom(atom_name) {
            continue;
        }

        let serial = match row.get(columns.id) {
            Some(v) => row.int(v, "id")?,
            None => row_index + 1,
        };
        let element = row.get(columns.type_symbol).unwrap_or("");
        let position = Point3::new(
            row.float(x_col, "Cartn_x")?,
            row.float(y_col, "Cartn_y")?,
            row.float(z_col, "Cartn_z")?,
        );
        let occupancy = row.float_or(columns.occupancy, "occupancy", DEFAULT_OCCUPANCY)?;
        let b_factor = row.float_or(columns.b_iso, "B_iso_or_equiv", DEFAULT_B_FACTOR)?;
        builder
            .add_atom_with_factors(serial, atom_name, element, position, occupancy, b_factor)
            .map_err(build_error)?;
    }

    Ok(())
}
