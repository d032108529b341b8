use crate::core::io::traits::StructureFile;
use crate::core::models::residue::{ResidueUid, one_letter_code};
use crate::core::models::structure::{AtomRecord, Structure};
use nalgebra::Point3;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const ALPHA_CARBON: &str = "CA";
const MIN_ATOM_RECORD_LEN: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("PDB file not found at {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("No matching atoms found{}", .chain.map(|c| format!(" for chain '{}'", c)).unwrap_or_default())]
    EmptyStructure { chain: Option<char> },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for an ATOM record (must be at least {required} chars)")]
    LineTooShort { required: usize },
}

/// Record filters applied while reading a PDB file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdbReadOptions {
    /// Keep only records whose chain identifier equals this value.
    pub chain: Option<char>,
    /// Keep only alpha-carbons, one per residue.
    pub alpha_carbons_only: bool,
}

impl PdbReadOptions {
    pub fn alpha_carbons(chain: Option<char>) -> Self {
        Self {
            chain,
            alpha_carbons_only: true,
        }
    }

    pub fn all_atoms(chain: Option<char>) -> Self {
        Self {
            chain,
            alpha_carbons_only: false,
        }
    }
}

fn column_char(line: &str, index: usize) -> char {
    line.as_bytes().get(index).map_or(' ', |&b| b as char)
}

fn parse_coordinate(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let raw = line.get(start..end).unwrap_or("");
    raw.trim().parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: raw.into(),
        },
    })
}

/// Fixed-column PDB reader and coordinate-patching writer.
///
/// Only `ATOM` records are read. Alternate locations other than blank or `A`
/// are skipped outright; in alpha-carbon mode the first surviving record of a
/// residue wins and later duplicates are ignored.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Options = PdbReadOptions;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<Structure, Self::Error> {
        let mut records = Vec::new();
        let mut seen_residues = HashSet::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if !line.starts_with("ATOM") {
                continue;
            }
            let atom_name = line.get(12..16).unwrap_or("").trim();
            if options.alpha_carbons_only && atom_name != ALPHA_CARBON {
                continue;
            }
            let chain_id = column_char(&line, 21);
            if let Some(wanted) = options.chain {
                if chain_id != wanted {
                    continue;
                }
            }

            let alt_loc = column_char(&line, 16);
            if alt_loc != ' ' && alt_loc != 'A' {
                continue;
            }

            let residue_uid = ResidueUid::new(chain_id, line.get(22..27).unwrap_or(""));
            if options.alpha_carbons_only && !seen_residues.insert(residue_uid.clone()) {
                continue;
            }

            if line.len() < MIN_ATOM_RECORD_LEN {
                return Err(PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::LineTooShort {
                        required: MIN_ATOM_RECORD_LEN,
                    },
                });
            }
            let x = parse_coordinate(&line, line_num, 30, 38)?;
            let y = parse_coordinate(&line, line_num, 38, 46)?;
            let z = parse_coordinate(&line, line_num, 46, 54)?;

            let residue_field = line.get(17..20).unwrap_or("");
            records.push(AtomRecord {
                atom_name: atom_name.to_string(),
                residue_name: residue_field.trim().to_string(),
                residue_uid,
                one_letter: one_letter_code(residue_field),
                position: Point3::new(x, y, z),
                raw_line: line,
            });
        }

        if records.is_empty() {
            return Err(PdbError::EmptyStructure {
                chain: options.chain,
            });
        }
        debug!(
            records = records.len(),
            alpha_carbons_only = options.alpha_carbons_only,
            "Parsed PDB atom records."
        );
        Ok(Structure::new(records))
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        for record in structure.records() {
            let line = &record.raw_line;
            let (prefix, suffix) = line
                .get(..30)
                .zip(line.get(MIN_ATOM_RECORD_LEN..))
                .ok_or_else(|| {
                    PdbError::Inconsistency(format!(
                        "Atom record for residue {} has no coordinate columns",
                        record.residue_uid
                    ))
                })?;
            let p = &record.position;
            writeln!(
                writer,
                "{}{:8.3}{:8.3}{:8.3}{}",
                prefix, p.x, p.y, p.z, suffix
            )?;
        }
        Ok(())
    }

    fn read_from_path<P: AsRef<Path>>(
        path: P,
        options: &Self::Options,
    ) -> Result<Structure, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PdbError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => PdbError::Io(e),
        })?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, options)
    }
}
