use phf::{Map, phf_map};
use std::fmt;

/// One-letter code assigned to residue names missing from the standard table.
pub const UNKNOWN_RESIDUE_CODE: char = 'X';

static THREE_TO_ONE: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
};

/// Maps a three-letter residue name to its one-letter code.
///
/// The lookup is exact: the name is taken verbatim from columns 18-20 of the
/// atom record, so padded or lower-case names fall through to
/// [`UNKNOWN_RESIDUE_CODE`].
pub fn one_letter_code(residue_name: &str) -> char {
    THREE_TO_ONE
        .get(residue_name)
        .copied()
        .unwrap_or(UNKNOWN_RESIDUE_CODE)
}

/// Identifies one residue within a structure file.
///
/// Built from the chain identifier (column 22) and the raw residue
/// sequence number plus insertion code (columns 23-27). The sequence field is
/// kept as text so that `"  10A"` and `"  10 "` stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueUid {
    pub chain_id: char,
    pub sequence: String,
}

impl ResidueUid {
    pub fn new(chain_id: char, sequence: &str) -> Self {
        Self {
            chain_id,
            sequence: sequence.to_string(),
        }
    }
}

impl fmt::Display for ResidueUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.sequence.trim())
    }
}
