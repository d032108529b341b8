use super::residue::ResidueUid;
use crate::core::utils::geometry;
use nalgebra::Point3;

/// A single retained atom record.
///
/// `raw_line` is the untouched source line; writers patch only its coordinate
/// columns, so every other byte of the record survives a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub atom_name: String,
    pub residue_name: String,
    pub residue_uid: ResidueUid,
    pub one_letter: char,
    pub position: Point3<f64>,
    pub raw_line: String,
}

impl AtomRecord {
    pub fn chain_id(&self) -> char {
        self.residue_uid.chain_id
    }
}

/// An ordered, immutable list of atom records loaded from one structure file.
///
/// When loaded in alpha-carbon mode there is exactly one record per residue,
/// so the record index doubles as the residue index used by the alignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    records: Vec<AtomRecord>,
}

impl Structure {
    pub fn new(records: Vec<AtomRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AtomRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn coordinates(&self) -> Vec<Point3<f64>> {
        self.records.iter().map(|r| r.position).collect()
    }

    pub fn raw_lines(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.raw_line.as_str())
    }

    /// One-letter sequence, index-aligned with [`Structure::coordinates`].
    pub fn sequence(&self) -> String {
        self.records.iter().map(|r| r.one_letter).collect()
    }

    /// Arithmetic mean of all record positions, or `None` for an empty structure.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        geometry::centroid(&self.coordinates())
    }

    /// Returns a copy with every position passed through `f`; all other record
    /// content, including the raw line, is carried over unchanged.
    pub fn map_positions<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Point3<f64>) -> Point3<f64>,
    {
        let records = self
            .records
            .iter()
            .map(|r| AtomRecord {
                position: f(&r.position),
                ..r.clone()
            })
            .collect();
        Self { records }
    }
}
