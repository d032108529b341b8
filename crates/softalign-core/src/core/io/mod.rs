//! Provides input/output functionality for structure files.
//!
//! Structures are read from and written to fixed-column PDB atom records
//! through the [`traits::StructureFile`] interface. The writer patches only the
//! coordinate columns of each original record. [`matrix`] serializes the final
//! superposition as a plain-text transformation report.

pub mod matrix;
pub mod pdb;
pub mod traits;
