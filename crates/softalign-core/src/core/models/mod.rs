//! # Core Models Module
//!
//! Plain data structures shared by every stage of the alignment pipeline.
//!
//! ## Key Components
//!
//! - [`structure`] - Ordered atom records with positions and their raw source lines
//! - [`residue`] - Residue identifiers and the three-to-one letter residue table
//! - [`alignment`] - Discrete one-to-one residue correspondences
//!
//! Structures are loaded once and never mutated afterwards; transformations
//! produce new [`structure::Structure`] values through
//! [`structure::Structure::map_positions`].

pub mod alignment;
pub mod residue;
pub mod structure;
