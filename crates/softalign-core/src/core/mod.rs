//! # Core Module
//!
//! Stateless building blocks of the superposition pipeline.
//!
//! ## Overview
//!
//! Everything here is a pure function of its inputs: structure models and PDB
//! I/O, the 6-parameter rigid transform encoding, the differentiable soft
//! correspondence scorer, the Kabsch refiner and the quality metrics. None of
//! it owns optimizer state; that lives in [`crate::engine`].
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atom records, residue ids and discrete alignments
//! - **File I/O** ([`io`]) - Fixed-column PDB reading and writing, transformation reports
//! - **Parameterization** ([`transform`]) - Exponential-map rotations and their Jacobian
//! - **Scoring** ([`scoring`]) - TM-style kernel, Sinkhorn normalization, soft score with gradients
//! - **Refinement** ([`kabsch`]) - Closed-form least-squares rigid fit
//! - **Evaluation** ([`metrics`]) - RMSD, TM-scores and sequence identity

pub mod io;
pub mod kabsch;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod transform;
pub mod utils;
