//! # SoftAlign Core Library
//!
//! Differentiable rigid-body superposition of protein backbones without a
//! pre-computed residue correspondence.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so every stage can be
//! tested and replaced in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Alignment`),
//!   the exponential-map transform, the soft correspondence scorer with its
//!   reverse-mode gradient, the Kabsch refiner, metrics and PDB I/O.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer runs the optimization.
//!   It owns the configuration, the AdamW moment estimates, the
//!   differentiable-objective abstraction and the correspondence decoder.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a
//!   single `align` call returning the transform, the decoded alignment and its
//!   metrics, plus the helpers that place a full-atom structure into the
//!   reference frame.

pub mod core;
pub mod engine;
pub mod workflows;
