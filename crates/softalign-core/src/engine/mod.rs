//! # Engine Module
//!
//! This module implements the stateful optimization engine that finds the rigid
//! transform maximizing the soft correspondence score.
//!
//! ## Overview
//!
//! The engine owns everything that changes during a run: the 6-parameter
//! transform vector, the AdamW moment estimates and the progress stream. It
//! drives a [`objective::DifferentiableObjective`] for a fixed number of steps
//! and hands the final soft assignment to a [`decoder::CorrespondenceDecoder`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Scoring and optimization parameters with a validating builder
//! - **Objective** ([`objective`]) - Score and parameter gradient behind a single trait
//! - **Optimizer** ([`optimizer`]) - AdamW state with bias correction and decoupled weight decay
//! - **Decoding** ([`decoder`]) - Soft assignment to discrete one-to-one alignment
//! - **State Tracking** ([`state`]) - Final parameters, transform, score and assignment
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod decoder;
pub mod error;
pub mod objective;
pub mod optimizer;
pub mod progress;
pub mod state;
pub(crate) mod tasks;
