//! # Workflows Module
//!
//! High-level entry points that run the complete superposition pipeline.
//!
//! ## Overview
//!
//! A workflow takes already loaded structures and a validated configuration,
//! centers both coordinate sets, runs the differentiable transform search,
//! decodes the final soft assignment and computes the quality metrics. The
//! returned result also knows how to place a full-atom reload of the mobile
//! structure into the reference frame and how to describe its transform.
//!
//! ## Architecture
//!
//! - **Alignment Workflow** ([`align`]) - Optimization, decoding, Kabsch refit and metrics
//!   for one mobile/reference pair.

pub mod align;
