//! Computational units driven by the alignment workflow.
//!
//! Each task owns one stage of the pipeline and reports through the shared
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter).

pub mod transform_search;
