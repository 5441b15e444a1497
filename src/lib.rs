//! Caduceus DNA Analysis - prediction service client
//!
//! Submits DNA sequences to a remote classifier, renders single-label or
//! multi-label predictions, and fetches SHAP feature-importance reports.

pub mod logging;
pub mod prediction;

pub use prediction::*;
