//! `crosscheck-recon` — two-dataset field reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded datasets, returns ordered
//! mismatch records. No CLI or IO dependencies.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod model;

pub use config::CompareConfig;
pub use dataset::Dataset;
pub use engine::run;
pub use error::ReconError;
pub use model::{AlignMode, Locator, Mismatch, ReconReport, ReconSummary, MISSING};
