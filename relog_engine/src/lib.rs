#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const RELOG_VERSION: &str = env!("CARGO_PKG_VERSION");

// Normalization core
pub mod cast;
pub mod damage;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod player;
pub mod prescan;
pub mod protected;
pub mod rules;

// Configuration and file handling
pub mod data_paths;
pub mod loader;
pub mod log_files;

// Re-exports for convenience
pub use error::{Diagnostic, RelogError};
pub use loader::load_rule_set;
pub use log_files::{RunOptions, RunSummary, process_file};
pub use pipeline::{LineOutcome, NormalizeReport, Normalizer};
pub use player::PlayerName;
