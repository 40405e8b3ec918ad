pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::ReportConfig;

pub use adapters::storage::LocalStorage;
pub use core::{catalog::TeamCatalog, etl::EtlEngine, pipeline::ReportPipeline};
pub use utils::error::{ReportError, Result};
