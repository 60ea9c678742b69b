pub mod config;
pub mod error;
pub mod tables;
pub mod types;

pub use config::{AppConfig, ClusteringConfig, FileConfig};
pub use error::TriageError;
pub use types::*;
