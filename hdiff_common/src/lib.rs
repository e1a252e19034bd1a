pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, save_config, AppConfig, LoadedConfig};
pub use error::{HdiffError, Result};
pub use types::{CompareOptions, DiffOp, OpKind, ReportOptions, ReportStyle};
