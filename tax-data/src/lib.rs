//! Reference data, request batches and engine configuration loaded from
//! CSV and TOML files.

pub mod batch;
pub mod config;
mod loader;

pub use batch::BatchLoadError;
pub use config::ConfigLoadError;
pub use loader::{
    BracketRecord, BracketTableLoader, ClassificationLoader, ClassificationRecord,
    DEFAULT_HIGH_RATIO_TABLE, DEFAULT_LOW_RATIO_TABLE, ReferenceDataBuilder, ReferenceDataError,
    default_reference_data,
};
