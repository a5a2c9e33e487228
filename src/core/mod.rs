//! Core module - CSV source, record transformation and the migration driver

pub mod config;
pub mod error;
pub mod migration;
pub mod source;
pub mod transform;

pub use config::{Config, ConfigError};
pub use error::MigrationError;
pub use migration::{MigratedTest, MigrationStats, Migrator, TestApi};
pub use source::{RowSource, SourceRow};
pub use transform::{build_parameters_json, build_steps_json, ParameterTable, TransformedRow};
