//! Commands module - CLI command implementations.

mod migrate;

pub use migrate::{run_migrate, MigrateOptions, MigrateSummary};
