//! Wrappers around the platform CLI
//!
//! The CLI is used to prepare backend state before a UI scenario and to
//! verify what the UI did afterwards. Each domain wrapper shells out through
//! [`CliRunner`] and parses the text the CLI prints.

pub mod admin;
pub mod config;
pub mod disk;
pub mod job;
pub mod runner;
pub mod secret;
pub mod storage;
pub mod table;

pub use admin::AdminCli;
pub use config::ConfigCli;
pub use disk::DiskCli;
pub use job::JobCli;
pub use runner::{CliOutput, CliRunner};
pub use secret::SecretCli;
pub use storage::StorageCli;

use crate::config::E2eConfig;

/// All CLI wrappers sharing one runner
#[derive(Debug, Clone)]
pub struct Cli {
    pub admin: AdminCli,
    pub config: ConfigCli,
    pub disk: DiskCli,
    pub job: JobCli,
    pub secret: SecretCli,
    pub storage: StorageCli,
}

impl Cli {
    pub fn new(runner: CliRunner) -> Self {
        Self {
            admin: AdminCli::new(runner.clone()),
            config: ConfigCli::new(runner.clone()),
            disk: DiskCli::new(runner.clone()),
            job: JobCli::new(runner.clone()),
            secret: SecretCli::new(runner.clone()),
            storage: StorageCli::new(runner),
        }
    }

    /// Runner built from the suite configuration. The terminal width is
    /// forced wide so tables are not wrapped.
    pub fn from_config(config: &E2eConfig) -> Self {
        Self::new(
            CliRunner::from_config(config)
                .with_env("COLUMNS", "1000")
                .with_env("NO_COLOR", "1"),
        )
    }
}
