//! Step structs
//!
//! A step is one user-level action or check in a scenario. Steps drive page
//! objects and the CLI wrappers, log what they do with a `[step]` prefix and
//! turn failed checks into [`E2eError::Assertion`](crate::error::E2eError).

pub mod apps;
pub mod auth;
pub mod disks;
pub mod files;
pub mod organization;
pub mod project;
pub mod secrets;

pub use apps::AppsSteps;
pub use auth::AuthSteps;
pub use disks::DisksSteps;
pub use files::FilesSteps;
pub use organization::OrganizationSteps;
pub use project::ProjectSteps;
pub use secrets::SecretsSteps;

use crate::cli::Cli;
use crate::config::E2eConfig;
use crate::pages::manager::PageManager;

/// Every step struct of one session
#[derive(Clone)]
pub struct StepsManager {
    pub auth: AuthSteps,
    pub organization: OrganizationSteps,
    pub project: ProjectSteps,
    pub apps: AppsSteps,
    pub files: FilesSteps,
    pub disks: DisksSteps,
    pub secrets: SecretsSteps,
}

impl StepsManager {
    pub fn new(pages: PageManager, cli: Cli, config: &E2eConfig) -> Self {
        Self {
            auth: AuthSteps::new(pages.clone(), config.url("/")),
            organization: OrganizationSteps::new(pages.clone(), cli.clone()),
            project: ProjectSteps::new(pages.clone(), cli.clone()),
            apps: AppsSteps::new(pages.clone(), config),
            files: FilesSteps::new(pages.clone(), cli.clone()),
            disks: DisksSteps::new(pages.clone(), cli.clone()),
            secrets: SecretsSteps::new(pages, cli),
        }
    }
}
