use crate::cli::Cli;
use crate::data::ProjectData;
use crate::error::{ensure_eq, E2eError, Result};
use crate::pages::manager::PageManager;
use crate::pages::projects::ProjectRole;
use crate::pages::PageObject;

#[derive(Clone)]
pub struct ProjectSteps {
    pages: PageManager,
    cli: Cli,
}

impl ProjectSteps {
    pub fn new(pages: PageManager, cli: Cli) -> Self {
        Self { pages, cli }
    }

    /// The wizard shown right after a new organization is created.
    pub async fn ui_create_first_project(
        &self,
        project: &ProjectData,
        role: Option<ProjectRole>,
    ) -> Result<()> {
        log::info!("[step] Create first project {}", project.name);
        self.pages.create_project.wait_loaded().await?;
        self.pages.create_project.create(&project.name, role).await?;
        self.pages.top_bar.wait_loaded().await
    }

    /// Create another project through the project switcher.
    pub async fn ui_create_project(
        &self,
        project: &ProjectData,
        role: Option<ProjectRole>,
    ) -> Result<()> {
        log::info!("[step] Create project {} from the top bar", project.name);
        self.pages.top_bar.open_create_project().await?;
        self.pages.create_project_popup.wait_loaded().await?;
        self.pages
            .create_project_popup
            .create(&project.name, role, project.make_default)
            .await
    }

    pub async fn ui_switch_project(&self, project: &str) -> Result<()> {
        log::info!("[step] Switch to project {}", project);
        self.pages.top_bar.switch_project(project).await
    }

    pub async fn ui_verify_current_project(&self, project: &str) -> Result<()> {
        log::info!("[step] Verify current project is {}", project);
        let actual = self.pages.top_bar.current_project().await?;
        ensure_eq("current project", project, actual.trim())
    }

    /// Check the project through `admin get-projects` in the CLI's current
    /// cluster.
    pub async fn cli_verify_project(
        &self,
        project: &ProjectData,
        role: Option<ProjectRole>,
    ) -> Result<()> {
        log::info!("[step] CLI: verify project {}", project.name);
        let cluster = self.cli.config.show().await?.cluster;
        let projects = self
            .cli
            .admin
            .get_projects(&cluster, &project.organization)
            .await?;
        let entry = projects
            .iter()
            .find(|p| p.name == project.name)
            .ok_or_else(|| {
                E2eError::Assertion(format!(
                    "project {} not listed in {}",
                    project.name, project.organization
                ))
            })?;
        ensure_eq("project organization", project.organization.as_str(), entry.org.as_str())?;
        ensure_eq("project is default", project.make_default, entry.is_default)?;
        if let Some(role) = role {
            ensure_eq("project default role", role.cli_name(), entry.default_role.to_ascii_lowercase())?;
        }
        Ok(())
    }

    pub async fn cli_create_project(&self, project: &ProjectData) -> Result<()> {
        log::info!("[step] CLI: create project {}", project.name);
        let cluster = self.cli.config.show().await?.cluster;
        self.cli
            .admin
            .add_project(&cluster, &project.organization, &project.name)
            .await
    }

    pub async fn cli_switch_project(&self, project: &ProjectData) -> Result<()> {
        log::info!("[step] CLI: switch to {}/{}", project.organization, project.name);
        self.cli.config.switch_org(&project.organization).await?;
        self.cli.config.switch_project(&project.name).await
    }
}
