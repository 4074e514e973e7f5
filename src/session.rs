//! One scenario's browser, page objects, steps and CLI

use crate::browser::chrome::ChromeDriver;
use crate::cli::Cli;
use crate::config::E2eConfig;
use crate::data::UserData;
use crate::error::{E2eError, Result};
use crate::pages::manager::PageManager;
use crate::steps::StepsManager;
use std::future::Future;

pub struct TestSession {
    pub config: E2eConfig,
    pub driver: ChromeDriver,
    pub pages: PageManager,
    pub steps: StepsManager,
    pub cli: Cli,
}

impl TestSession {
    /// Launch the browser on the console's start page and wire everything
    /// to that one page.
    pub async fn start(config: E2eConfig) -> Result<Self> {
        config.validate()?;
        let driver = ChromeDriver::from_config(&config).await?;
        driver.navigate(&config.url("/")).await?;
        let page = driver.current_page().await?;

        let pages = PageManager::from_config(page, &config);
        let cli = Cli::from_config(&config);
        let steps = StepsManager::new(pages.clone(), cli.clone(), &config);
        log::info!("Session started against {}", config.base_url);

        Ok(Self {
            config,
            driver,
            pages,
            steps,
            cli,
        })
    }

    /// The configured account, if both email and password are set.
    pub fn configured_user(&self) -> Result<UserData> {
        match (&self.config.user_email, &self.config.user_password) {
            (Some(email), Some(password)) => Ok(UserData::existing(email, password)),
            _ => Err(E2eError::Config(
                "APOLO_E2E_USER_EMAIL and APOLO_E2E_USER_PASSWORD are required".to_string(),
            )),
        }
    }

    /// Point the CLI at the configured organization and project.
    pub async fn prepare_cli(&self) -> Result<()> {
        if let Some(org) = &self.config.organization {
            self.cli.config.switch_org(org).await?;
        }
        if let Some(project) = &self.config.project {
            self.cli.config.switch_project(project).await?;
        }
        Ok(())
    }

    /// Run a scenario body; on failure a screenshot lands in the artifacts
    /// directory before the error is returned.
    pub async fn run_scenario<'a, F, Fut>(&'a self, name: &str, body: F) -> Result<()>
    where
        F: FnOnce(&'a Self) -> Fut,
        Fut: Future<Output = Result<()>> + 'a,
    {
        log::info!("Scenario {:?} started", name);
        match body(self).await {
            Ok(()) => {
                log::info!("Scenario {:?} passed", name);
                Ok(())
            }
            Err(e) => {
                log::error!("Scenario {:?} failed: {}", name, e);
                if let Err(shot) = self
                    .driver
                    .capture_failure(&self.config.artifacts_dir, name)
                    .await
                {
                    log::warn!("Could not capture failure screenshot: {}", shot);
                }
                Err(e)
            }
        }
    }

    pub async fn close(self) -> Result<()> {
        self.driver.close().await
    }
}
