use crate::config::E2eConfig;
use crate::error::{E2eError, Result};
use crate::export::{existing_downloads, wait_for_download, AppExport};
use crate::pages::manager::PageManager;
use crate::pages::output_panel::output_value;
use crate::pages::PageObject;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Apps take a while to deploy; status checks get their own budget.
const APP_STATUS_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Clone)]
pub struct AppsSteps {
    pages: PageManager,
    download_dir: PathBuf,
    download_timeout: Duration,
    poll_interval: Duration,
}

impl AppsSteps {
    pub fn new(pages: PageManager, config: &E2eConfig) -> Self {
        Self {
            pages,
            download_dir: config.download_dir.clone(),
            download_timeout: config.timeout() * 3,
            poll_interval: config.poll_interval(),
        }
    }

    pub async fn ui_open_apps(&self) -> Result<()> {
        log::info!("[step] Open apps");
        self.pages.top_bar.go_to("Apps").await?;
        self.pages.apps.wait_loaded().await
    }

    /// Fill the install form for `app` and submit it.
    pub async fn ui_install_app(
        &self,
        app: &str,
        display_name: &str,
        preset: Option<&str>,
    ) -> Result<()> {
        log::info!("[step] Install {} as {:?}", app, display_name);
        self.pages.apps.open_all_apps().await?;
        self.pages.apps.click_install(app).await?;
        self.pages.app_install.wait_loaded().await?;
        self.pages.app_install.fill(display_name, preset).await?;
        self.pages.app_install.install().await?;
        self.pages.installed_app.wait_loaded().await
    }

    /// The install form must refuse to submit with `field` flagged.
    pub async fn ui_verify_install_blocked(&self, field: &str) -> Result<()> {
        log::info!("[step] Verify install is blocked by {}", field);
        self.pages.app_install.field_error(field).wait_visible().await
    }

    pub async fn ui_open_installed_app(&self, display_name: &str) -> Result<()> {
        log::info!("[step] Open installed app {:?}", display_name);
        self.pages.apps.open_installed_apps().await?;
        self.pages.apps.open_installed_app(display_name).await?;
        self.pages.installed_app.wait_loaded().await
    }

    pub async fn ui_wait_app_status(&self, status: &str) -> Result<()> {
        log::info!("[step] Wait for app status {:?}", status);
        self.pages
            .installed_app
            .status_badge()
            .with_timeout(APP_STATUS_TIMEOUT)
            .wait_text(status)
            .await
    }

    /// Compare one value of the Output panel, addressed by a dotted path.
    pub async fn ui_verify_output(&self, path: &str, expected: impl Into<Value>) -> Result<()> {
        let expected = expected.into();
        log::info!("[step] Verify output {} = {}", path, expected);
        let output = self.pages.installed_app.read_output().await?;
        match output_value(&output, path) {
            Some(actual) if *actual == expected => Ok(()),
            actual => Err(E2eError::mismatch(
                format!("output {}", path),
                &expected,
                actual,
            )),
        }
    }

    /// Click "Export config" and read the downloaded file back.
    pub async fn ui_export_config(&self, file_prefix: &str) -> Result<AppExport> {
        log::info!("[step] Export app config");
        let before = existing_downloads(&self.download_dir, file_prefix);
        self.pages.installed_app.export_config().await?;
        let path = wait_for_download(
            &self.download_dir,
            file_prefix,
            &before,
            self.download_timeout,
            self.poll_interval,
        )
        .await?;
        log::info!("[step] Exported config saved to {}", path.display());
        AppExport::from_file(&path)
    }

    pub async fn ui_uninstall_app(&self) -> Result<()> {
        log::info!("[step] Uninstall app");
        self.pages.installed_app.uninstall().await?;
        self.ui_wait_app_status("Uninstalled").await
    }
}
