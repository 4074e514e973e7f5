use crate::cli::Cli;
use crate::data::SecretData;
use crate::error::{ensure_eq, Result};
use crate::pages::manager::PageManager;
use crate::pages::PageObject;

#[derive(Clone)]
pub struct SecretsSteps {
    pages: PageManager,
    cli: Cli,
}

impl SecretsSteps {
    pub fn new(pages: PageManager, cli: Cli) -> Self {
        Self { pages, cli }
    }

    pub async fn ui_open_secrets(&self) -> Result<()> {
        log::info!("[step] Open secrets");
        self.pages.top_bar.go_to("Secrets").await?;
        self.pages.secrets.wait_loaded().await
    }

    pub async fn ui_create_secret(&self, secret: &SecretData) -> Result<()> {
        log::info!("[step] Create secret {}", secret.name);
        self.pages.secrets.open_create_popup().await?;
        self.pages.create_secret.wait_loaded().await?;
        self.pages
            .create_secret
            .create(&secret.name, &secret.value)
            .await?;
        self.pages.secrets.secret_row(&secret.name).wait_visible().await
    }

    pub async fn ui_delete_secret(&self, secret: &SecretData) -> Result<()> {
        log::info!("[step] Delete secret {}", secret.name);
        self.pages.secrets.delete(&secret.name).await
    }

    pub async fn ui_verify_secret_listed(&self, secret: &SecretData, listed: bool) -> Result<()> {
        log::info!("[step] Verify secret {} listed = {}", secret.name, listed);
        ensure_eq(
            &format!("secret {} listed", secret.name),
            listed,
            self.pages.secrets.is_listed(&secret.name).await?,
        )
    }

    pub async fn cli_create_secret(&self, secret: &SecretData) -> Result<()> {
        log::info!("[step] CLI: add secret {}", secret.name);
        self.cli.secret.add(&secret.name, &secret.value).await
    }

    pub async fn cli_verify_secret_exists(&self, secret: &SecretData, exists: bool) -> Result<()> {
        log::info!("[step] CLI: verify secret {} exists = {}", secret.name, exists);
        ensure_eq(
            &format!("secret {} exists", secret.name),
            exists,
            self.cli.secret.exists(&secret.name).await?,
        )
    }

    /// Best-effort cleanup; failures are logged, not returned.
    pub async fn cli_remove_secret(&self, secret: &SecretData) {
        log::info!("[step] CLI: remove secret {}", secret.name);
        if let Err(e) = self.cli.secret.rm(&secret.name).await {
            log::warn!("Failed to remove secret {}: {}", secret.name, e);
        }
    }
}
