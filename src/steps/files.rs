use crate::cli::Cli;
use crate::data::{sha256_hex, FileData};
use crate::error::{ensure, ensure_eq, E2eError, Result};
use crate::pages::manager::PageManager;
use crate::pages::PageObject;
use std::path::Path;

#[derive(Clone)]
pub struct FilesSteps {
    pages: PageManager,
    cli: Cli,
}

impl FilesSteps {
    pub fn new(pages: PageManager, cli: Cli) -> Self {
        Self { pages, cli }
    }

    pub async fn ui_open_files(&self) -> Result<()> {
        log::info!("[step] Open files");
        self.pages.top_bar.go_to("Files").await?;
        self.pages.files.wait_loaded().await
    }

    pub async fn ui_create_folder(&self, name: &str) -> Result<()> {
        log::info!("[step] Create folder {}", name);
        self.pages.files.create_folder(name).await
    }

    pub async fn ui_open_folder(&self, name: &str) -> Result<()> {
        log::info!("[step] Open folder {}", name);
        self.pages.files.open_folder(name).await
    }

    /// Write `file` into `local_dir` and upload it into the open folder.
    pub async fn ui_upload_file(&self, file: &mut FileData, local_dir: &Path) -> Result<()> {
        log::info!("[step] Upload {}", file.name);
        let path = file.write_to(local_dir)?.to_path_buf();
        self.pages.files.upload(&path).await?;
        self.pages.files.file_row(&file.name).wait_visible().await
    }

    pub async fn ui_rename(&self, from: &str, to: &str) -> Result<()> {
        log::info!("[step] Rename {} to {}", from, to);
        self.pages.files.rename(from, to).await
    }

    pub async fn ui_delete(&self, name: &str) -> Result<()> {
        log::info!("[step] Delete {}", name);
        self.pages.files.delete(name).await
    }

    pub async fn ui_verify_listed(&self, name: &str, listed: bool) -> Result<()> {
        log::info!("[step] Verify {} is {}listed", name, if listed { "" } else { "not " });
        ensure_eq(
            &format!("{} listed", name),
            listed,
            self.pages.files.is_listed(name).await?,
        )
    }

    pub async fn cli_verify_listed(&self, dir: &str, name: &str, listed: bool) -> Result<()> {
        log::info!("[step] CLI: verify {}/{} exists = {}", dir, name, listed);
        ensure_eq(
            &format!("storage entry {}/{}", dir, name),
            listed,
            self.cli.storage.exists(dir, name).await?,
        )
    }

    /// Download `remote` with the CLI and compare it byte-for-byte with
    /// what was uploaded.
    pub async fn cli_verify_content(
        &self,
        remote: &str,
        file: &FileData,
        scratch_dir: &Path,
    ) -> Result<()> {
        log::info!("[step] CLI: verify content of {}", remote);
        let local = scratch_dir.join(format!("downloaded-{}", file.name));
        self.cli.storage.download(remote, &local).await?;
        let bytes = std::fs::read(&local)?;
        ensure(
            !bytes.is_empty() || file.content.is_empty(),
            format!("{} downloaded empty", remote),
        )?;
        let actual = sha256_hex(&bytes);
        if actual != file.sha256_hex() {
            return Err(E2eError::mismatch(
                format!("sha256 of {}", remote),
                file.sha256_hex(),
                actual,
            ));
        }
        Ok(())
    }

    pub async fn cli_create_folder(&self, path: &str) -> Result<()> {
        log::info!("[step] CLI: create folder {}", path);
        self.cli.storage.mkdir(path).await
    }

    /// Best-effort cleanup; failures are logged, not returned.
    pub async fn cli_remove(&self, path: &str) {
        log::info!("[step] CLI: remove {}", path);
        if let Err(e) = self.cli.storage.rm(path).await {
            log::warn!("Failed to remove {}: {}", path, e);
        }
    }
}
