use crate::cli::disk::{storage_bytes, DiskInfo};
use crate::cli::Cli;
use crate::data::DiskData;
use crate::error::{ensure, ensure_eq, E2eError, Result};
use crate::pages::disks::{DiskDetails, StorageUnit};
use crate::pages::manager::PageManager;
use crate::pages::PageObject;

/// Split "1G" / "500M" / "2T" into what the create-disk form takes.
pub fn form_storage(storage: &str) -> Result<(u32, StorageUnit)> {
    let storage = storage.trim();
    let split = storage
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(storage.len());
    let (number, unit) = storage.split_at(split);
    let size: u32 = number
        .parse()
        .map_err(|_| E2eError::Other(format!("bad disk size {:?}", storage)))?;
    let unit = match unit.trim().trim_end_matches(['i', 'B']) {
        "M" => StorageUnit::Mb,
        "G" => StorageUnit::Gb,
        "T" => StorageUnit::Tb,
        other => {
            return Err(E2eError::Other(format!(
                "unsupported disk unit {:?} in {:?}",
                other, storage
            )))
        }
    };
    Ok((size, unit))
}

#[derive(Clone)]
pub struct DisksSteps {
    pages: PageManager,
    cli: Cli,
}

impl DisksSteps {
    pub fn new(pages: PageManager, cli: Cli) -> Self {
        Self { pages, cli }
    }

    pub async fn ui_open_disks(&self) -> Result<()> {
        log::info!("[step] Open disks");
        self.pages.top_bar.go_to("Disks").await?;
        self.pages.disks.wait_loaded().await
    }

    /// Create `disk` through the popup, then record the id and URI the
    /// details drawer shows.
    pub async fn ui_create_disk(&self, disk: &mut DiskData, lifespan: Option<&str>) -> Result<()> {
        log::info!("[step] Create disk {} ({})", disk.name, disk.storage);
        let (size, unit) = form_storage(&disk.storage)?;
        self.pages.disks.open_create_popup().await?;
        self.pages.create_disk.wait_loaded().await?;
        self.pages
            .create_disk
            .create(&disk.name, size, unit, lifespan)
            .await?;
        self.pages.disks.open_disk(&disk.name).await?;
        let details = self.pages.disks.details().await?;
        disk.record_created(&details.id, &details.uri)?;
        log::info!("[step] Disk {} got id {}", disk.name, details.id);
        Ok(())
    }

    /// Compare the open details drawer with the expected record.
    pub async fn ui_verify_disk_details(&self, disk: &DiskData) -> Result<DiskDetails> {
        log::info!("[step] Verify details of disk {}", disk.name);
        let details = self.pages.disks.details().await?;
        ensure_eq("disk id", disk.id()?, details.id.as_str())?;
        ensure_eq("disk uri", disk.uri()?, details.uri.as_str())?;
        ensure_eq(
            "disk storage",
            storage_bytes(&disk.storage),
            storage_bytes(&details.storage),
        )?;
        Ok(details)
    }

    pub async fn ui_verify_disk_listed(&self, disk: &DiskData, listed: bool) -> Result<()> {
        log::info!("[step] Verify disk {} listed = {}", disk.name, listed);
        self.pages.disks.search(&disk.name).await?;
        let row = self.pages.disks.disk_row(&disk.name);
        if listed {
            row.wait_visible().await
        } else {
            row.wait_hidden().await
        }
    }

    pub async fn ui_delete_disk(&self, disk: &DiskData) -> Result<()> {
        log::info!("[step] Delete disk {}", disk.name);
        self.pages.disks.open_disk(&disk.name).await?;
        self.pages.disks.delete_open_disk(&disk.name).await
    }

    pub async fn cli_create_disk(&self, disk: &mut DiskData) -> Result<DiskInfo> {
        log::info!("[step] CLI: create disk {} ({})", disk.name, disk.storage);
        self.cli.disk.create(disk).await
    }

    /// Fetch the disk by id and check every recorded field.
    pub async fn cli_verify_disk(&self, disk: &DiskData) -> Result<()> {
        log::info!("[step] CLI: verify disk {}", disk.name);
        let info = self.cli.disk.get(disk.id()?).await?;
        info.check_against(disk)
    }

    /// The UI drawer and `disk get` must agree on the same disk.
    pub async fn verify_ui_matches_cli(&self, disk: &DiskData) -> Result<()> {
        log::info!("[step] Compare UI and CLI views of disk {}", disk.name);
        let details = self.ui_verify_disk_details(disk).await?;
        let info = self.cli.disk.get(disk.id()?).await?;
        ensure_eq("disk id (UI vs CLI)", details.id.as_str(), info.id.as_str())?;
        ensure_eq("disk uri (UI vs CLI)", details.uri.as_str(), info.uri.as_str())?;
        ensure_eq(
            "disk storage (UI vs CLI)",
            storage_bytes(&details.storage),
            storage_bytes(&info.storage),
        )
    }

    pub async fn cli_verify_disk_removed(&self, disk: &DiskData) -> Result<()> {
        log::info!("[step] CLI: verify disk {} is gone", disk.name);
        let found = self.cli.disk.find_by_name(&disk.name).await?;
        ensure(
            found.is_none(),
            format!("disk {} still listed: {:?}", disk.name, found),
        )
    }

    /// Best-effort cleanup; failures are logged, not returned.
    pub async fn cli_remove_disk(&self, disk: &DiskData) {
        let Some(id) = disk.id.as_deref() else {
            return;
        };
        log::info!("[step] CLI: remove disk {}", id);
        if let Err(e) = self.cli.disk.rm(id).await {
            log::warn!("Failed to remove disk {}: {}", id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_storage_splits_size_and_unit() {
        assert_eq!(form_storage("1G").unwrap(), (1, StorageUnit::Gb));
        assert_eq!(form_storage("500Mi").unwrap(), (500, StorageUnit::Mb));
        assert_eq!(form_storage("2 TB").unwrap(), (2, StorageUnit::Tb));
        assert!(form_storage("1.5G").is_err());
        assert!(form_storage("10K").is_err());
    }
}
