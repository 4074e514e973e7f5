//! Disks list, creation popup and disk details drawer

use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;

#[derive(Clone)]
pub struct DisksPage {
    ctx: PageContext,
}

/// Values shown in the details drawer of one disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskDetails {
    pub id: String,
    pub uri: String,
    pub storage: String,
    pub status: String,
}

impl DisksPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn title(&self) -> Element {
        self.ctx.el(Selector::text("h1", "Disks"), "disks title")
    }

    pub fn create_button(&self) -> Element {
        self.ctx.button("Create new disk")
    }

    pub fn search_input(&self) -> Element {
        self.ctx.el(Selector::placeholder("Search disks"), "disk search")
    }

    pub fn disk_row(&self, name: &str) -> Element {
        self.ctx.el(
            Selector::contains_text("[data-testid=\"disk-item\"], tbody tr", name),
            format!("disk row {:?}", name),
        )
    }

    fn detail(&self, field: &str) -> Element {
        self.ctx.el(
            Selector::css(format!("[data-testid=\"disk-details\"] [data-field=\"{}\"]", field)),
            format!("disk {} detail", field),
        )
    }

    pub fn delete_button(&self) -> Element {
        self.ctx.button("Delete")
    }

    pub fn confirm_delete_button(&self) -> Element {
        self.ctx.el(
            Selector::css("[role=\"dialog\"] button[type=\"submit\"]"),
            "confirm disk deletion",
        )
    }

    pub async fn open_create_popup(&self) -> Result<()> {
        self.create_button().click().await
    }

    pub async fn search(&self, text: &str) -> Result<()> {
        self.search_input().fill(text).await
    }

    pub async fn open_disk(&self, name: &str) -> Result<()> {
        self.disk_row(name).click().await?;
        self.detail("id").wait_visible().await
    }

    pub async fn details(&self) -> Result<DiskDetails> {
        Ok(DiskDetails {
            id: self.detail("id").text().await?,
            uri: self.detail("uri").text().await?,
            storage: self.detail("storage").text().await?,
            status: self.detail("status").text().await?,
        })
    }

    pub async fn delete_open_disk(&self, name: &str) -> Result<()> {
        self.delete_button().click().await?;
        self.confirm_delete_button().click().await?;
        self.disk_row(name).wait_hidden().await
    }

    pub async fn is_listed(&self, name: &str) -> Result<bool> {
        self.disk_row(name).is_visible().await
    }
}

impl PageObject for DisksPage {
    fn name(&self) -> &'static str {
        "disks"
    }

    fn root(&self) -> Element {
        self.title()
    }
}

/// Storage units offered by the create-disk form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageUnit {
    Mb,
    Gb,
    Tb,
}

impl StorageUnit {
    pub fn label(&self) -> &'static str {
        match self {
            StorageUnit::Mb => "MB",
            StorageUnit::Gb => "GB",
            StorageUnit::Tb => "TB",
        }
    }
}

#[derive(Clone)]
pub struct CreateDiskPopup {
    ctx: PageContext,
}

impl CreateDiskPopup {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn dialog(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("[role=\"dialog\"]", "Create disk"),
            "create disk popup",
        )
    }

    pub fn storage_input(&self) -> Element {
        self.ctx.input("storage")
    }

    pub fn unit_select(&self) -> Element {
        self.ctx
            .el(Selector::css("select[name=\"storageUnit\"]"), "storage unit select")
    }

    pub fn name_input(&self) -> Element {
        self.ctx.input("name")
    }

    pub fn lifespan_input(&self) -> Element {
        self.ctx.input("lifespan")
    }

    pub fn create_button(&self) -> Element {
        self.dialog().child("button[type=\"submit\"]", "create disk button")
    }

    pub async fn create(
        &self,
        name: &str,
        storage: u32,
        unit: StorageUnit,
        lifespan: Option<&str>,
    ) -> Result<()> {
        self.name_input().fill(name).await?;
        self.storage_input().fill(&storage.to_string()).await?;
        self.unit_select().select_option(unit.label()).await?;
        if let Some(lifespan) = lifespan {
            self.lifespan_input().fill(lifespan).await?;
        }
        self.create_button().click().await?;
        self.wait_closed().await
    }
}

impl PageObject for CreateDiskPopup {
    fn name(&self) -> &'static str {
        "create disk popup"
    }

    fn root(&self) -> Element {
        self.dialog()
    }
}
