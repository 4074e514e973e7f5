//! Storage file browser

use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;
use std::path::Path;

#[derive(Clone)]
pub struct FilesPage {
    ctx: PageContext,
}

impl FilesPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn breadcrumbs(&self) -> Element {
        self.ctx
            .el(Selector::css("nav[aria-label=\"breadcrumb\"]"), "files breadcrumbs")
    }

    pub fn breadcrumb(&self, folder: &str) -> Element {
        self.ctx.el(
            Selector::text("nav[aria-label=\"breadcrumb\"] a", folder),
            format!("breadcrumb {:?}", folder),
        )
    }

    pub fn add_folder_button(&self) -> Element {
        self.ctx.button("Add folder")
    }

    pub fn upload_input(&self) -> Element {
        self.ctx
            .el(Selector::css("input[type=\"file\"]"), "file upload input")
    }

    pub fn file_row(&self, name: &str) -> Element {
        self.ctx.el(
            Selector::Within {
                parent: Box::new(Selector::css("[data-testid=\"files-list\"]")),
                css: format!("[data-name=\"{}\"]", name),
            },
            format!("file row {:?}", name),
        )
    }

    pub fn row_action(&self, name: &str, action: &str) -> Element {
        self.file_row(name).child(
            &format!("button[aria-label=\"{}\"]", action),
            format!("{} {}", action, name),
        )
    }

    pub fn folder_name_input(&self) -> Element {
        self.ctx.input("folder")
    }

    pub fn rename_input(&self) -> Element {
        self.ctx.input("name")
    }

    pub fn confirm_button(&self) -> Element {
        self.ctx.el(
            Selector::css("[role=\"dialog\"] button[type=\"submit\"]"),
            "confirm button",
        )
    }

    pub async fn create_folder(&self, name: &str) -> Result<()> {
        self.add_folder_button().click().await?;
        self.folder_name_input().fill(name).await?;
        self.confirm_button().click().await?;
        self.file_row(name).wait_visible().await
    }

    pub async fn open_folder(&self, name: &str) -> Result<()> {
        self.file_row(name).click().await?;
        self.breadcrumb(name).wait_visible().await
    }

    pub async fn upload(&self, file: &Path) -> Result<()> {
        self.upload_input().set_input_files(&[file]).await?;
        self.ctx.spinner().wait_spinner_gone().await
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.row_action(from, "Rename").click().await?;
        self.rename_input().fill(to).await?;
        self.confirm_button().click().await?;
        self.file_row(to).wait_visible().await
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.row_action(name, "Delete").click().await?;
        self.confirm_button().click().await?;
        self.file_row(name).wait_hidden().await
    }

    pub async fn is_listed(&self, name: &str) -> Result<bool> {
        self.file_row(name).is_visible().await
    }
}

impl PageObject for FilesPage {
    fn name(&self) -> &'static str {
        "files"
    }

    fn root(&self) -> Element {
        self.breadcrumbs()
    }
}
