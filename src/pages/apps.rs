//! App catalogue, install form and installed-app details

use super::output_panel::read_output_panel;
use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;
use serde_json::{Map, Value};

#[derive(Clone)]
pub struct AppsPage {
    ctx: PageContext,
}

impl AppsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn all_apps_tab(&self) -> Element {
        self.ctx
            .el(Selector::text("[role=\"tab\"]", "All apps"), "all apps tab")
    }

    pub fn installed_apps_tab(&self) -> Element {
        self.ctx.el(
            Selector::text("[role=\"tab\"]", "Installed apps"),
            "installed apps tab",
        )
    }

    pub fn app_tile(&self, app: &str) -> Element {
        self.ctx.el(
            Selector::contains_text("[data-testid=\"app-tile\"], article", app),
            format!("{} app tile", app),
        )
    }

    pub fn install_button(&self, app: &str) -> Element {
        self.app_tile(app)
            .child("button", format!("{} install button", app))
    }

    pub fn installed_app_row(&self, display_name: &str) -> Element {
        self.ctx.el(
            Selector::contains_text("[data-testid=\"installed-app\"], tbody tr", display_name),
            format!("installed app {:?}", display_name),
        )
    }

    pub async fn open_all_apps(&self) -> Result<()> {
        self.all_apps_tab().click().await
    }

    pub async fn open_installed_apps(&self) -> Result<()> {
        self.installed_apps_tab().click().await?;
        self.ctx.spinner().wait_spinner_gone().await
    }

    pub async fn click_install(&self, app: &str) -> Result<()> {
        self.install_button(app).click().await
    }

    pub async fn open_installed_app(&self, display_name: &str) -> Result<()> {
        self.installed_app_row(display_name).click().await
    }
}

impl PageObject for AppsPage {
    fn name(&self) -> &'static str {
        "apps"
    }

    fn root(&self) -> Element {
        self.all_apps_tab()
    }
}

#[derive(Clone)]
pub struct AppInstallPage {
    ctx: PageContext,
}

impl AppInstallPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn form(&self) -> Element {
        self.ctx.el(Selector::css("form#app-install"), "app install form")
    }

    pub fn display_name_input(&self) -> Element {
        self.ctx.input("displayName")
    }

    pub fn preset_select(&self) -> Element {
        self.ctx
            .el(Selector::css("select[name=\"preset\"]"), "resource preset select")
    }

    pub fn install_button(&self) -> Element {
        self.form().child("button[type=\"submit\"]", "install app button")
    }

    pub fn field_error(&self, field: &str) -> Element {
        self.ctx.el(
            Selector::css(format!("[data-error-for=\"{}\"]", field)),
            format!("{} field error", field),
        )
    }

    pub async fn fill(&self, display_name: &str, preset: Option<&str>) -> Result<()> {
        self.display_name_input().fill(display_name).await?;
        if let Some(preset) = preset {
            self.preset_select().select_option(preset).await?;
        }
        Ok(())
    }

    pub async fn install(&self) -> Result<()> {
        self.install_button().click().await?;
        self.ctx.spinner().wait_spinner_gone().await
    }
}

impl PageObject for AppInstallPage {
    fn name(&self) -> &'static str {
        "app install"
    }

    fn root(&self) -> Element {
        self.form()
    }
}

#[derive(Clone)]
pub struct InstalledAppPage {
    ctx: PageContext,
}

impl InstalledAppPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn title(&self) -> Element {
        self.ctx.el(Selector::css("main h1"), "installed app title")
    }

    pub fn status_badge(&self) -> Element {
        self.ctx.el(Selector::test_id("app-status"), "app status badge")
    }

    pub fn uninstall_button(&self) -> Element {
        self.ctx.button("Uninstall")
    }

    pub fn export_config_button(&self) -> Element {
        self.ctx.button("Export config")
    }

    pub fn confirm_button(&self) -> Element {
        self.ctx.el(
            Selector::Within {
                parent: Box::new(Selector::css("[role=\"dialog\"]")),
                css: "button[data-variant=\"danger\"], button[type=\"submit\"]".to_string(),
            },
            "confirm button",
        )
    }

    pub fn output_root(&self) -> Selector {
        Selector::test_id("app-output")
    }

    pub async fn status(&self) -> Result<String> {
        self.status_badge().text().await
    }

    /// Poll until the badge reads `status` (e.g. "Healthy", "Uninstalled").
    pub async fn wait_status(&self, status: &str) -> Result<()> {
        self.status_badge().wait_text(status).await
    }

    pub async fn uninstall(&self) -> Result<()> {
        self.uninstall_button().click().await?;
        self.confirm_button().click().await
    }

    pub async fn export_config(&self) -> Result<()> {
        self.export_config_button().click().await
    }

    pub async fn read_output(&self) -> Result<Map<String, Value>> {
        let root = self.ctx.el(self.output_root(), "app output panel");
        root.wait_visible().await?;
        read_output_panel(self.ctx.page(), &self.output_root()).await
    }
}

impl PageObject for InstalledAppPage {
    fn name(&self) -> &'static str {
        "installed app"
    }

    fn root(&self) -> Element {
        self.status_badge()
    }
}
