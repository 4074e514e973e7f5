use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;

/// Header shown on every authenticated screen
#[derive(Clone)]
pub struct TopBar {
    ctx: PageContext,
}

impl TopBar {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn header(&self) -> Element {
        self.ctx.el(Selector::css("header"), "top bar")
    }

    pub fn organization_switcher(&self) -> Element {
        self.ctx.el(
            Selector::test_id("organization-switcher"),
            "organization switcher",
        )
    }

    pub fn project_switcher(&self) -> Element {
        self.ctx
            .el(Selector::test_id("project-switcher"), "project switcher")
    }

    pub fn user_menu(&self) -> Element {
        self.ctx.el(Selector::test_id("user-menu"), "user menu")
    }

    pub fn menu_item(&self, label: &str) -> Element {
        self.ctx.el(
            Selector::text("[role=\"menuitem\"]", label),
            format!("menu item {:?}", label),
        )
    }

    pub fn nav_link(&self, label: &str) -> Element {
        self.ctx.el(
            Selector::text("nav a", label),
            format!("{} navigation link", label),
        )
    }

    pub async fn current_organization(&self) -> Result<String> {
        self.organization_switcher().text().await
    }

    pub async fn current_project(&self) -> Result<String> {
        self.project_switcher().text().await
    }

    pub async fn switch_organization(&self, org: &str) -> Result<()> {
        self.organization_switcher().click().await?;
        self.menu_item(org).click().await?;
        self.organization_switcher().wait_text(org).await
    }

    pub async fn switch_project(&self, project: &str) -> Result<()> {
        self.project_switcher().click().await?;
        self.menu_item(project).click().await?;
        self.project_switcher().wait_text(project).await
    }

    pub async fn open_create_project(&self) -> Result<()> {
        self.project_switcher().click().await?;
        self.menu_item("Create new project").click().await
    }

    /// Go to a top-level section ("Apps", "Files", "Disks", "Secrets", ...).
    pub async fn go_to(&self, section: &str) -> Result<()> {
        self.nav_link(section).click().await?;
        self.ctx.spinner().wait_spinner_gone().await
    }

    pub async fn log_out(&self) -> Result<()> {
        self.user_menu().click().await?;
        self.menu_item("Log out").click().await
    }
}

impl PageObject for TopBar {
    fn name(&self) -> &'static str {
        "top bar"
    }

    fn root(&self) -> Element {
        self.header()
    }
}
