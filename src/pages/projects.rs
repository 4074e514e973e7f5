//! Project creation: the full-page wizard after onboarding and the popup
//! reachable from the top bar

use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;

/// Roles a project can hand to new members by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRole {
    Reader,
    Writer,
    Manager,
    Admin,
}

impl ProjectRole {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectRole::Reader => "Reader",
            ProjectRole::Writer => "Writer",
            ProjectRole::Manager => "Manager",
            ProjectRole::Admin => "Admin",
        }
    }

    /// Role name as printed by the admin CLI
    pub fn cli_name(&self) -> String {
        self.label().to_ascii_lowercase()
    }
}

/// Fields shared by the wizard page and the popup
#[derive(Clone)]
struct ProjectForm {
    ctx: PageContext,
}

impl ProjectForm {
    fn name_input(&self) -> Element {
        self.ctx.input("name")
    }

    fn role_select(&self) -> Element {
        self.ctx.el(
            Selector::css("select[name=\"defaultRole\"]"),
            "default role select",
        )
    }

    fn default_checkbox(&self) -> Element {
        self.ctx.el(
            Selector::css("input[name=\"default\"][type=\"checkbox\"]"),
            "make default project checkbox",
        )
    }

    async fn fill(&self, name: &str, role: Option<ProjectRole>, make_default: bool) -> Result<()> {
        self.name_input().fill(name).await?;
        if let Some(role) = role {
            self.role_select().select_option(role.label()).await?;
        }
        if make_default {
            self.default_checkbox().set_checked(true).await?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct CreateProjectPage {
    ctx: PageContext,
    form: ProjectForm,
}

impl CreateProjectPage {
    pub fn new(ctx: PageContext) -> Self {
        let form = ProjectForm { ctx: ctx.clone() };
        Self { ctx, form }
    }

    pub fn title(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("h1, h2, h3", "Create a new project"),
            "create project title",
        )
    }

    pub fn name_input(&self) -> Element {
        self.form.name_input()
    }

    pub fn create_button(&self) -> Element {
        self.ctx.button("Create project")
    }

    pub async fn create(&self, name: &str, role: Option<ProjectRole>) -> Result<()> {
        self.form.fill(name, role, false).await?;
        self.create_button().click().await?;
        self.ctx.spinner().wait_spinner_gone().await
    }
}

impl PageObject for CreateProjectPage {
    fn name(&self) -> &'static str {
        "create project"
    }

    fn root(&self) -> Element {
        self.title()
    }
}

#[derive(Clone)]
pub struct CreateProjectPopup {
    ctx: PageContext,
    form: ProjectForm,
}

impl CreateProjectPopup {
    pub fn new(ctx: PageContext) -> Self {
        let form = ProjectForm { ctx: ctx.clone() };
        Self { ctx, form }
    }

    pub fn dialog(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("[role=\"dialog\"]", "New project"),
            "create project popup",
        )
    }

    pub fn create_button(&self) -> Element {
        self.dialog().child("button[type=\"submit\"]", "popup create button")
    }

    pub fn cancel_button(&self) -> Element {
        self.ctx.button("Cancel")
    }

    pub async fn create(
        &self,
        name: &str,
        role: Option<ProjectRole>,
        make_default: bool,
    ) -> Result<()> {
        self.form.fill(name, role, make_default).await?;
        self.create_button().click().await?;
        self.wait_closed().await
    }
}

impl PageObject for CreateProjectPopup {
    fn name(&self) -> &'static str {
        "create project popup"
    }

    fn root(&self) -> Element {
        self.dialog()
    }
}
