//! First-run screens: welcome, organization creation, joining an organization

use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;

#[derive(Clone)]
pub struct WelcomePage {
    ctx: PageContext,
}

impl WelcomePage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn title(&self) -> Element {
        self.ctx
            .el(Selector::contains_text("h1, h2", "Welcome"), "welcome title")
    }

    pub fn lets_do_it_button(&self) -> Element {
        self.ctx.button("Let's do it!")
    }

    pub fn join_organization_button(&self) -> Element {
        self.ctx.button("Join organization")
    }

    pub async fn click_lets_do_it(&self) -> Result<()> {
        self.lets_do_it_button().click().await
    }
}

impl PageObject for WelcomePage {
    fn name(&self) -> &'static str {
        "welcome"
    }

    fn root(&self) -> Element {
        self.title()
    }
}

#[derive(Clone)]
pub struct CreateOrganizationPage {
    ctx: PageContext,
}

impl CreateOrganizationPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn title(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("h1, h2, h3", "Name your organization"),
            "create organization title",
        )
    }

    pub fn name_input(&self) -> Element {
        self.ctx.input("name")
    }

    pub fn next_button(&self) -> Element {
        self.ctx.button("Next")
    }

    pub fn create_button(&self) -> Element {
        self.ctx.button("Create")
    }

    pub fn validation_error(&self) -> Element {
        self.ctx.el(
            Selector::css("form [role=\"alert\"], form .text-error"),
            "organization name error",
        )
    }

    pub async fn enter_name(&self, name: &str) -> Result<()> {
        self.name_input().fill(name).await
    }

    /// Enter the name and go through both wizard steps.
    pub async fn create(&self, name: &str) -> Result<()> {
        self.enter_name(name).await?;
        self.next_button().click().await?;
        self.create_button().click().await?;
        self.ctx.spinner().wait_spinner_gone().await
    }
}

impl PageObject for CreateOrganizationPage {
    fn name(&self) -> &'static str {
        "create organization"
    }

    fn root(&self) -> Element {
        self.title()
    }
}

/// Shown to users that were invited into an existing organization
#[derive(Clone)]
pub struct JoinOrganizationPage {
    ctx: PageContext,
}

impl JoinOrganizationPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn title(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("h1, h2, h3", "Join an organization"),
            "join organization title",
        )
    }

    pub fn organization_entry(&self, org: &str) -> Element {
        self.ctx.el(
            Selector::text("[data-testid=\"organization-item\"], li", org),
            format!("invited organization {:?}", org),
        )
    }

    pub async fn join(&self, org: &str) -> Result<()> {
        let entry = self.organization_entry(org);
        entry.click().await?;
        self.ctx.button("Join").click().await
    }
}

impl PageObject for JoinOrganizationPage {
    fn name(&self) -> &'static str {
        "join organization"
    }

    fn root(&self) -> Element {
        self.title()
    }
}
