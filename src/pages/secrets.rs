use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;

#[derive(Clone)]
pub struct SecretsPage {
    ctx: PageContext,
}

impl SecretsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn title(&self) -> Element {
        self.ctx.el(Selector::text("h1", "Secrets"), "secrets title")
    }

    pub fn create_button(&self) -> Element {
        self.ctx.button("Create new secret")
    }

    pub fn secret_row(&self, name: &str) -> Element {
        self.ctx.el(
            Selector::contains_text("[data-testid=\"secret-item\"], tbody tr", name),
            format!("secret row {:?}", name),
        )
    }

    pub fn delete_button(&self, name: &str) -> Element {
        self.secret_row(name)
            .child("button[aria-label=\"Delete\"]", format!("delete {}", name))
    }

    pub fn confirm_button(&self) -> Element {
        self.ctx.el(
            Selector::css("[role=\"dialog\"] button[type=\"submit\"]"),
            "confirm secret deletion",
        )
    }

    pub async fn open_create_popup(&self) -> Result<()> {
        self.create_button().click().await
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.delete_button(name).click().await?;
        self.confirm_button().click().await?;
        self.secret_row(name).wait_hidden().await
    }

    pub async fn is_listed(&self, name: &str) -> Result<bool> {
        self.secret_row(name).is_visible().await
    }
}

impl PageObject for SecretsPage {
    fn name(&self) -> &'static str {
        "secrets"
    }

    fn root(&self) -> Element {
        self.title()
    }
}

#[derive(Clone)]
pub struct CreateSecretPopup {
    ctx: PageContext,
}

impl CreateSecretPopup {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn dialog(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("[role=\"dialog\"]", "Create secret"),
            "create secret popup",
        )
    }

    pub fn name_input(&self) -> Element {
        self.ctx.input("key")
    }

    pub fn value_input(&self) -> Element {
        self.ctx.input("value")
    }

    pub fn create_button(&self) -> Element {
        self.dialog().child("button[type=\"submit\"]", "create secret button")
    }

    pub async fn create(&self, name: &str, value: &str) -> Result<()> {
        self.name_input().fill(name).await?;
        self.value_input().fill(value).await?;
        self.create_button().click().await?;
        self.wait_closed().await
    }
}

impl PageObject for CreateSecretPopup {
    fn name(&self) -> &'static str {
        "create secret popup"
    }

    fn root(&self) -> Element {
        self.dialog()
    }
}
