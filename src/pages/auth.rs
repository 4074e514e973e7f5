//! Landing, login, signup and terms screens

use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;

/// The first screen an anonymous visitor sees
#[derive(Clone)]
pub struct AuthPage {
    ctx: PageContext,
}

impl AuthPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn log_in_button(&self) -> Element {
        self.ctx.button("Log in")
    }

    pub fn sign_up_button(&self) -> Element {
        self.ctx.button("Sign up")
    }

    pub async fn click_log_in(&self) -> Result<()> {
        self.log_in_button().click().await
    }

    pub async fn click_sign_up(&self) -> Result<()> {
        self.sign_up_button().click().await
    }
}

impl PageObject for AuthPage {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn root(&self) -> Element {
        self.log_in_button()
    }
}

#[derive(Clone)]
pub struct LoginPage {
    ctx: PageContext,
}

impl LoginPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn email_input(&self) -> Element {
        self.ctx.el(
            Selector::css("input#username, input[name=\"username\"], input[type=\"email\"]"),
            "login email input",
        )
    }

    pub fn password_input(&self) -> Element {
        self.ctx.el(
            Selector::css("input#password, input[type=\"password\"]"),
            "login password input",
        )
    }

    pub fn continue_button(&self) -> Element {
        self.ctx.el(
            Selector::css("button[type=\"submit\"][name=\"action\"], button[type=\"submit\"]"),
            "login continue button",
        )
    }

    pub fn sign_up_link(&self) -> Element {
        self.ctx.el(Selector::text("a", "Sign up"), "sign up link")
    }

    pub fn error_message(&self) -> Element {
        self.ctx.el(
            Selector::css("#error-element-password, [data-error-code], .ulp-input-error-message"),
            "login error message",
        )
    }

    pub async fn enter_email(&self, email: &str) -> Result<()> {
        self.email_input().fill(email).await
    }

    pub async fn enter_password(&self, password: &str) -> Result<()> {
        self.password_input().fill(password).await
    }

    pub async fn click_continue(&self) -> Result<()> {
        self.continue_button().click().await
    }

    /// Fill both credentials and submit. Some identity providers show the
    /// password on a second screen, so the email is submitted first when
    /// the password field is not there yet.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<()> {
        self.enter_email(email).await?;
        if !self.password_input().is_visible().await? {
            self.click_continue().await?;
        }
        self.enter_password(password).await?;
        self.click_continue().await
    }
}

impl PageObject for LoginPage {
    fn name(&self) -> &'static str {
        "login"
    }

    fn root(&self) -> Element {
        self.email_input()
    }
}

#[derive(Clone)]
pub struct SignupPage {
    ctx: PageContext,
}

impl SignupPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn email_input(&self) -> Element {
        self.ctx.el(
            Selector::css("input#email, input[name=\"email\"]"),
            "signup email input",
        )
    }

    pub fn password_input(&self) -> Element {
        self.ctx.el(
            Selector::css("input#password, input[type=\"password\"]"),
            "signup password input",
        )
    }

    pub fn continue_button(&self) -> Element {
        self.ctx.el(
            Selector::css("button[type=\"submit\"]"),
            "signup continue button",
        )
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        self.email_input().fill(email).await?;
        self.password_input().fill(password).await?;
        self.continue_button().click().await
    }
}

impl PageObject for SignupPage {
    fn name(&self) -> &'static str {
        "signup"
    }

    fn root(&self) -> Element {
        self.email_input()
    }
}

/// Terms of use, shown once after the first login
#[derive(Clone)]
pub struct TermsPage {
    ctx: PageContext,
}

impl TermsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn title(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("h1, h2, h3", "Terms of Use"),
            "terms title",
        )
    }

    pub fn agree_checkbox(&self) -> Element {
        self.ctx.el(
            Selector::css("input[type=\"checkbox\"]"),
            "agree to terms checkbox",
        )
    }

    pub fn accept_button(&self) -> Element {
        self.ctx.button("Accept and continue")
    }

    pub async fn accept(&self) -> Result<()> {
        self.agree_checkbox().set_checked(true).await?;
        self.accept_button().click().await
    }
}

impl PageObject for TermsPage {
    fn name(&self) -> &'static str {
        "terms"
    }

    fn root(&self) -> Element {
        self.title()
    }
}
