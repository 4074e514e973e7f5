use crate::data::UserData;
use crate::error::{ensure, E2eError, Result};
use crate::pages::manager::PageManager;
use crate::pages::PageObject;

#[derive(Clone)]
pub struct AuthSteps {
    pages: PageManager,
    start_url: String,
}

impl AuthSteps {
    pub fn new(pages: PageManager, start_url: String) -> Self {
        Self { pages, start_url }
    }

    /// Open the console landing page and wait for the auth screen.
    pub async fn ui_open_console(&self) -> Result<()> {
        log::info!("[step] Open {}", self.start_url);
        self.pages
            .context()
            .page()
            .goto(self.start_url.as_str())
            .await
            .map_err(|e| E2eError::NavigationFailed(format!("{}: {}", self.start_url, e)))?;
        self.pages.auth.wait_loaded().await
    }

    pub async fn ui_log_in(&self, user: &UserData) -> Result<()> {
        log::info!("[step] Log in as {}", user.email);
        self.pages.auth.click_log_in().await?;
        self.pages.login.wait_loaded().await?;
        self.pages.login.log_in(&user.email, &user.password).await
    }

    /// Register a new account and accept the terms of use.
    pub async fn ui_sign_up(&self, user: &UserData) -> Result<()> {
        log::info!("[step] Sign up as {}", user.email);
        self.pages.auth.click_sign_up().await?;
        self.pages.signup.wait_loaded().await?;
        self.pages.signup.sign_up(&user.email, &user.password).await?;
        self.ui_accept_terms().await
    }

    pub async fn ui_accept_terms(&self) -> Result<()> {
        log::info!("[step] Accept terms of use");
        self.pages.terms.wait_loaded().await?;
        self.pages.terms.accept().await
    }

    pub async fn ui_verify_welcome_shown(&self) -> Result<()> {
        log::info!("[step] Verify welcome screen is shown");
        self.pages.welcome.wait_loaded().await
    }

    /// Log in is expected to fail with an error banner containing `text`.
    pub async fn ui_verify_login_error(&self, text: &str) -> Result<()> {
        log::info!("[step] Verify login error {:?}", text);
        let error = self.pages.login.error_message();
        error.wait_visible().await?;
        let actual = error.text().await?;
        ensure(
            actual.contains(text),
            format!("login error: expected to contain {:?}, got {:?}", text, actual),
        )
    }

    pub async fn ui_verify_logged_in(&self) -> Result<()> {
        log::info!("[step] Verify user is logged in");
        self.pages.top_bar.wait_loaded().await
    }

    pub async fn ui_log_out(&self) -> Result<()> {
        log::info!("[step] Log out");
        self.pages.top_bar.log_out().await?;
        self.pages.auth.wait_loaded().await
    }
}
