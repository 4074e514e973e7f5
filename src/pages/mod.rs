//! Page objects for the web console
//!
//! One struct per screen or popup. Getters hand out lazy [`Element`]
//! handles; actions combine them into the things a user does on that
//! screen. Nothing here asserts: that is the job of the step structs.

pub mod apps;
pub mod auth;
pub mod disks;
pub mod files;
pub mod manager;
pub mod onboarding;
pub mod organization;
pub mod output_panel;
pub mod projects;
pub mod secrets;
pub mod top_bar;

use crate::browser::element::{Element, Selector};
use crate::config::E2eConfig;
use crate::error::Result;
use chromiumoxide::page::Page;
use std::time::Duration;

/// Shared state every page object carries
#[derive(Clone)]
pub struct PageContext {
    page: Page,
    timeout: Duration,
    poll_interval: Duration,
}

impl PageContext {
    pub fn new(page: Page, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            page,
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(page: Page, config: &E2eConfig) -> Self {
        Self::new(page, config.timeout(), config.poll_interval())
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Element handle with the context's timeouts applied.
    pub fn el(&self, selector: Selector, name: impl Into<String>) -> Element {
        Element::new(self.page.clone(), selector)
            .named(name)
            .with_timeout(self.timeout)
            .with_poll_interval(self.poll_interval)
    }

    /// `<button>` by its visible label.
    pub fn button(&self, label: &str) -> Element {
        self.el(Selector::text("button", label), format!("\"{}\" button", label))
    }

    /// Form control by its `name` attribute.
    pub fn input(&self, name: &str) -> Element {
        self.el(
            Selector::css(format!("input[name=\"{}\"], textarea[name=\"{}\"]", name, name)),
            format!("{} input", name),
        )
    }

    /// The generic loading indicator the console shows between screens.
    pub fn spinner(&self) -> Element {
        self.el(
            Selector::css("[role=\"progressbar\"], .animate-spin"),
            "loading spinner",
        )
    }

    /// Toast/snackbar message area.
    pub fn toast(&self, text: &str) -> Element {
        self.el(
            Selector::contains_text("[role=\"status\"], [role=\"alert\"]", text),
            format!("toast {:?}", text),
        )
    }
}

/// A screen or popup of the console
#[allow(async_fn_in_trait)]
pub trait PageObject {
    fn name(&self) -> &'static str;

    /// Element whose visibility means the page is shown
    fn root(&self) -> Element;

    async fn is_loaded(&self) -> Result<bool> {
        self.root().is_visible().await
    }

    async fn wait_loaded(&self) -> Result<()> {
        log::debug!("Waiting for {} page", self.name());
        self.root().wait_visible().await
    }

    async fn wait_closed(&self) -> Result<()> {
        self.root().wait_hidden().await
    }
}
