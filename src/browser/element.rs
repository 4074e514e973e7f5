//! Element/Locator wrapper
//!
//! An [`Element`] is a lazy handle: it stores how to find a node, not the
//! node itself. Every call resolves the selector again inside the page, so
//! handles survive re-renders of the console's React tree.

use crate::error::{E2eError, Result};
use crate::wait::{poll_until, poll_until_or_warn};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::layout::Point;
use chromiumoxide::page::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_CLICK_ATTEMPTS: usize = 3;

/// How an element is located in the DOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Css(String),
    XPath(String),
    /// First match of `css` whose trimmed text equals `text`
    Text { css: String, text: String },
    /// First match of `css` whose text contains `text`
    ContainsText { css: String, text: String },
    /// `data-testid` attribute
    TestId(String),
    /// `input`/`textarea` by placeholder
    Placeholder(String),
    /// The `index`-th (0-based) match of a CSS selector
    Nth { css: String, index: usize },
    /// A CSS match inside the element found by `parent`
    Within { parent: Box<Selector>, css: String },
}

impl Selector {
    pub fn css(css: impl Into<String>) -> Self {
        Self::Css(css.into())
    }

    pub fn xpath(xpath: impl Into<String>) -> Self {
        Self::XPath(xpath.into())
    }

    pub fn text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text {
            css: css.into(),
            text: text.into(),
        }
    }

    pub fn contains_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::ContainsText {
            css: css.into(),
            text: text.into(),
        }
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder(text.into())
    }

    pub fn nth(css: impl Into<String>, index: usize) -> Self {
        Self::Nth {
            css: css.into(),
            index,
        }
    }

    /// Narrow this selector to a CSS match inside it.
    pub fn child(&self, css: impl Into<String>) -> Self {
        Self::Within {
            parent: Box::new(self.clone()),
            css: css.into(),
        }
    }

    /// JS expression evaluating to the element or `null`.
    pub fn to_js(&self) -> String {
        match self {
            Self::Css(css) => format!("document.querySelector({})", js_str(css)),
            Self::XPath(xpath) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_str(xpath)
            ),
            Self::Text { css, text } => format!(
                "Array.from(document.querySelectorAll({})).find(e => e.textContent.trim() === {}) || null",
                js_str(css),
                js_str(text)
            ),
            Self::ContainsText { css, text } => format!(
                "Array.from(document.querySelectorAll({})).find(e => e.textContent.includes({})) || null",
                js_str(css),
                js_str(text)
            ),
            Self::TestId(id) => format!(
                "document.querySelector({})",
                js_str(&format!("[data-testid={}]", css_attr_str(id)))
            ),
            Self::Placeholder(text) => format!(
                "document.querySelector({})",
                js_str(&format!("[placeholder={}]", css_attr_str(text)))
            ),
            Self::Nth { css, index } => format!(
                "document.querySelectorAll({})[{}] || null",
                js_str(css),
                index
            ),
            Self::Within { parent, css } => format!(
                "((p) => p ? p.querySelector({}) : null)({})",
                js_str(css),
                parent.to_js()
            ),
        }
    }

    /// JS expression evaluating to an array of every match.
    pub fn to_js_all(&self) -> String {
        match self {
            Self::Css(css) => format!("Array.from(document.querySelectorAll({}))", js_str(css)),
            Self::XPath(xpath) => format!(
                "((r) => Array.from({{length: r.snapshotLength}}, (_, i) => r.snapshotItem(i)))(document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null))",
                js_str(xpath)
            ),
            Self::Text { css, text } => format!(
                "Array.from(document.querySelectorAll({})).filter(e => e.textContent.trim() === {})",
                js_str(css),
                js_str(text)
            ),
            Self::ContainsText { css, text } => format!(
                "Array.from(document.querySelectorAll({})).filter(e => e.textContent.includes({}))",
                js_str(css),
                js_str(text)
            ),
            Self::Within { parent, css } => format!(
                "((p) => p ? Array.from(p.querySelectorAll({})) : [])({})",
                js_str(css),
                parent.to_js()
            ),
            single => format!("((e) => e ? [e] : [])({})", single.to_js()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "{}", css),
            Self::XPath(xpath) => write!(f, "xpath={}", xpath),
            Self::Text { css, text } => write!(f, "{} with text {:?}", css, text),
            Self::ContainsText { css, text } => write!(f, "{} containing {:?}", css, text),
            Self::TestId(id) => write!(f, "[data-testid={:?}]", id),
            Self::Placeholder(text) => write!(f, "[placeholder={:?}]", text),
            Self::Nth { css, index } => write!(f, "{} >> nth={}", css, index),
            Self::Within { parent, css } => write!(f, "{} >> {}", parent, css),
        }
    }
}

/// Quote a Rust string as a JS string literal.
pub(crate) fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Quote a value for use inside a CSS attribute selector.
fn css_attr_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Snapshot of everything the readiness checks look at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementState {
    pub visible: bool,
    pub enabled: bool,
    pub pointer_events: bool,
    pub in_viewport: bool,
}

impl ElementState {
    pub fn is_clickable(&self) -> bool {
        self.visible && self.enabled && self.pointer_events
    }
}

#[derive(Deserialize)]
struct Probe<T> {
    found: bool,
    value: Option<T>,
}

const STATE_JS: &str = r#"(() => {
    const r = el.getBoundingClientRect();
    const s = window.getComputedStyle(el);
    const visible = r.width > 0 && r.height > 0
        && s.display !== 'none' && s.visibility !== 'hidden' && s.opacity !== '0';
    const enabled = !el.disabled && !el.hasAttribute('disabled')
        && el.getAttribute('aria-disabled') !== 'true';
    const inViewport = r.bottom > 0 && r.right > 0
        && r.top < (window.innerHeight || document.documentElement.clientHeight)
        && r.left < (window.innerWidth || document.documentElement.clientWidth);
    return { visible, enabled, pointerEvents: s.pointerEvents !== 'none', inViewport };
})()"#;

#[derive(Clone)]
pub struct Element {
    page: Page,
    selector: Selector,
    name: String,
    timeout: Duration,
    poll_interval: Duration,
    click_attempts: usize,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .finish()
    }
}

impl Element {
    pub fn new(page: Page, selector: Selector) -> Self {
        let name = selector.to_string();
        Self {
            page,
            selector,
            name,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            click_attempts: DEFAULT_CLICK_ATTEMPTS,
        }
    }

    /// Human-readable name used in logs and errors
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_click_attempts(mut self, attempts: usize) -> Self {
        self.click_attempts = attempts.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A CSS match inside this element, sharing its timeouts.
    pub fn child(&self, css: &str, name: impl Into<String>) -> Element {
        Element {
            page: self.page.clone(),
            selector: self.selector.child(css),
            name: name.into(),
            timeout: self.timeout,
            poll_interval: self.poll_interval,
            click_attempts: self.click_attempts,
        }
    }

    /// Evaluate `body` with `el` bound to the resolved element.
    async fn eval<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return {{ found: false, value: null }}; return {{ found: true, value: {} }}; }})()",
            self.selector.to_js(),
            body
        );
        let probe: Probe<T> = self
            .page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| E2eError::Other(format!("Bad result for {}: {}", self.name, e)))?;

        if !probe.found {
            return Err(E2eError::ElementNotFound(self.name.clone()));
        }
        probe
            .value
            .ok_or_else(|| E2eError::Other(format!("Empty result for {}", self.name)))
    }

    pub async fn state(&self) -> Result<ElementState> {
        self.eval(STATE_JS).await
    }

    pub async fn is_present(&self) -> Result<bool> {
        match self.eval::<bool>("true").await {
            Ok(_) => Ok(true),
            Err(E2eError::ElementNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Missing elements count as not visible.
    pub async fn is_visible(&self) -> Result<bool> {
        match self.state().await {
            Ok(state) => Ok(state.visible),
            Err(E2eError::ElementNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        Ok(self.state().await?.enabled)
    }

    pub async fn has_pointer_events(&self) -> Result<bool> {
        Ok(self.state().await?.pointer_events)
    }

    pub async fn is_in_viewport(&self) -> Result<bool> {
        Ok(self.state().await?.in_viewport)
    }

    pub async fn count(&self) -> Result<usize> {
        let script = format!("({}).length", self.selector.to_js_all());
        self.page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| E2eError::Other(format!("Bad count for {}: {}", self.name, e)))
    }

    pub async fn wait_visible(&self) -> Result<()> {
        let this = self;
        poll_until(
            &format!("{} to be visible", self.name),
            self.timeout,
            self.poll_interval,
            move || this.is_visible(),
        )
        .await
    }

    pub async fn wait_hidden(&self) -> Result<()> {
        let this = self;
        poll_until(
            &format!("{} to disappear", self.name),
            self.timeout,
            self.poll_interval,
            move || async move { Ok(!this.is_visible().await?) },
        )
        .await
    }

    pub async fn wait_enabled(&self) -> Result<()> {
        let this = self;
        poll_until(
            &format!("{} to be enabled", self.name),
            self.timeout,
            self.poll_interval,
            move || async move { Ok(this.state().await?.enabled) },
        )
        .await
    }

    pub async fn wait_clickable(&self) -> Result<()> {
        let this = self;
        poll_until(
            &format!("{} to be clickable", self.name),
            self.timeout,
            self.poll_interval,
            move || async move { Ok(this.state().await?.is_clickable()) },
        )
        .await
    }

    /// Wait for a spinner/overlay to go away; a stuck spinner is only logged.
    pub async fn wait_spinner_gone(&self) -> Result<()> {
        let this = self;
        poll_until_or_warn(
            &format!("{} to disappear", self.name),
            self.timeout,
            self.poll_interval,
            move || async move { Ok(!this.is_visible().await?) },
        )
        .await
    }

    pub async fn scroll_into_view(&self) -> Result<()> {
        self.eval::<bool>("(el.scrollIntoView({block: 'center', inline: 'center'}), true)")
            .await?;
        Ok(())
    }

    async fn click_once(&self) -> Result<()> {
        self.wait_clickable().await?;

        #[derive(Deserialize)]
        struct Center {
            x: f64,
            y: f64,
        }
        let center: Center = self
            .eval(
                "(el.scrollIntoView({block: 'center', inline: 'center'}), \
                 ((r) => ({ x: r.left + r.width / 2, y: r.top + r.height / 2 }))(el.getBoundingClientRect()))",
            )
            .await?;

        self.page.click(Point::new(center.x, center.y)).await?;
        Ok(())
    }

    /// Click the element centre, retrying while it is covered or re-rendering.
    pub async fn click(&self) -> Result<()> {
        let mut last_error = None;
        for attempt in 1..=self.click_attempts {
            match self.click_once().await {
                Ok(()) => {
                    log::debug!("Clicked {}", self.name);
                    return Ok(());
                }
                Err(e) => {
                    log::debug!(
                        "Click on {} failed (attempt {}/{}): {}",
                        self.name,
                        attempt,
                        self.click_attempts,
                        e
                    );
                    last_error = Some(e);
                    if attempt < self.click_attempts {
                        tokio::time::sleep(self.poll_interval).await;
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| E2eError::ElementNotFound(self.name.clone())))
    }

    /// Replace the current value with `text` as if typed.
    pub async fn fill(&self, text: &str) -> Result<()> {
        self.wait_visible().await?;
        self.eval::<bool>(
            "(() => { el.focus(); \
               const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
               const d = Object.getOwnPropertyDescriptor(proto, 'value'); \
               if (d && d.set) { d.set.call(el, ''); } else { el.value = ''; } \
               el.dispatchEvent(new Event('input', { bubbles: true })); \
               return true; })()",
        )
        .await?;

        if !text.is_empty() {
            self.page.execute(InsertTextParams::new(text)).await?;
        }

        self.eval::<bool>("(el.dispatchEvent(new Event('change', { bubbles: true })), true)")
            .await?;
        log::debug!("Filled {}", self.name);
        Ok(())
    }

    /// Tick or untick a checkbox, clicking only when the state differs.
    pub async fn set_checked(&self, checked: bool) -> Result<()> {
        let current: bool = self.eval("!!el.checked").await?;
        if current != checked {
            self.click().await?;
        }
        Ok(())
    }

    /// Pick an `<option>` of a native select by its visible label.
    pub async fn select_option(&self, label: &str) -> Result<()> {
        self.wait_visible().await?;
        let body = format!(
            "(() => {{ const o = Array.from(el.options || []).find(o => o.textContent.trim() === {}); \
               if (!o) return false; el.value = o.value; \
               el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()",
            js_str(label)
        );
        let selected: bool = self.eval(&body).await?;
        if selected {
            Ok(())
        } else {
            Err(E2eError::ElementNotFound(format!(
                "option {:?} in {}",
                label, self.name
            )))
        }
    }

    /// Attach local files to an `<input type="file">`.
    pub async fn set_input_files(&self, files: &[&Path]) -> Result<()> {
        let css = match &self.selector {
            Selector::Css(css) => css.clone(),
            other => {
                return Err(E2eError::Other(format!(
                    "File inputs need a CSS selector, got {}",
                    other
                )))
            }
        };
        let node = self
            .page
            .find_element(css.as_str())
            .await
            .map_err(|_| E2eError::ElementNotFound(self.name.clone()))?;

        let params = SetFileInputFilesParams::builder()
            .files(files.iter().map(|p| p.to_string_lossy().to_string()))
            .backend_node_id(node.backend_node_id)
            .build()
            .map_err(E2eError::Other)?;
        self.page.execute(params).await?;
        Ok(())
    }

    pub async fn text(&self) -> Result<String> {
        self.eval("(el.innerText ?? el.textContent ?? '').trim()").await
    }

    pub async fn value(&self) -> Result<String> {
        self.eval("String(el.value ?? '')").await
    }

    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let script = format!(
            "(() => {{ const el = {}; return el ? {{ found: true, value: el.getAttribute({}) }} : {{ found: false, value: null }}; }})()",
            self.selector.to_js(),
            js_str(name)
        );
        let probe: Probe<String> = self
            .page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| E2eError::Other(format!("Bad result for {}: {}", self.name, e)))?;
        if probe.found {
            Ok(probe.value)
        } else {
            Err(E2eError::ElementNotFound(self.name.clone()))
        }
    }

    /// Wait until the element's text equals `expected`.
    pub async fn wait_text(&self, expected: &str) -> Result<()> {
        let this = self;
        poll_until(
            &format!("{} to read {:?}", self.name, expected),
            self.timeout,
            self.poll_interval,
            move || async move { Ok(this.text().await? == expected) },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_strings_are_escaped() {
        assert_eq!(js_str(r#"a"b"#), r#""a\"b""#);
        let sel = Selector::text("button", "Don't \"panic\"");
        assert!(sel.to_js().contains(r#""Don't \"panic\"""#));
    }

    #[test]
    fn attribute_values_are_css_quoted() {
        assert_eq!(css_attr_str("login"), r#""login""#);
        assert_eq!(css_attr_str(r#"say "hi" \ bye"#), r#""say \"hi\" \\ bye""#);

        let js = Selector::placeholder(r#"Name "quoted""#).to_js();
        let css: String = serde_json::from_str(
            js.trim_start_matches("document.querySelector(")
                .trim_end_matches(')'),
        )
        .unwrap();
        assert_eq!(css, r#"[placeholder="Name \"quoted\""]"#);
    }

    #[test]
    fn nested_selectors_compose() {
        let row = Selector::contains_text("tr", "disk-abc");
        let delete = row.child("button[aria-label=\"Delete\"]");
        let js = delete.to_js();
        assert!(js.starts_with("((p) => p ? p.querySelector("));
        assert!(js.contains("textContent.includes(\"disk-abc\")"));
        assert_eq!(
            delete.to_string(),
            "tr containing \"disk-abc\" >> button[aria-label=\"Delete\"]"
        );
    }

    #[test]
    fn single_match_selectors_wrap_into_arrays() {
        let js = Selector::test_id("login").to_js_all();
        assert!(js.starts_with("((e) => e ? [e] : [])("));
        assert!(js.contains("data-testid"));
    }

    #[test]
    fn clickable_needs_all_three_conditions() {
        let mut state = ElementState {
            visible: true,
            enabled: true,
            pointer_events: true,
            in_viewport: false,
        };
        assert!(state.is_clickable());
        state.pointer_events = false;
        assert!(!state.is_clickable());
    }
}
