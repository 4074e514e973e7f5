// spider_chrome re-exports chromiumoxide API
use crate::config::E2eConfig;
use crate::error::{E2eError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide_fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};

pub struct ChromeDriver {
    browser: Browser,
    temp_dir: Option<PathBuf>,
}

/// Connection mode for Chrome browser
pub enum ConnectionMode {
    /// Sandboxed mode - launches Chrome using system installation
    Sandboxed {
        chrome_path: Option<String>,
        no_sandbox: bool,
        headless: bool,
    },
    /// Advanced mode - connects to existing Chrome on debug port
    DebugPort(u16),
}

impl ChromeDriver {
    /// Helper method to get the current active page, excluding Chrome's new-tab-page
    async fn get_active_page(&self) -> Result<chromiumoxide::page::Page> {
        let pages = self.browser.pages().await?;

        for page in pages.iter() {
            if let Ok(Some(url)) = page.url().await {
                if !url.starts_with("chrome://") {
                    return Ok(page.clone());
                }
            }
        }

        if let Some(page) = pages.last() {
            return Ok(page.clone());
        }

        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| E2eError::Other(format!("Failed to create page: {}", e)))
    }

    /// Launch Chrome with auto-detection for CI environments
    pub async fn launch_auto() -> Result<Self> {
        let is_ci = std::env::var("CI").is_ok()
            || std::env::var("GITHUB_ACTIONS").is_ok()
            || std::env::var("GITLAB_CI").is_ok()
            || std::env::var("JENKINS_HOME").is_ok()
            || std::env::var("CIRCLECI").is_ok();

        Self::new(ConnectionMode::Sandboxed {
            chrome_path: None,
            no_sandbox: is_ci, // CI environments typically need --no-sandbox
            headless: is_ci,
        })
        .await
    }

    /// Launch Chrome as described by the suite configuration and point its
    /// downloads at `config.download_dir`.
    pub async fn from_config(config: &E2eConfig) -> Result<Self> {
        let driver = Self::new(ConnectionMode::Sandboxed {
            chrome_path: config.chrome_path.clone(),
            no_sandbox: config.no_sandbox,
            headless: config.headless,
        })
        .await?;
        driver.set_download_dir(&config.download_dir).await?;
        Ok(driver)
    }

    /// Connect to existing Chrome on debug port (advanced mode)
    pub async fn connect_debug_port(port: u16) -> Result<Self> {
        Self::new(ConnectionMode::DebugPort(port)).await
    }

    /// Create new ChromeDriver with specified connection mode
    pub async fn new(mode: ConnectionMode) -> Result<Self> {
        let (browser, temp_dir) = match mode {
            ConnectionMode::Sandboxed {
                chrome_path,
                no_sandbox,
                headless,
            } => {
                // A fresh profile per instance keeps parallel scenarios from
                // sharing cookies or local storage
                let unique_id = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or_default();
                let temp_dir = std::env::temp_dir().join(format!("apolo-e2e-{}", unique_id));
                std::fs::create_dir_all(&temp_dir).map_err(|e| {
                    E2eError::LaunchFailed(format!("Failed to create temp directory: {}", e))
                })?;

                let mut config = if headless {
                    BrowserConfig::builder()
                } else {
                    BrowserConfig::builder().with_head()
                };

                config = config.user_data_dir(&temp_dir);

                // Linux AppArmor workaround
                if no_sandbox {
                    config = config.arg("--no-sandbox");
                }

                if let Some(path) = chrome_path {
                    config = config.chrome_executable(path);
                } else {
                    match Self::ensure_chrome_installed().await {
                        Ok(path) => {
                            config = config.chrome_executable(path);
                        }
                        Err(e) => {
                            log::warn!("Auto-download failed ({}), trying system Chrome...", e);
                        }
                    }
                }

                let config = config.build().map_err(|e| {
                    E2eError::LaunchFailed(format!("{}. {}", e, CHROME_NOT_FOUND_HINT))
                })?;

                let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
                    E2eError::LaunchFailed(format!("{}. {}", e, CHROME_NOT_FOUND_HINT))
                })?;

                tokio::spawn(async move {
                    while (handler.next().await).is_some() {
                        // Handle browser events
                    }
                });

                (browser, Some(temp_dir))
            }
            ConnectionMode::DebugPort(port) => {
                let url = format!("http://localhost:{}", port);
                let (browser, mut handler) = Browser::connect(&url).await.map_err(|e| {
                    E2eError::ConnectionFailed(format!(
                        "Failed to connect to Chrome on port {}. \
                             Make sure Chrome is running with --remote-debugging-port={}: {}",
                        port, port, e
                    ))
                })?;

                tokio::spawn(async move {
                    while (handler.next().await).is_some() {
                        // Handle browser events
                    }
                });

                (browser, None)
            }
        };

        Ok(Self { browser, temp_dir })
    }

    /// Navigate to a URL
    pub async fn navigate(&self, url: &str) -> Result<()> {
        use chromiumoxide::cdp::browser_protocol::page::{EventLoadEventFired, NavigateParams};

        let normalized_url = normalize_url(url);
        log::debug!("Navigating to {}", normalized_url);

        let mut pages = self.browser.pages().await?;

        // Scenarios drive exactly one tab; stray popups from a previous step go away
        for (i, p) in pages.iter().enumerate() {
            if i > 0 {
                log::debug!("Closing extra page {}", i);
                let _ = p
                    .execute(
                        chromiumoxide::cdp::browser_protocol::target::CloseTargetParams::new(
                            p.target_id().clone(),
                        ),
                    )
                    .await;
            }
        }

        pages = self.browser.pages().await?;

        let page = if let Some(page) = pages.first() {
            page.clone()
        } else {
            self.browser
                .new_page("about:blank")
                .await
                .map_err(|e| E2eError::NavigationFailed(e.to_string()))?
        };

        let params = NavigateParams::builder()
            .url(&normalized_url)
            .build()
            .map_err(|e| {
                E2eError::NavigationFailed(format!("Invalid URL {}: {}", normalized_url, e))
            })?;

        // Subscribe before navigating so a fast load cannot be missed
        let mut load_events = page.event_listener::<EventLoadEventFired>().await?;

        let response = page.execute(params).await.map_err(|e| {
            let error_str = e.to_string();
            if error_str.contains("oneshot canceled") {
                E2eError::NavigationFailed(
                    "Browser connection lost. The browser may have been closed or crashed."
                        .to_string(),
                )
            } else {
                E2eError::NavigationFailed(format!(
                    "Failed to navigate to {}: {}",
                    normalized_url, e
                ))
            }
        })?;

        if let Some(error_text) = response.result.error_text.clone() {
            return Err(E2eError::NavigationFailed(format!(
                "Navigation error: {}",
                error_text
            )));
        }

        let load_result = tokio::time::timeout(
            tokio::time::Duration::from_secs(30),
            load_events.next(),
        )
        .await;

        if load_result.is_err() {
            return Err(E2eError::NavigationFailed(format!(
                "Timed out waiting for {} to load after 30s",
                normalized_url
            )));
        }

        log::info!("Navigated to {}", normalized_url);
        Ok(())
    }

    /// Get current URL
    pub async fn current_url(&self) -> Result<String> {
        let page = self.get_active_page().await?;

        page.url()
            .await
            .map_err(|e| E2eError::Other(e.to_string()))?
            .ok_or(E2eError::NoPage)
    }

    /// Get page title
    pub async fn title(&self) -> Result<String> {
        let page = self.get_active_page().await?;

        page.get_title()
            .await
            .map_err(|e| E2eError::Other(e.to_string()))?
            .ok_or(E2eError::NoPage)
    }

    /// Take a screenshot of the current page
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        let page = self.get_active_page().await?;

        page.screenshot(chromiumoxide::page::ScreenshotParams::default())
            .await
            .map_err(|e| E2eError::Other(format!("Failed to take screenshot: {}", e)))
    }

    /// Take a screenshot and save to file
    pub async fn screenshot_to_file(&self, path: &Path) -> Result<()> {
        let screenshot_data = self.screenshot().await?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, screenshot_data).await?;

        Ok(())
    }

    /// Save a screenshot named after the scenario into `dir`.
    ///
    /// The file name carries a UTC timestamp so reruns don't overwrite
    /// earlier failures. Returns the written path.
    pub async fn capture_failure(&self, dir: &Path, scenario: &str) -> Result<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
        let slug: String = scenario
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let path = dir.join(format!("{}-{}.png", slug.trim_matches('-'), stamp));
        self.screenshot_to_file(&path).await?;
        log::info!("Saved failure screenshot to {}", path.display());
        Ok(path)
    }

    /// Make the browser save downloads into `dir` without prompting.
    pub async fn set_download_dir(&self, dir: &Path) -> Result<()> {
        use chromiumoxide::cdp::browser_protocol::browser::{
            SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
        };

        tokio::fs::create_dir_all(dir).await?;
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(dir.to_string_lossy().to_string())
            .build()
            .map_err(E2eError::Other)?;

        let page = self.get_active_page().await?;
        page.execute(params).await?;
        log::debug!("Downloads go to {}", dir.display());
        Ok(())
    }

    /// Execute arbitrary JavaScript in the page context
    pub async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        let page = self.get_active_page().await?;

        let result = page
            .evaluate(script)
            .await
            .map_err(|e| E2eError::Other(format!("Script execution failed: {}", e)))?;

        Ok(result.into_value().unwrap_or(serde_json::Value::Null))
    }

    /// Execute JavaScript and return a specific type
    pub async fn execute_script_typed<T: serde::de::DeserializeOwned>(
        &self,
        script: &str,
    ) -> Result<T> {
        let page = self.get_active_page().await?;

        let result = page
            .evaluate(script)
            .await
            .map_err(|e| E2eError::Other(format!("Script execution failed: {}", e)))?;

        result
            .into_value()
            .map_err(|e| E2eError::Other(format!("Failed to deserialize result: {}", e)))
    }

    /// Get access to the current page for page objects
    /// Returns the active page (excluding Chrome's new-tab-page)
    pub async fn current_page(&self) -> Result<chromiumoxide::page::Page> {
        self.get_active_page().await
    }

    /// Check if the browser is still alive and responsive
    pub async fn is_alive(&self) -> bool {
        match self.browser.pages().await {
            Ok(pages) => {
                if let Some(page) = pages.first() {
                    matches!(
                        tokio::time::timeout(tokio::time::Duration::from_secs(2), page.url()).await,
                        Ok(Ok(_))
                    )
                } else {
                    true
                }
            }
            Err(_) => false,
        }
    }

    /// Close the browser connection
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| E2eError::Other(e.to_string()))?;
        Ok(())
    }

    /// Ensure Chrome is installed, downloading if necessary
    async fn ensure_chrome_installed() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| E2eError::Other("Cannot determine cache directory".to_string()))?
            .join("apolo-e2e")
            .join("chrome");

        tokio::fs::create_dir_all(&cache_dir).await?;

        let revision_info_path = cache_dir.join(".downloaded");
        if revision_info_path.exists() {
            if let Some(executable) = Self::find_chrome_in_cache(&cache_dir) {
                return Ok(executable);
            }
        }

        log::info!("Downloading Chrome for Testing (first time only, ~150MB)...");
        let fetcher = BrowserFetcher::new(
            BrowserFetcherOptions::builder()
                .with_path(&cache_dir)
                .build()
                .map_err(|e| E2eError::Other(format!("Fetcher config failed: {}", e)))?,
        );

        let info = fetcher
            .fetch()
            .await
            .map_err(|e| E2eError::Other(format!("Chrome download failed: {}", e)))?;

        tokio::fs::write(&revision_info_path, "downloaded").await?;
        log::info!("Chrome downloaded to {}", info.executable_path.display());

        Ok(info.executable_path)
    }

    fn find_chrome_in_cache(cache_dir: &Path) -> Option<PathBuf> {
        [
            "chrome",
            "chrome.exe",
            "Google Chrome.app/Contents/MacOS/Google Chrome",
            "chrome-linux/chrome",
            "chrome-mac/Chromium.app/Contents/MacOS/Chromium",
            "chrome-win/chrome.exe",
        ]
        .iter()
        .map(|p| cache_dir.join(p))
        .find(|p| p.exists())
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        if let Some(temp_dir) = &self.temp_dir {
            if temp_dir.exists() {
                let _ = std::fs::remove_dir_all(temp_dir);
            }
        }
    }
}

const CHROME_NOT_FOUND_HINT: &str = "Chrome not found. Install Chrome or Chromium, \
     set APOLO_E2E_CHROME_PATH, or try APOLO_E2E_NO_SANDBOX=1 on Linux";

/// Add `https://` when `url` carries no scheme.
pub fn normalize_url(url: &str) -> String {
    const SCHEMES: [&str; 5] = ["http://", "https://", "file://", "about:", "data:"];
    if SCHEMES.iter().any(|s| url.starts_with(s)) {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_url;

    #[test]
    fn normalize_adds_https_only_when_missing() {
        assert_eq!(normalize_url("console.apolo.us"), "https://console.apolo.us");
        assert_eq!(normalize_url("http://localhost:3000"), "http://localhost:3000");
        assert_eq!(normalize_url("about:blank"), "about:blank");
    }
}
