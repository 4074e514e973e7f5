//! Suite configuration
//!
//! Values come from `APOLO_E2E_*` environment variables, optionally layered
//! over a YAML file. The binary can override any field from its flags.

use crate::error::{E2eError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for element waits (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for element waits (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Default overall timeout for a CLI invocation (seconds)
pub const DEFAULT_CLI_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct E2eConfig {
    /// Base URL of the web console
    pub base_url: String,

    /// CLI binary (looked up on PATH when not absolute)
    pub cli_binary: String,

    /// Arguments placed before every CLI subcommand
    pub cli_base_args: Vec<String>,

    /// Overall timeout for one CLI invocation, in seconds
    pub cli_timeout_secs: u64,

    pub headless: bool,
    pub no_sandbox: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,

    /// Element wait timeout, in milliseconds
    pub timeout_ms: u64,

    /// Element poll interval, in milliseconds
    pub poll_interval_ms: u64,

    /// Where the browser stores downloaded files
    pub download_dir: PathBuf,

    /// Where screenshots of failed scenarios go
    pub artifacts_dir: PathBuf,

    /// Domain used when generating test user emails
    pub email_domain: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,

    #[serde(skip_serializing)]
    pub user_password: Option<String>,

    /// Organization and project the CLI is switched to before a scenario
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            cli_binary: "apolo".to_string(),
            cli_base_args: Vec::new(),
            cli_timeout_secs: DEFAULT_CLI_TIMEOUT_SECS,
            headless: true,
            no_sandbox: false,
            chrome_path: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            download_dir: std::env::temp_dir().join("apolo-e2e-downloads"),
            artifacts_dir: PathBuf::from("artifacts"),
            email_domain: "example.com".to_string(),
            user_email: None,
            user_password: None,
            organization: None,
            project: None,
        }
    }
}

impl E2eConfig {
    /// Load configuration from the environment on top of the defaults.
    ///
    /// When `APOLO_E2E_CONFIG` names a YAML file, that file is read first and
    /// environment variables override it.
    pub fn from_env() -> Result<Self> {
        let base = match std::env::var("APOLO_E2E_CONFIG") {
            Ok(path) => Self::from_yaml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Read a YAML configuration file. Missing fields keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            E2eError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `APOLO_E2E_*` overrides read through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("APOLO_E2E_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("APOLO_E2E_CLI") {
            self.cli_binary = v;
        }
        if let Some(v) = lookup("APOLO_E2E_CLI_ARGS") {
            self.cli_base_args = v.split_whitespace().map(str::to_string).collect();
        }
        if let Some(v) = lookup("APOLO_E2E_CLI_TIMEOUT_SECS") {
            self.cli_timeout_secs = parse_number("APOLO_E2E_CLI_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("APOLO_E2E_HEADLESS") {
            self.headless = parse_flag("APOLO_E2E_HEADLESS", &v)?;
        }
        if let Some(v) = lookup("APOLO_E2E_NO_SANDBOX") {
            self.no_sandbox = parse_flag("APOLO_E2E_NO_SANDBOX", &v)?;
        }
        if let Some(v) = lookup("APOLO_E2E_CHROME_PATH") {
            self.chrome_path = Some(v);
        }
        if let Some(v) = lookup("APOLO_E2E_TIMEOUT_MS") {
            self.timeout_ms = parse_number("APOLO_E2E_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("APOLO_E2E_POLL_INTERVAL_MS") {
            self.poll_interval_ms = parse_number("APOLO_E2E_POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("APOLO_E2E_DOWNLOAD_DIR") {
            self.download_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("APOLO_E2E_ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("APOLO_E2E_EMAIL_DOMAIN") {
            self.email_domain = v;
        }
        if let Some(v) = lookup("APOLO_E2E_USER_EMAIL") {
            self.user_email = Some(v);
        }
        if let Some(v) = lookup("APOLO_E2E_USER_PASSWORD") {
            self.user_password = Some(v);
        }
        if let Some(v) = lookup("APOLO_E2E_ORG") {
            self.organization = Some(v);
        }
        if let Some(v) = lookup("APOLO_E2E_PROJECT") {
            self.project = Some(v);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(E2eError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.cli_binary.trim().is_empty() {
            return Err(E2eError::Config("cli_binary must not be empty".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(E2eError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn cli_timeout(&self) -> Duration {
        Duration::from_secs(self.cli_timeout_secs)
    }

    /// Absolute console URL for a path such as `/apps`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(E2eError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| E2eError::Config(format!("{} must be a number, got {:?}", key, value)))
}
