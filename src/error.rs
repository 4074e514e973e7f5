use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Failed to connect to Chrome: {0}")]
    ConnectionFailed(String),

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("No page available")]
    NoPage,

    #[error("Timed out after {elapsed:?} waiting for {what}")]
    Timeout { what: String, elapsed: Duration },

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("CLI command `{command}` failed: {stderr}")]
    Cli { command: String, stderr: String },

    #[error("CLI command `{command}` timed out after {timeout:?}")]
    CliTimeout { command: String, timeout: Duration },

    #[error("Failed to parse CLI output: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CDP error: {0}")]
    CdpError(#[from] chromiumoxide::error::CdpError),

    #[error("Other error: {0}")]
    Other(String),
}

impl E2eError {
    /// Build an assertion error in the usual "expected vs. actual" shape.
    pub fn mismatch(
        what: impl std::fmt::Display,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        E2eError::Assertion(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        ))
    }
}

pub type Result<T> = std::result::Result<T, E2eError>;

/// Fail with [`E2eError::Assertion`] unless `expected == actual`.
pub fn ensure_eq<T>(what: &str, expected: T, actual: T) -> Result<()>
where
    T: PartialEq + std::fmt::Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(E2eError::mismatch(what, expected, actual))
    }
}

/// Fail with [`E2eError::Assertion`] unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(E2eError::Assertion(message.into()))
    }
}
