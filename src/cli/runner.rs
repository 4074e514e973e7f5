//! Subprocess runner for the platform CLI

use crate::config::E2eConfig;
use crate::error::{E2eError, Result};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Stderr lines that don't mean the command failed
const BENIGN_STDERR: [&str; 3] = [
    "You are using",
    "consider upgrading",
    "A new version",
];

/// Captured result of one CLI invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

impl CliOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stderr with update notices and blank lines removed.
    pub fn meaningful_stderr(&self) -> String {
        self.stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !BENIGN_STDERR.iter().any(|b| line.contains(b)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct CliRunner {
    binary: String,
    base_args: Vec<String>,
    env: Vec<(String, String)>,
    timeout: Duration,
}

impl CliRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            base_args: Vec::new(),
            env: Vec::new(),
            timeout: Duration::from_secs(crate::config::DEFAULT_CLI_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &E2eConfig) -> Self {
        Self::new(config.cli_binary.clone())
            .with_base_args(config.cli_base_args.iter().cloned())
            .with_timeout(config.cli_timeout())
    }

    /// Arguments placed before every subcommand (e.g. a script path when
    /// the binary is an interpreter).
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn display(&self, args: &[&str]) -> String {
        std::iter::once(self.binary.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run a command and capture its output without judging it.
    pub async fn run_raw(&self, args: &[&str]) -> Result<CliOutput> {
        let command = self.display(args);
        log::info!("$ {}", command);

        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.base_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let start = Instant::now();
        let child = cmd.spawn().map_err(|e| E2eError::Cli {
            command: command.clone(),
            stderr: format!("failed to spawn: {}", e),
        })?;

        // Both pipes are drained concurrently; dropping the future on
        // timeout kills the child
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                log::error!("{} timed out after {:?}", command, self.timeout);
                return Err(E2eError::CliTimeout {
                    command,
                    timeout: self.timeout,
                });
            }
        };

        let result = CliOutput {
            command,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            duration: start.elapsed(),
        };
        log::debug!(
            "{} finished with {:?} in {:?}",
            result.command,
            result.exit_code,
            result.duration
        );
        Ok(result)
    }

    /// Run a command; any meaningful stderr or a non-zero exit is an error.
    pub async fn run(&self, args: &[&str]) -> Result<CliOutput> {
        let output = self.run_raw(args).await?;
        check(output, false)
    }

    /// Run a command where stderr chatter is expected; only the exit code counts.
    pub async fn run_allow_stderr(&self, args: &[&str]) -> Result<CliOutput> {
        let output = self.run_raw(args).await?;
        check(output, true)
    }
}

fn check(output: CliOutput, allow_stderr: bool) -> Result<CliOutput> {
    let stderr = output.meaningful_stderr();
    if !allow_stderr && !stderr.is_empty() {
        return Err(E2eError::Cli {
            command: output.command,
            stderr,
        });
    }
    if !output.success() {
        let detail = if stderr.is_empty() {
            format!("exit code {:?}", output.exit_code)
        } else {
            stderr
        };
        return Err(E2eError::Cli {
            command: output.command,
            stderr: detail,
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh() -> CliRunner {
        CliRunner::new("sh").with_base_args(["-c"])
    }

    #[tokio::test]
    async fn captures_stdout() {
        let out = sh().run(&["printf 'hello\\nworld'"]).await.unwrap();
        assert_eq!(out.stdout, "hello\nworld");
        assert!(out.success());
    }

    #[tokio::test]
    async fn stderr_means_failure() {
        let err = sh().run(&["echo 'ERROR: disk not found' >&2"]).await.unwrap_err();
        match err {
            E2eError::Cli { stderr, .. } => assert_eq!(stderr, "ERROR: disk not found"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn update_notices_are_ignored() {
        let out = sh()
            .run(&["echo 'You are using apolo 24.1.0, however 24.2.0 is available' >&2; echo ok"])
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "ok");
    }

    #[tokio::test]
    async fn non_zero_exit_without_stderr_fails() {
        let err = sh().run(&["exit 3"]).await.unwrap_err();
        assert!(err.to_string().contains("exit code Some(3)"));

        let out = sh().run_allow_stderr(&["echo warn >&2; echo fine"]).await.unwrap();
        assert_eq!(out.stdout.trim(), "fine");
    }

    #[tokio::test]
    async fn slow_command_is_killed() {
        let err = sh()
            .with_timeout(Duration::from_millis(200))
            .run(&["sleep 5"])
            .await
            .unwrap_err();
        assert!(matches!(err, E2eError::CliTimeout { .. }));
    }

    #[tokio::test]
    async fn env_is_passed_through() {
        let out = sh()
            .with_env("APOLO_E2E_PROBE", "42")
            .run(&["echo $APOLO_E2E_PROBE"])
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "42");
    }

    #[tokio::test]
    async fn missing_binary_is_a_cli_error() {
        let err = CliRunner::new("/nonexistent/apolo")
            .run(&["disk", "ls"])
            .await
            .unwrap_err();
        assert!(matches!(err, E2eError::Cli { .. }));
    }
}
