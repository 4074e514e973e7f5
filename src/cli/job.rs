use super::runner::CliRunner;
use super::table::{parse_box_table, parse_key_value_strict};
use crate::error::{E2eError, Result};
use crate::wait::poll_until;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Lifecycle states the CLI reports for a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    Suspended,
    Other(String),
}

impl JobStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => JobStatus::Pending,
            "running" => JobStatus::Running,
            "succeeded" => JobStatus::Succeeded,
            "failed" => JobStatus::Failed,
            "cancelled" => JobStatus::Cancelled,
            "suspended" => JobStatus::Suspended,
            _ => JobStatus::Other(s.trim().to_string()),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub id: String,
    pub name: String,
    pub status: JobStatus,
    pub image: String,
}

fn job_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bjob-[0-9a-f]{8}(?:-[0-9a-f]{4}){3}-[0-9a-f]{12}\b")
            .expect("valid job id regex")
    })
}

/// First job id mentioned in `text`.
pub fn extract_job_id(text: &str) -> Option<String> {
    job_id_re().find(text).map(|m| m.as_str().to_string())
}

pub fn parse_job_status(text: &str) -> Result<JobInfo> {
    let row = parse_key_value_strict(text, &["Job", "Status", "Image"])?;
    let name = super::table::parse_key_value(text, &["Name"]);
    Ok(JobInfo {
        id: row["Job"].clone(),
        name: name.get("Name").cloned().unwrap_or_default(),
        status: JobStatus::parse(&row["Status"]),
        image: row["Image"].clone(),
    })
}

pub fn parse_job_list(text: &str) -> Result<Vec<JobInfo>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(parse_box_table(text, &["ID", "NAME", "STATUS", "IMAGE"])?
        .into_iter()
        .map(|row| JobInfo {
            status: JobStatus::parse(&row["STATUS"]),
            id: row["ID"].clone(),
            name: row["NAME"].clone(),
            image: row["IMAGE"].clone(),
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct JobCli {
    runner: CliRunner,
}

impl JobCli {
    pub fn new(runner: CliRunner) -> Self {
        Self { runner }
    }

    /// Start a job detached and return its id.
    pub async fn run(
        &self,
        image: &str,
        name: &str,
        preset: Option<&str>,
        command: &[&str],
    ) -> Result<String> {
        let mut args = vec!["run", "--detach", "--name", name];
        if let Some(preset) = preset {
            args.extend(["--preset", preset]);
        }
        args.push(image);
        if !command.is_empty() {
            args.push("--");
            args.extend(command);
        }
        let out = self.runner.run_allow_stderr(&args).await?;
        extract_job_id(&out.stdout)
            .or_else(|| extract_job_id(&out.stderr))
            .ok_or_else(|| E2eError::Parse(format!("no job id in output of run:\n{}", out.stdout)))
    }

    pub async fn ps(&self) -> Result<Vec<JobInfo>> {
        let out = self.runner.run(&["ps", "--all"]).await?;
        parse_job_list(&out.stdout)
    }

    pub async fn status(&self, job: &str) -> Result<JobInfo> {
        let out = self.runner.run(&["status", job]).await?;
        parse_job_status(&out.stdout)
    }

    pub async fn kill(&self, job: &str) -> Result<()> {
        self.runner.run(&["kill", job]).await?;
        Ok(())
    }

    /// Poll `status` until the job reaches `expected`.
    pub async fn wait_status(
        &self,
        job: &str,
        expected: JobStatus,
        timeout: Duration,
        interval: Duration,
    ) -> Result<()> {
        let expected = &expected;
        poll_until(
            &format!("job {} to be {:?}", job, expected),
            timeout,
            interval,
            move || async move { Ok(&self.status(job).await?.status == expected) },
        )
        .await
    }
}
