use super::runner::CliRunner;
use super::table::parse_key_value;
use crate::error::{E2eError, Result};

/// Fields printed by `config show`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub user: String,
    pub cluster: String,
    pub organization: String,
    pub project: String,
    pub api_url: String,
}

const SHOW_KEYS: [&str; 5] = ["User Name", "Current Cluster", "Current Org", "Current Project", "API URL"];

impl CliConfig {
    pub fn parse(text: &str) -> Result<Self> {
        let row = parse_key_value(text, &SHOW_KEYS);
        let get = |key: &str| row.get(key).cloned().unwrap_or_default();
        let config = Self {
            user: get("User Name"),
            cluster: get("Current Cluster"),
            organization: get("Current Org"),
            project: get("Current Project"),
            api_url: get("API URL"),
        };
        if config.user.is_empty() {
            return Err(E2eError::Parse(format!(
                "config show printed no user:\n{}",
                text
            )));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigCli {
    runner: CliRunner,
}

impl ConfigCli {
    pub fn new(runner: CliRunner) -> Self {
        Self { runner }
    }

    pub async fn login_with_token(&self, token: &str, url: &str) -> Result<()> {
        // The CLI prints progress to stderr on login
        self.runner
            .run_allow_stderr(&["config", "login-with-token", token, url])
            .await?;
        Ok(())
    }

    pub async fn show(&self) -> Result<CliConfig> {
        let out = self.runner.run(&["config", "show"]).await?;
        CliConfig::parse(&out.stdout)
    }

    pub async fn switch_org(&self, org: &str) -> Result<()> {
        self.runner.run(&["config", "switch-org", org]).await?;
        Ok(())
    }

    pub async fn switch_project(&self, project: &str) -> Result<()> {
        self.runner
            .run(&["config", "switch-project", project])
            .await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.runner.run_allow_stderr(&["config", "logout"]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_show() {
        let text = "\
User Configuration:
  User Name          alice
  Current Cluster    default
  Current Org        e2e-org-1a2b
  Current Project    e2e-proj-9z8y
  API URL            https://api.apolo.us/api/v1
  Docker Registry URL https://registry.apolo.us
";
        let config = CliConfig::parse(text).unwrap();
        assert_eq!(config.user, "alice");
        assert_eq!(config.organization, "e2e-org-1a2b");
        assert_eq!(config.project, "e2e-proj-9z8y");
        assert_eq!(config.api_url, "https://api.apolo.us/api/v1");
    }

    #[test]
    fn missing_user_is_a_parse_error() {
        assert!(CliConfig::parse("Current Org  x\n").is_err());
    }
}
