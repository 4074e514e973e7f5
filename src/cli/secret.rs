use super::runner::CliRunner;
use super::table::parse_box_table;
use crate::error::Result;

pub fn parse_secret_list(text: &str) -> Result<Vec<String>> {
    // An empty listing prints no table at all
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(parse_box_table(text, &["Key"])?
        .into_iter()
        .filter_map(|mut row| row.remove("Key"))
        .filter(|key| !key.is_empty())
        .collect())
}

#[derive(Debug, Clone)]
pub struct SecretCli {
    runner: CliRunner,
}

impl SecretCli {
    pub fn new(runner: CliRunner) -> Self {
        Self { runner }
    }

    pub async fn add(&self, key: &str, value: &str) -> Result<()> {
        self.runner.run(&["secret", "add", key, value]).await?;
        Ok(())
    }

    pub async fn ls(&self) -> Result<Vec<String>> {
        let out = self.runner.run(&["secret", "ls"]).await?;
        parse_secret_list(&out.stdout)
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.ls().await?.iter().any(|k| k == key))
    }

    pub async fn rm(&self, key: &str) -> Result<()> {
        self.runner.run(&["secret", "rm", key]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_secret_keys() {
        let text = "\
┏━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━┓
┃ Key              ┃ Owner        ┃
┡━━━━━━━━━━━━━━━━━━╇━━━━━━━━━━━━━━┩
│ e2esecretq1w2e3  │ alice        │
│ registry_token   │ alice        │
└──────────────────┴──────────────┘
";
        assert_eq!(
            parse_secret_list(text).unwrap(),
            vec!["e2esecretq1w2e3", "registry_token"]
        );
    }

    #[test]
    fn empty_output_means_no_secrets() {
        assert!(parse_secret_list("\n").unwrap().is_empty());
    }
}
