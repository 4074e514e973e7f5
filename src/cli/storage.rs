use super::runner::CliRunner;
use crate::error::Result;
use std::path::Path;

/// `storage:` URI relative to the current project.
pub fn storage_uri(path: &str) -> String {
    format!("storage:{}", path.trim_start_matches('/'))
}

/// Fully qualified `storage://cluster/org/project/path` URI.
pub fn full_storage_uri(cluster: &str, org: &str, project: &str, path: &str) -> String {
    format!(
        "storage://{}/{}/{}/{}",
        cluster,
        org,
        project,
        path.trim_start_matches('/')
    )
}

/// Entry names from plain `storage ls` output, one per line.
pub fn parse_storage_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.trim_end_matches('/').to_string())
        .collect()
}

#[derive(Debug, Clone)]
pub struct StorageCli {
    runner: CliRunner,
}

impl StorageCli {
    pub fn new(runner: CliRunner) -> Self {
        Self { runner }
    }

    pub async fn ls(&self, path: &str) -> Result<Vec<String>> {
        let out = self
            .runner
            .run(&["storage", "ls", &storage_uri(path)])
            .await?;
        Ok(parse_storage_list(&out.stdout))
    }

    pub async fn exists(&self, dir: &str, name: &str) -> Result<bool> {
        Ok(self.ls(dir).await?.iter().any(|n| n == name))
    }

    pub async fn mkdir(&self, path: &str) -> Result<()> {
        self.runner
            .run(&["storage", "mkdir", "-p", &storage_uri(path)])
            .await?;
        Ok(())
    }

    /// Upload a local file to `path`.
    pub async fn upload(&self, local: &Path, path: &str) -> Result<()> {
        let local = format!("file://{}", local.display());
        self.runner
            .run(&["storage", "cp", &local, &storage_uri(path)])
            .await?;
        Ok(())
    }

    /// Download `path` into a local file.
    pub async fn download(&self, path: &str, local: &Path) -> Result<()> {
        let local = format!("file://{}", local.display());
        self.runner
            .run(&["storage", "cp", &storage_uri(path), &local])
            .await?;
        Ok(())
    }

    pub async fn rm(&self, path: &str) -> Result<()> {
        self.runner
            .run(&["storage", "rm", "-r", &storage_uri(path)])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_storage_uris() {
        assert_eq!(storage_uri("/e2e/dir"), "storage:e2e/dir");
        assert_eq!(
            full_storage_uri("default", "org", "proj", "data/a.txt"),
            "storage://default/org/proj/data/a.txt"
        );
    }

    #[test]
    fn lists_entries_without_trailing_slash() {
        let names = parse_storage_list("e2e-folder-x1/\nfile-ab12.txt\n\n");
        assert_eq!(names, vec!["e2e-folder-x1", "file-ab12.txt"]);
    }
}
