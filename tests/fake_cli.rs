//! Stand-in platform CLI for tests
//!
//! `fixtures/fake_apolo.sh` keeps its backend state in a temporary
//! directory, so every test gets a clean organization with no disks,
//! secrets, files or jobs.

#![allow(dead_code)]

use apolo_e2e::{Cli, CliRunner};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCRIPT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/fake_apolo.sh");

pub struct FakeCli {
    state: TempDir,
}

impl FakeCli {
    pub fn new() -> anyhow::Result<Self> {
        let _ = env_logger::builder().is_test(true).try_init();
        Ok(Self {
            state: tempfile::tempdir()?,
        })
    }

    pub fn runner(&self) -> CliRunner {
        CliRunner::new("sh")
            .with_base_args([SCRIPT])
            .with_env("FAKE_APOLO_STATE", self.state.path().to_string_lossy())
    }

    pub fn cli(&self) -> Cli {
        Cli::new(self.runner())
    }

    pub fn state_dir(&self) -> &Path {
        self.state.path()
    }

    /// Register a disk directly in the backend state, e.g. one created
    /// through the web console.
    pub fn seed_disk(&self, id: &str, name: &str, storage: &str) -> anyhow::Result<PathBuf> {
        let dir = self.state.path().join("disks");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(id);
        std::fs::write(&path, format!("{} {}\n", name, storage))?;
        Ok(path)
    }
}
