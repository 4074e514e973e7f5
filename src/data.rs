//! Test data records and generators
//!
//! Records are created with random unique names when a scenario sets up its
//! data, filled in once the matching creation call returns, and compared
//! against what the console or the CLI reports later.

use crate::error::{E2eError, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Lowercase alphanumeric string of `len` characters.
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

/// `prefix-xxxxxxxx`, safe for org, project, disk and secret names.
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, random_suffix(8))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub email: String,
    pub password: String,
    /// Username the platform derives from the email
    pub username: String,
}

impl UserData {
    pub fn generate(email_domain: &str) -> Self {
        let username = format!("e2e{}", random_suffix(10));
        Self {
            email: format!("{}@{}", username, email_domain),
            password: generate_password(),
            username,
        }
    }

    pub fn existing(email: &str, password: &str) -> Self {
        let username = email.split('@').next().unwrap_or(email).to_string();
        Self {
            email: email.to_string(),
            password: password.to_string(),
            username,
        }
    }
}

/// Password that satisfies the identity provider's policy: upper, lower,
/// digit and symbol, 16 characters.
fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    let body: String = (&mut rng)
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("A{}z{}!", body, rng.gen_range(10..100))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationData {
    pub name: String,
}

impl OrganizationData {
    pub fn generate() -> Self {
        Self {
            name: unique_name("e2e-org"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectData {
    pub name: String,
    pub organization: String,
    pub make_default: bool,
}

impl ProjectData {
    pub fn generate(organization: &str) -> Self {
        Self {
            name: unique_name("e2e-proj"),
            organization: organization.to_string(),
            make_default: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretData {
    pub name: String,
    pub value: String,
}

impl SecretData {
    pub fn generate() -> Self {
        Self {
            // Secret keys may not contain dashes
            name: format!("e2e_secret_{}", random_suffix(8)),
            value: random_suffix(24),
        }
    }
}

/// A disk the scenario expects to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskData {
    pub name: String,
    pub owner: String,
    pub organization: String,
    pub project: String,
    /// Requested size as passed to the CLI, e.g. "1G"
    pub storage: String,
    pub id: Option<String>,
    pub uri: Option<String>,
}

impl DiskData {
    pub fn generate(owner: &str, organization: &str, project: &str, storage: &str) -> Self {
        Self {
            name: unique_name("e2e-disk"),
            owner: owner.to_string(),
            organization: organization.to_string(),
            project: project.to_string(),
            storage: storage.to_string(),
            id: None,
            uri: None,
        }
    }

    /// Record what the creation call assigned. Only allowed once.
    pub fn record_created(&mut self, id: &str, uri: &str) -> Result<()> {
        if let Some(existing) = &self.id {
            return Err(E2eError::Assertion(format!(
                "disk {} already recorded as {}",
                self.name, existing
            )));
        }
        self.id = Some(id.to_string());
        self.uri = Some(uri.to_string());
        Ok(())
    }

    pub fn id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| E2eError::Assertion(format!("disk {} has not been created", self.name)))
    }

    pub fn uri(&self) -> Result<&str> {
        self.uri
            .as_deref()
            .ok_or_else(|| E2eError::Assertion(format!("disk {} has not been created", self.name)))
    }
}

/// A local file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub name: String,
    pub content: Vec<u8>,
    pub path: Option<PathBuf>,
}

impl FileData {
    pub fn generate(extension: &str, size: usize) -> Self {
        let content: Vec<u8> = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(size)
            .collect();
        Self {
            name: format!("e2e-file-{}.{}", random_suffix(8), extension),
            content,
            path: None,
        }
    }

    /// Write the file into `dir` and remember where it went.
    pub fn write_to(&mut self, dir: &Path) -> Result<&Path> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.name);
        std::fs::write(&path, &self.content)?;
        Ok(self.path.insert(path).as_path())
    }

    /// Hex SHA-256 of the content, for comparing against a download.
    pub fn sha256_hex(&self) -> String {
        sha256_hex(&self.content)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_lowercase() {
        let a = unique_name("e2e-disk");
        let b = unique_name("e2e-disk");
        assert_ne!(a, b);
        assert!(a.starts_with("e2e-disk-"));
        assert_eq!(a.len(), "e2e-disk-".len() + 8);
        assert!(a.chars().all(|c| !c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_password_has_every_class() {
        let user = UserData::generate("example.com");
        assert!(user.email.ends_with("@example.com"));
        assert!(user.email.starts_with(&user.username));
        let p = &user.password;
        assert_eq!(p.len(), 16);
        assert!(p.chars().any(|c| c.is_ascii_uppercase()));
        assert!(p.chars().any(|c| c.is_ascii_lowercase()));
        assert!(p.chars().any(|c| c.is_ascii_digit()));
        assert!(p.ends_with('!'));
    }

    #[test]
    fn existing_user_derives_username() {
        let user = UserData::existing("qa-bot@apolo.us", "secret");
        assert_eq!(user.username, "qa-bot");
    }

    #[test]
    fn disk_is_recorded_once() {
        let mut disk = DiskData::generate("alice", "org", "proj", "1G");
        assert!(disk.id().is_err());
        disk.record_created("disk-123", "disk://default/org/proj/disk-123")
            .unwrap();
        assert_eq!(disk.id().unwrap(), "disk-123");
        assert!(disk.record_created("disk-456", "disk://x").is_err());
        assert_eq!(disk.uri().unwrap(), "disk://default/org/proj/disk-123");
    }

    #[test]
    fn secret_names_have_no_dashes() {
        assert!(!SecretData::generate().name.contains('-'));
    }

    #[test]
    fn file_is_written_to_dir() {
        let dir = std::env::temp_dir().join(format!("apolo-e2e-data-{}", random_suffix(6)));
        let mut file = FileData::generate("txt", 64);
        let path = file.write_to(&dir).unwrap().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap().len(), 64);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn digest_is_hex_sha256() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let file = FileData::generate("txt", 8);
        assert_eq!(file.sha256_hex(), sha256_hex(&file.content));
    }
}
