use super::runner::CliRunner;
use super::table::{parse_box_table, parse_key_value, parse_key_value_strict, Row};
use crate::data::DiskData;
use crate::error::{ensure_eq, E2eError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// One disk as printed by `disk create`, `disk get` or `disk ls`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskInfo {
    pub id: String,
    pub name: String,
    pub storage: String,
    pub uri: String,
    pub status: String,
    pub owner: Option<String>,
}

fn disk_uri_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^disk://(?P<cluster>[^/]+)/(?P<org>[^/]+)/(?P<project>[^/]+)/(?P<id>disk-[0-9a-z-]+)$")
            .expect("valid disk uri regex")
    })
}

/// Size in bytes for strings like "1G", "1.0G", "500M", "2Gi".
pub fn storage_bytes(size: &str) -> Option<u64> {
    let size = size.trim();
    let split = size
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(size.len());
    let (number, unit) = size.split_at(split);
    let number: f64 = number.parse().ok()?;
    let factor: f64 = match unit.trim().trim_end_matches(['i', 'B']) {
        "" => 1.0,
        "K" | "k" => 1024.0,
        "M" => 1024.0 * 1024.0,
        "G" => 1024.0 * 1024.0 * 1024.0,
        "T" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };
    Some((number * factor).round() as u64)
}

impl DiskInfo {
    fn from_row(row: &Row) -> Self {
        let get = |k: &str| row.get(k).cloned().unwrap_or_default();
        Self {
            id: get("Id"),
            name: get("Name"),
            storage: get("Storage"),
            uri: get("Uri"),
            status: get("Status"),
            owner: row.get("Owner").cloned().filter(|o| !o.is_empty()),
        }
    }

    /// Parse the vertical block printed by `disk create` and `disk get`.
    pub fn parse_details(text: &str) -> Result<Self> {
        let mut row = parse_key_value_strict(text, &["Id", "Storage", "Uri", "Status"])?;
        row.extend(parse_key_value(text, &["Name", "Owner"]));
        Ok(Self::from_row(&row))
    }

    /// `(org, project)` encoded in the URI.
    pub fn org_and_project(&self) -> Result<(String, String)> {
        let caps = disk_uri_re()
            .captures(&self.uri)
            .ok_or_else(|| E2eError::Parse(format!("not a disk URI: {:?}", self.uri)))?;
        Ok((caps["org"].to_string(), caps["project"].to_string()))
    }

    /// Compare against what the scenario created.
    pub fn check_against(&self, expected: &DiskData) -> Result<()> {
        ensure_eq("disk name", expected.name.as_str(), self.name.as_str())?;
        ensure_eq(
            "disk storage",
            storage_bytes(&expected.storage),
            storage_bytes(&self.storage),
        )?;
        let (org, project) = self.org_and_project()?;
        ensure_eq("disk organization", expected.organization.as_str(), org.as_str())?;
        ensure_eq("disk project", expected.project.as_str(), project.as_str())?;
        if let Some(owner) = &self.owner {
            ensure_eq("disk owner", expected.owner.as_str(), owner.as_str())?;
        }
        if let Some(id) = &expected.id {
            ensure_eq("disk id", id.as_str(), self.id.as_str())?;
        }
        if let Some(uri) = &expected.uri {
            ensure_eq("disk uri", uri.as_str(), self.uri.as_str())?;
        }
        Ok(())
    }
}

pub fn parse_disk_list(text: &str) -> Result<Vec<DiskInfo>> {
    // An empty listing prints no table at all
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(parse_box_table(text, &["Id", "Name", "Storage", "Uri", "Status"])?
        .iter()
        .map(DiskInfo::from_row)
        .collect())
}

#[derive(Debug, Clone)]
pub struct DiskCli {
    runner: CliRunner,
}

impl DiskCli {
    pub fn new(runner: CliRunner) -> Self {
        Self { runner }
    }

    /// Create the disk described by `disk` and record its id and URI.
    pub async fn create(&self, disk: &mut DiskData) -> Result<DiskInfo> {
        let out = self
            .runner
            .run(&["disk", "create", &disk.storage, "--name", &disk.name])
            .await?;
        let info = DiskInfo::parse_details(&out.stdout)?;
        disk.record_created(&info.id, &info.uri)?;
        log::info!("Created disk {} ({})", disk.name, info.id);
        Ok(info)
    }

    pub async fn get(&self, disk: &str) -> Result<DiskInfo> {
        let out = self.runner.run(&["disk", "get", "--full-uri", disk]).await?;
        DiskInfo::parse_details(&out.stdout)
    }

    pub async fn ls(&self) -> Result<Vec<DiskInfo>> {
        let out = self.runner.run(&["disk", "ls", "--full-uri"]).await?;
        parse_disk_list(&out.stdout)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<DiskInfo>> {
        Ok(self.ls().await?.into_iter().find(|d| d.name == name))
    }

    pub async fn rm(&self, disk: &str) -> Result<()> {
        self.runner.run(&["disk", "rm", disk]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED: &str = "\
Id               disk-4f1c0e5a-9b7d
Name             e2e-disk-ab12
Storage          1.0G
Uri              disk://default/e2e-org/e2e-proj/disk-4f1c0e5a-9b7d
Status           Pending
Created at       Oct 16 2026
";

    #[test]
    fn storage_sizes_normalize() {
        assert_eq!(storage_bytes("1G"), storage_bytes("1.0G"));
        assert_eq!(storage_bytes("1Gi"), Some(1 << 30));
        assert_eq!(storage_bytes("500M"), Some(500 << 20));
        assert_eq!(storage_bytes("10 GB"), Some(10 << 30));
        assert_eq!(storage_bytes("lots"), None);
    }

    #[test]
    fn created_disk_matches_expected_record() {
        let info = DiskInfo::parse_details(CREATED).unwrap();
        assert_eq!(info.id, "disk-4f1c0e5a-9b7d");
        assert_eq!(info.owner, None);

        let mut disk = DiskData::generate("alice", "e2e-org", "e2e-proj", "1G");
        disk.name = "e2e-disk-ab12".to_string();
        disk.record_created(&info.id, &info.uri).unwrap();
        info.check_against(&disk).unwrap();
    }

    #[test]
    fn wrong_project_is_reported() {
        let info = DiskInfo::parse_details(CREATED).unwrap();
        let mut disk = DiskData::generate("alice", "e2e-org", "other-proj", "1G");
        disk.name = "e2e-disk-ab12".to_string();
        let err = info.check_against(&disk).unwrap_err().to_string();
        assert!(err.contains("disk project"));
    }

    #[test]
    fn details_require_core_keys() {
        assert!(DiskInfo::parse_details("Name  x\n").is_err());
    }

    #[test]
    fn lists_disks_from_box_table() {
        let text = "\
┏━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━━┳━━━━━━━━━┳━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━┓
┃ Id                 ┃ Name          ┃ Storage ┃ Uri                                                  ┃ Status ┃
┡━━━━━━━━━━━━━━━━━━━━╇━━━━━━━━━━━━━━━╇━━━━━━━━━╇━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╇━━━━━━━━┩
│ disk-4f1c0e5a-9b7d │ e2e-disk-ab12 │ 1.0G    │ disk://default/e2e-org/e2e-proj/disk-4f1c0e5a-9b7d   │ Ready  │
└────────────────────┴───────────────┴─────────┴──────────────────────────────────────────────────────┴────────┘
";
        let disks = parse_disk_list(text).unwrap();
        assert_eq!(disks.len(), 1);
        assert_eq!(disks[0].status, "Ready");
        assert_eq!(
            disks[0].org_and_project().unwrap(),
            ("e2e-org".to_string(), "e2e-proj".to_string())
        );
    }

    #[test]
    fn empty_listing_has_no_disks() {
        assert!(parse_disk_list("").unwrap().is_empty());
        assert!(parse_disk_list("\n  \n").unwrap().is_empty());
    }
}
