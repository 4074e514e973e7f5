use super::runner::CliRunner;
use super::table::{parse_fixed_width, Row};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgUser {
    pub org: String,
    pub user: String,
    pub role: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub org: String,
    pub default_role: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterUser {
    pub name: String,
    pub role: String,
}

fn cell(row: &Row, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

/// Rows of `admin get-orgs`: organization names only
pub fn parse_orgs(text: &str) -> Result<Vec<String>> {
    Ok(parse_fixed_width(text, &["Name"])?
        .iter()
        .map(|row| cell(row, "Name"))
        .filter(|name| !name.is_empty())
        .collect())
}

pub fn parse_org_users(text: &str) -> Result<Vec<OrgUser>> {
    Ok(parse_fixed_width(text, &["Org name", "User name", "Role", "Email"])?
        .iter()
        .map(|row| OrgUser {
            org: cell(row, "Org name"),
            user: cell(row, "User name"),
            role: cell(row, "Role"),
            email: cell(row, "Email"),
        })
        .collect())
}

pub fn parse_projects(text: &str) -> Result<Vec<ProjectEntry>> {
    Ok(parse_fixed_width(text, &["Name", "Org name", "Default role", "Is default"])?
        .iter()
        .map(|row| ProjectEntry {
            name: cell(row, "Name"),
            org: cell(row, "Org name"),
            default_role: cell(row, "Default role"),
            is_default: cell(row, "Is default").eq_ignore_ascii_case("true"),
        })
        .collect())
}

pub fn parse_cluster_users(text: &str) -> Result<Vec<ClusterUser>> {
    Ok(parse_fixed_width(text, &["Name", "Role"])?
        .iter()
        .map(|row| ClusterUser {
            name: cell(row, "Name"),
            role: cell(row, "Role"),
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct AdminCli {
    runner: CliRunner,
}

impl AdminCli {
    pub fn new(runner: CliRunner) -> Self {
        Self { runner }
    }

    pub async fn get_orgs(&self) -> Result<Vec<String>> {
        let out = self.runner.run(&["admin", "get-orgs"]).await?;
        parse_orgs(&out.stdout)
    }

    pub async fn add_org(&self, org: &str) -> Result<()> {
        self.runner.run(&["admin", "add-org", org]).await?;
        Ok(())
    }

    pub async fn remove_org(&self, org: &str) -> Result<()> {
        self.runner
            .run(&["admin", "remove-org", "--force", org])
            .await?;
        Ok(())
    }

    pub async fn get_org_users(&self, org: &str) -> Result<Vec<OrgUser>> {
        let out = self.runner.run(&["admin", "get-org-users", org]).await?;
        parse_org_users(&out.stdout)
    }

    pub async fn add_org_user(&self, org: &str, user: &str, role: &str) -> Result<()> {
        self.runner
            .run(&["admin", "add-org-user", org, user, role])
            .await?;
        Ok(())
    }

    pub async fn remove_org_user(&self, org: &str, user: &str) -> Result<()> {
        self.runner
            .run(&["admin", "remove-org-user", org, user])
            .await?;
        Ok(())
    }

    pub async fn get_cluster_users(&self, cluster: &str) -> Result<Vec<ClusterUser>> {
        let out = self
            .runner
            .run(&["admin", "get-cluster-users", cluster])
            .await?;
        parse_cluster_users(&out.stdout)
    }

    pub async fn add_cluster_user(&self, cluster: &str, user: &str, role: &str) -> Result<()> {
        self.runner
            .run(&["admin", "add-cluster-user", cluster, user, role])
            .await?;
        Ok(())
    }

    pub async fn get_projects(&self, cluster: &str, org: &str) -> Result<Vec<ProjectEntry>> {
        let out = self
            .runner
            .run(&["admin", "get-projects", cluster, "--org", org])
            .await?;
        parse_projects(&out.stdout)
    }

    pub async fn add_project(&self, cluster: &str, org: &str, project: &str) -> Result<()> {
        self.runner
            .run(&["admin", "add-project", cluster, project, "--org", org])
            .await?;
        Ok(())
    }

    pub async fn remove_project(&self, cluster: &str, org: &str, project: &str) -> Result<()> {
        self.runner
            .run(&["admin", "remove-project", "--force", cluster, project, "--org", org])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_org_users() {
        let text = "\
Org name          User name     Role      Email
e2e-org-1a2b      alice         admin     alice@example.com
e2e-org-1a2b      e2ebob        user      e2ebob@example.com
";
        let users = parse_org_users(text).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].user, "e2ebob");
        assert_eq!(users[1].role, "user");
        assert_eq!(users[0].email, "alice@example.com");
    }

    #[test]
    fn parses_projects_with_default_flag() {
        let text = "\
Name              Cluster name    Org name        Default role    Is default
e2e-proj-9z8y     default         e2e-org-1a2b    writer          True
scratch           default         e2e-org-1a2b    reader          False
";
        let projects = parse_projects(text).unwrap();
        assert_eq!(projects.len(), 2);
        assert!(projects[0].is_default);
        assert_eq!(projects[0].default_role, "writer");
        assert!(!projects[1].is_default);
        assert_eq!(projects[1].org, "e2e-org-1a2b");
    }

    #[test]
    fn parses_cluster_users_with_extra_columns() {
        let text = "\
Name              Role      Email                 Credits
alice             admin     alice@example.com     unlimited
e2ebob            user      e2ebob@example.com    100.00
";
        let users = parse_cluster_users(text).unwrap();
        assert_eq!(
            users,
            vec![
                ClusterUser { name: "alice".into(), role: "admin".into() },
                ClusterUser { name: "e2ebob".into(), role: "user".into() },
            ]
        );
    }

    #[test]
    fn parses_org_names() {
        let text = "Name\n--------\ne2e-org-1\ndefault\n";
        assert_eq!(parse_orgs(text).unwrap(), vec!["e2e-org-1", "default"]);
    }
}
