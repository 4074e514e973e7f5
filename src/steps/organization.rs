use crate::cli::Cli;
use crate::data::{OrganizationData, UserData};
use crate::error::{ensure, ensure_eq, E2eError, Result};
use crate::pages::manager::PageManager;
use crate::pages::organization::OrgRole;
use crate::pages::PageObject;

#[derive(Clone)]
pub struct OrganizationSteps {
    pages: PageManager,
    cli: Cli,
}

impl OrganizationSteps {
    pub fn new(pages: PageManager, cli: Cli) -> Self {
        Self { pages, cli }
    }

    /// Onboarding: from the welcome screen through organization creation.
    pub async fn ui_create_first_organization(&self, org: &OrganizationData) -> Result<()> {
        log::info!("[step] Create first organization {}", org.name);
        self.pages.welcome.wait_loaded().await?;
        self.pages.welcome.click_lets_do_it().await?;
        self.pages.create_organization.wait_loaded().await?;
        self.pages.create_organization.create(&org.name).await
    }

    /// Enter an invalid name and check the form refuses it.
    pub async fn ui_verify_organization_name_rejected(&self, name: &str) -> Result<()> {
        log::info!("[step] Verify organization name {:?} is rejected", name);
        let page = &self.pages.create_organization;
        page.enter_name(name).await?;
        page.validation_error().wait_visible().await?;
        ensure(
            !page.next_button().is_enabled().await?,
            format!("next button is enabled for invalid name {:?}", name),
        )
    }

    pub async fn ui_join_organization(&self, org: &str) -> Result<()> {
        log::info!("[step] Join organization {}", org);
        self.pages.join_organization.wait_loaded().await?;
        self.pages.join_organization.join(org).await
    }

    pub async fn ui_verify_current_organization(&self, org: &str) -> Result<()> {
        log::info!("[step] Verify current organization is {}", org);
        let actual = self.pages.top_bar.current_organization().await?;
        ensure_eq("current organization", org, actual.trim())
    }

    pub async fn ui_switch_organization(&self, org: &str) -> Result<()> {
        log::info!("[step] Switch to organization {}", org);
        self.pages.top_bar.switch_organization(org).await
    }

    pub async fn ui_invite_member(&self, user: &UserData, role: OrgRole) -> Result<()> {
        log::info!("[step] Invite {} as {}", user.email, role.label());
        let settings = &self.pages.organization_settings;
        self.pages.top_bar.go_to("Settings").await?;
        settings.wait_loaded().await?;
        settings.open_members().await?;
        settings.open_invite_popup().await?;
        self.pages.invite_member.wait_loaded().await?;
        self.pages.invite_member.invite(&user.email, role).await
    }

    pub async fn ui_verify_member(&self, user: &UserData, role: OrgRole) -> Result<()> {
        log::info!("[step] Verify member {} has role {}", user.email, role.label());
        let settings = &self.pages.organization_settings;
        ensure(
            settings.has_member(&user.email).await?,
            format!("{} is not in the members list", user.email),
        )?;
        let actual = settings.member_role(&user.email).text().await?;
        ensure_eq("member role", role.label(), actual.trim())
    }

    pub async fn cli_create_organization(&self, org: &OrganizationData) -> Result<()> {
        log::info!("[step] CLI: create organization {}", org.name);
        self.cli.admin.add_org(&org.name).await
    }

    pub async fn cli_verify_organization_exists(&self, org: &OrganizationData) -> Result<()> {
        log::info!("[step] CLI: verify organization {} exists", org.name);
        let orgs = self.cli.admin.get_orgs().await?;
        ensure(
            orgs.iter().any(|o| o == &org.name),
            format!("organization {} not in {:?}", org.name, orgs),
        )
    }

    pub async fn cli_add_member(&self, org: &str, user: &UserData, role: OrgRole) -> Result<()> {
        log::info!("[step] CLI: add {} to {} as {}", user.username, org, role.cli_name());
        self.cli
            .admin
            .add_org_user(org, &user.username, role.cli_name())
            .await
    }

    pub async fn cli_verify_member(&self, org: &str, user: &UserData, role: OrgRole) -> Result<()> {
        log::info!("[step] CLI: verify {} is {} in {}", user.username, role.cli_name(), org);
        let users = self.cli.admin.get_org_users(org).await?;
        let member = users
            .iter()
            .find(|u| u.user == user.username)
            .ok_or_else(|| {
                E2eError::Assertion(format!("{} is not a member of {}", user.username, org))
            })?;
        ensure_eq("organization role", role.cli_name(), member.role.as_str())
    }

    /// Best-effort cleanup; failures are logged, not returned.
    pub async fn cli_remove_organization(&self, org: &str) {
        log::info!("[step] CLI: remove organization {}", org);
        if let Err(e) = self.cli.admin.remove_org(org).await {
            log::warn!("Failed to remove organization {}: {}", org, e);
        }
    }
}
