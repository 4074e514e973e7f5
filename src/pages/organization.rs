//! Organization settings and member invitations

use super::{PageContext, PageObject};
use crate::browser::element::{Element, Selector};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgRole {
    User,
    Manager,
    Admin,
}

impl OrgRole {
    pub fn label(&self) -> &'static str {
        match self {
            OrgRole::User => "User",
            OrgRole::Manager => "Manager",
            OrgRole::Admin => "Admin",
        }
    }

    /// Role name as printed by the admin CLI
    pub fn cli_name(&self) -> &'static str {
        match self {
            OrgRole::User => "user",
            OrgRole::Manager => "manager",
            OrgRole::Admin => "admin",
        }
    }
}

#[derive(Clone)]
pub struct OrganizationSettingsPage {
    ctx: PageContext,
}

impl OrganizationSettingsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn title(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("h1, h2", "Organization settings"),
            "organization settings title",
        )
    }

    pub fn members_tab(&self) -> Element {
        self.ctx.el(Selector::text("[role=\"tab\"]", "Members"), "members tab")
    }

    pub fn invite_button(&self) -> Element {
        self.ctx.button("Invite member")
    }

    pub fn member_row(&self, email: &str) -> Element {
        self.ctx.el(
            Selector::contains_text("tbody tr", email),
            format!("member row {:?}", email),
        )
    }

    pub fn member_role(&self, email: &str) -> Element {
        self.member_row(email)
            .child("td:nth-child(3)", format!("role of {}", email))
    }

    pub async fn open_members(&self) -> Result<()> {
        self.members_tab().click().await
    }

    pub async fn open_invite_popup(&self) -> Result<()> {
        self.invite_button().click().await
    }

    pub async fn has_member(&self, email: &str) -> Result<bool> {
        self.member_row(email).is_visible().await
    }
}

impl PageObject for OrganizationSettingsPage {
    fn name(&self) -> &'static str {
        "organization settings"
    }

    fn root(&self) -> Element {
        self.title()
    }
}

#[derive(Clone)]
pub struct InviteMemberPopup {
    ctx: PageContext,
}

impl InviteMemberPopup {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn dialog(&self) -> Element {
        self.ctx.el(
            Selector::contains_text("[role=\"dialog\"]", "Invite"),
            "invite member popup",
        )
    }

    pub fn email_input(&self) -> Element {
        self.ctx.input("email")
    }

    pub fn role_select(&self) -> Element {
        self.ctx.el(Selector::css("select[name=\"role\"]"), "member role select")
    }

    pub fn send_button(&self) -> Element {
        self.dialog().child("button[type=\"submit\"]", "send invite button")
    }

    pub async fn invite(&self, email: &str, role: OrgRole) -> Result<()> {
        self.email_input().fill(email).await?;
        self.role_select().select_option(role.label()).await?;
        self.send_button().click().await?;
        self.wait_closed().await
    }
}

impl PageObject for InviteMemberPopup {
    fn name(&self) -> &'static str {
        "invite member popup"
    }

    fn root(&self) -> Element {
        self.dialog()
    }
}
