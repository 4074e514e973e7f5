use super::apps::{AppInstallPage, AppsPage, InstalledAppPage};
use super::auth::{AuthPage, LoginPage, SignupPage, TermsPage};
use super::disks::{CreateDiskPopup, DisksPage};
use super::files::FilesPage;
use super::onboarding::{CreateOrganizationPage, JoinOrganizationPage, WelcomePage};
use super::organization::{InviteMemberPopup, OrganizationSettingsPage};
use super::projects::{CreateProjectPage, CreateProjectPopup};
use super::secrets::{CreateSecretPopup, SecretsPage};
use super::top_bar::TopBar;
use super::PageContext;
use crate::config::E2eConfig;
use chromiumoxide::page::Page;

/// Every page object of one browser session
#[derive(Clone)]
pub struct PageManager {
    ctx: PageContext,
    pub auth: AuthPage,
    pub login: LoginPage,
    pub signup: SignupPage,
    pub terms: TermsPage,
    pub welcome: WelcomePage,
    pub create_organization: CreateOrganizationPage,
    pub join_organization: JoinOrganizationPage,
    pub create_project: CreateProjectPage,
    pub create_project_popup: CreateProjectPopup,
    pub top_bar: TopBar,
    pub organization_settings: OrganizationSettingsPage,
    pub invite_member: InviteMemberPopup,
    pub apps: AppsPage,
    pub app_install: AppInstallPage,
    pub installed_app: InstalledAppPage,
    pub files: FilesPage,
    pub disks: DisksPage,
    pub create_disk: CreateDiskPopup,
    pub secrets: SecretsPage,
    pub create_secret: CreateSecretPopup,
}

impl PageManager {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            auth: AuthPage::new(ctx.clone()),
            login: LoginPage::new(ctx.clone()),
            signup: SignupPage::new(ctx.clone()),
            terms: TermsPage::new(ctx.clone()),
            welcome: WelcomePage::new(ctx.clone()),
            create_organization: CreateOrganizationPage::new(ctx.clone()),
            join_organization: JoinOrganizationPage::new(ctx.clone()),
            create_project: CreateProjectPage::new(ctx.clone()),
            create_project_popup: CreateProjectPopup::new(ctx.clone()),
            top_bar: TopBar::new(ctx.clone()),
            organization_settings: OrganizationSettingsPage::new(ctx.clone()),
            invite_member: InviteMemberPopup::new(ctx.clone()),
            apps: AppsPage::new(ctx.clone()),
            app_install: AppInstallPage::new(ctx.clone()),
            installed_app: InstalledAppPage::new(ctx.clone()),
            files: FilesPage::new(ctx.clone()),
            disks: DisksPage::new(ctx.clone()),
            create_disk: CreateDiskPopup::new(ctx.clone()),
            secrets: SecretsPage::new(ctx.clone()),
            create_secret: CreateSecretPopup::new(ctx.clone()),
            ctx,
        }
    }

    pub fn from_config(page: Page, config: &E2eConfig) -> Self {
        Self::new(PageContext::from_config(page, config))
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }
}
