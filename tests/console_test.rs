//! Step flows against the fake web console
//!
//! The fixture console keeps its state in the page, and the CLI side is
//! served by the fake CLI script, so these tests need a local Chrome but
//! no platform deployment.

mod fake_cli;

use apolo_e2e::data::{DiskData, SecretData, UserData};
use apolo_e2e::pages::PageObject;
use apolo_e2e::{ChromeDriver, ConnectionMode, E2eConfig, E2eError, PageManager, StepsManager};
use fake_cli::FakeCli;
use serde_json::json;
use tempfile::TempDir;
use test_server::TestServer;

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "correct-horse-1!";

struct Console {
    _server: TestServer,
    _downloads: TempDir,
    fake: FakeCli,
    driver: ChromeDriver,
    pages: PageManager,
    steps: StepsManager,
}

impl Console {
    async fn open() -> anyhow::Result<Self> {
        let server = TestServer::start().await;
        server.wait_ready().await?;
        let downloads = tempfile::tempdir()?;

        let config = E2eConfig {
            base_url: server.url(),
            timeout_ms: 3000,
            poll_interval_ms: 50,
            download_dir: downloads.path().to_path_buf(),
            ..Default::default()
        };

        let driver = ChromeDriver::new(ConnectionMode::Sandboxed {
            chrome_path: None,
            no_sandbox: true,
            headless: true,
        })
        .await?;
        driver.set_download_dir(&config.download_dir).await?;

        let fake = FakeCli::new()?;
        let pages = PageManager::from_config(driver.current_page().await?, &config);
        let steps = StepsManager::new(pages.clone(), fake.cli(), &config);
        steps.auth.ui_open_console().await?;

        Ok(Self {
            _server: server,
            _downloads: downloads,
            fake,
            driver,
            pages,
            steps,
        })
    }

    async fn logged_in() -> anyhow::Result<Self> {
        let console = Self::open().await?;
        console
            .steps
            .auth
            .ui_log_in(&UserData::existing(EMAIL, PASSWORD))
            .await?;
        console.steps.auth.ui_verify_logged_in().await?;
        Ok(console)
    }
}

#[tokio::test]
async fn test_log_in_and_out() -> anyhow::Result<()> {
    let console = Console::logged_in().await?;

    assert_eq!(console.pages.top_bar.current_organization().await?, "e2e-org");
    assert_eq!(console.pages.top_bar.current_project().await?, "e2e-proj");

    console.steps.auth.ui_log_out().await?;
    assert!(console.pages.auth.is_loaded().await?);

    console.driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_wrong_password_shows_error() -> anyhow::Result<()> {
    let console = Console::open().await?;

    console
        .steps
        .auth
        .ui_log_in(&UserData::existing(EMAIL, "not-the-password"))
        .await?;
    console
        .steps
        .auth
        .ui_verify_login_error("Wrong email or password")
        .await?;

    let err = console
        .steps
        .auth
        .ui_verify_login_error("Account locked")
        .await
        .unwrap_err();
    assert!(matches!(err, E2eError::Assertion(_)), "got {err}");
    assert!(!console.pages.top_bar.is_loaded().await?);

    console.driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_disk_lifecycle() -> anyhow::Result<()> {
    let console = Console::logged_in().await?;
    let disks = &console.steps.disks;

    disks.ui_open_disks().await?;
    let mut disk = DiskData::generate("alice", "e2e-org", "e2e-proj", "1G");
    disks.ui_create_disk(&mut disk, None).await?;

    let id = disk.id()?.to_string();
    assert!(id.starts_with("disk-"), "unexpected id {id}");
    assert_eq!(
        disk.uri()?,
        format!("disk://default/e2e-org/e2e-proj/{}", id)
    );

    let details = disks.ui_verify_disk_details(&disk).await?;
    assert_eq!(details.storage, "1 GB");
    assert_eq!(details.status, "Ready");

    // The backend learns about the disk the console created
    console.fake.seed_disk(&id, &disk.name, "1G")?;
    disks.verify_ui_matches_cli(&disk).await?;
    disks.cli_verify_disk(&disk).await?;

    let other = DiskData::generate("alice", "e2e-org", "e2e-proj", "1G");
    disks.ui_verify_disk_listed(&other, false).await?;
    disks.ui_verify_disk_listed(&disk, true).await?;

    disks.ui_delete_disk(&disk).await?;
    disks.ui_verify_disk_listed(&disk, false).await?;

    console.driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_secret_lifecycle() -> anyhow::Result<()> {
    let console = Console::logged_in().await?;
    let secrets = &console.steps.secrets;

    secrets.ui_open_secrets().await?;
    let existing = SecretData {
        name: "registry_token".to_string(),
        value: String::new(),
    };
    secrets.ui_verify_secret_listed(&existing, true).await?;

    let secret = SecretData::generate();
    secrets.ui_verify_secret_listed(&secret, false).await?;
    secrets.ui_create_secret(&secret).await?;
    secrets.ui_verify_secret_listed(&secret, true).await?;

    secrets.ui_delete_secret(&secret).await?;
    secrets.ui_verify_secret_listed(&secret, false).await?;
    secrets.ui_verify_secret_listed(&existing, true).await?;

    console.driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_installed_app_output_and_export() -> anyhow::Result<()> {
    let console = Console::logged_in().await?;
    let apps = &console.steps.apps;

    console.pages.top_bar.go_to("Apps").await?;
    console.pages.installed_app.wait_loaded().await?;
    apps.ui_wait_app_status("Healthy").await?;

    let output = console.pages.installed_app.read_output().await?;
    assert_eq!(
        serde_json::Value::Object(output),
        json!({
            "Status": "Healthy",
            "Ingress": {
                "URL": "https://jupyter.example.org",
                "Auth": { "Enabled": "true" }
            },
            "Port": "8080",
            "Port (2)": "9090",
            "Volumes": {}
        })
    );
    apps.ui_verify_output("Ingress.URL", "https://jupyter.example.org")
        .await?;
    apps.ui_verify_output("Ingress.Auth.Enabled", "true").await?;
    assert!(apps.ui_verify_output("Port", "443").await.is_err());

    let export = apps.ui_export_config("jupyter-e2e").await?;
    assert_eq!(export.template_name, "jupyter");
    assert_eq!(export.display_name.as_deref(), Some("jupyter-e2e"));
    export.expect_field("template_version", "v1.2.0")?;
    export.expect_field("input.preset.name", "cpu-small")?;
    export.expect_field("input.ingress.enabled", true)?;

    console.driver.close().await?;
    Ok(())
}
