//! Browser driver tests
//!
//! Uses local HTTP server for fast, reliable, network-independent testing.
//! Each test uses its own server on a random port for isolation.


use apolo_e2e::{ChromeDriver, ConnectionMode, E2eError};
use test_server::TestServer;

/// Helper to create a headless driver for testing
async fn create_headless_driver() -> anyhow::Result<ChromeDriver> {
    let _ = env_logger::builder().is_test(true).try_init();
    ChromeDriver::new(ConnectionMode::Sandboxed {
        chrome_path: None,
        no_sandbox: true, // Required for CI environments
        headless: true,
    })
    .await
    .map_err(|e| anyhow::anyhow!("Failed to launch Chrome: {}", e))
}

#[tokio::test]
async fn test_navigation_and_title() -> anyhow::Result<()> {
    let server = TestServer::start().await;
    server.wait_ready().await?;

    let driver = create_headless_driver().await?;
    driver.navigate(&server.url()).await?;

    assert_eq!(driver.title().await?, "Apolo Console");
    assert!(driver.current_url().await?.starts_with(&server.url()));
    assert!(driver.is_alive().await);

    driver.navigate(&format!("{}/widgets", server.url())).await?;
    assert_eq!(driver.title().await?, "Widgets");

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_execute_script() -> anyhow::Result<()> {
    let server = TestServer::start().await;
    server.wait_ready().await?;

    let driver = create_headless_driver().await?;
    driver.navigate(&format!("{}/widgets", server.url())).await?;

    let count = driver
        .execute_script("document.querySelectorAll('li.item').length")
        .await?;
    assert_eq!(count, serde_json::json!(3));

    let label: String = driver
        .execute_script_typed("document.getElementById('counter').textContent")
        .await?;
    assert_eq!(label, "Clicked 0");

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_failure_screenshot_is_written() -> anyhow::Result<()> {
    let server = TestServer::start().await;
    server.wait_ready().await?;
    let artifacts = tempfile::tempdir()?;

    let driver = create_headless_driver().await?;
    driver.navigate(&server.url()).await?;

    let png = driver.screenshot().await?;
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

    let path = driver
        .capture_failure(&artifacts.path().join("nested"), "Disk: create & delete")
        .await?;
    assert!(path.exists());
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    assert!(name.starts_with("disk--create---delete-"), "{name}");
    assert!(name.ends_with(".png"));

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_navigation_to_closed_port_fails() -> anyhow::Result<()> {
    let driver = create_headless_driver().await?;

    // Port 9 (discard) is never served in test environments
    let result = driver.navigate("http://127.0.0.1:9/").await;
    assert!(
        matches!(result, Err(E2eError::NavigationFailed(_))),
        "got {:?}",
        result
    );

    driver.close().await?;
    Ok(())
}
