//! Element wrapper against the widgets fixture page
//!
//! Uses a local HTTP server; every test launches its own headless Chrome.


use apolo_e2e::browser::element::{Element, Selector};
use apolo_e2e::{ChromeDriver, ConnectionMode, E2eError};
use std::time::{Duration, Instant};
use test_server::TestServer;

async fn widgets() -> anyhow::Result<(TestServer, ChromeDriver, chromiumoxide::page::Page)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = TestServer::start().await;
    server.wait_ready().await?;

    let driver = ChromeDriver::new(ConnectionMode::Sandboxed {
        chrome_path: None,
        no_sandbox: true,
        headless: true,
    })
    .await?;
    driver.navigate(&format!("{}/widgets", server.url())).await?;
    let page = driver.current_page().await?;
    Ok((server, driver, page))
}

fn el(page: &chromiumoxide::page::Page, selector: Selector) -> Element {
    Element::new(page.clone(), selector)
        .with_timeout(Duration::from_millis(2000))
        .with_poll_interval(Duration::from_millis(50))
}

#[tokio::test]
async fn test_visibility_rules() -> anyhow::Result<()> {
    let (_server, driver, page) = widgets().await?;

    assert!(el(&page, Selector::css("#counter")).is_visible().await?);
    assert!(!el(&page, Selector::css("#hidden-button")).is_visible().await?);
    assert!(!el(&page, Selector::css("#invisible-button")).is_visible().await?);
    assert!(!el(&page, Selector::css("#faded")).is_visible().await?);
    assert!(!el(&page, Selector::css("#does-not-exist")).is_visible().await?);
    assert!(el(&page, Selector::css("#hidden-button")).is_present().await?);
    assert!(!el(&page, Selector::css("#does-not-exist")).is_present().await?);

    let far = el(&page, Selector::css("#far-away"));
    assert!(far.is_visible().await?);
    assert!(!far.is_in_viewport().await?);
    far.scroll_into_view().await?;
    assert!(far.is_in_viewport().await?);

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_enabled_and_pointer_events() -> anyhow::Result<()> {
    let (_server, driver, page) = widgets().await?;

    assert!(!el(&page, Selector::css("#disabled-button")).is_enabled().await?);
    assert!(!el(&page, Selector::css("#aria-disabled")).is_enabled().await?);
    assert!(el(&page, Selector::css("#counter")).is_enabled().await?);

    let overlay = el(&page, Selector::css("#overlay-target"));
    assert!(!overlay.has_pointer_events().await?);
    assert!(!overlay.state().await?.is_clickable());

    let late = el(&page, Selector::css("#enable-later"));
    late.wait_enabled().await?;
    late.wait_clickable().await?;

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_wait_for_late_element_and_timeout() -> anyhow::Result<()> {
    let (_server, driver, page) = widgets().await?;

    let late = el(&page, Selector::css("#late"));
    late.wait_visible().await?;
    assert_eq!(late.text().await?, "Arrived");

    let never = el(&page, Selector::css("#never")).with_timeout(Duration::from_millis(300));
    match never.wait_visible().await {
        Err(E2eError::Timeout { elapsed, .. }) => assert!(elapsed >= Duration::from_millis(300)),
        other => panic!("expected a timeout, got {:?}", other),
    }

    let hidden = el(&page, Selector::css("#hidden-button"));
    hidden.wait_hidden().await?;

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_click_and_retries() -> anyhow::Result<()> {
    let (_server, driver, page) = widgets().await?;

    let counter = el(&page, Selector::css("#counter"));
    counter.click().await?;
    counter.click().await?;
    assert_eq!(counter.text().await?, "Clicked 2");
    assert_eq!(counter.attribute("data-count").await?.as_deref(), Some("2"));

    // A disabled button is never clickable; every attempt waits out its timeout
    let disabled = el(&page, Selector::css("#disabled-button"))
        .with_timeout(Duration::from_millis(200))
        .with_click_attempts(2);
    let start = Instant::now();
    let err = disabled.click().await.unwrap_err();
    assert!(matches!(err, E2eError::Timeout { .. }), "got {err}");
    assert!(start.elapsed() >= Duration::from_millis(400));

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_fill_check_and_select() -> anyhow::Result<()> {
    let (_server, driver, page) = widgets().await?;

    let name = el(&page, Selector::css("#name"));
    assert_eq!(name.value().await?, "prefilled");
    name.fill("e2e-disk-ab12").await?;
    assert_eq!(name.value().await?, "e2e-disk-ab12");
    assert_eq!(el(&page, Selector::css("#mirror")).text().await?, "e2e-disk-ab12");

    let notes = el(&page, Selector::css("textarea[name=\"notes\"]"));
    notes.fill("multi word value").await?;
    assert_eq!(notes.value().await?, "multi word value");

    let agree = el(&page, Selector::css("#agree"));
    agree.set_checked(true).await?;
    agree.set_checked(true).await?;
    let checked: bool = page.evaluate("document.getElementById('agree').checked").await?.into_value()?;
    assert!(checked);

    let unit = el(&page, Selector::css("select[name=\"unit\"]"));
    unit.select_option("GB").await?;
    assert_eq!(unit.value().await?, "g");
    assert!(matches!(
        unit.select_option("PB").await,
        Err(E2eError::ElementNotFound(_))
    ));

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_text_selectors_and_count() -> anyhow::Result<()> {
    let (_server, driver, page) = widgets().await?;

    assert_eq!(el(&page, Selector::css("li.item")).count().await?, 3);
    assert_eq!(el(&page, Selector::text("li", "gamma")).count().await?, 1);
    assert_eq!(el(&page, Selector::contains_text("li", "a")).count().await?, 3);
    assert_eq!(el(&page, Selector::nth("li.item", 1)).text().await?, "beta");
    assert_eq!(
        el(&page, Selector::xpath("//li[contains(., 'alpha')]")).text().await?,
        "alpha"
    );
    assert_eq!(el(&page, Selector::css("#missing")).count().await?, 0);

    let list = el(&page, Selector::css("ul"));
    let child = list.child("li:last-child", "last item");
    assert_eq!(child.text().await?, "gamma");

    assert!(matches!(
        el(&page, Selector::css("#missing")).text().await,
        Err(E2eError::ElementNotFound(_))
    ));

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_spinner_helpers() -> anyhow::Result<()> {
    let (_server, driver, page) = widgets().await?;

    el(&page, Selector::css("#short-spinner"))
        .wait_spinner_gone()
        .await?;

    // A spinner that never goes away is logged, not fatal
    el(&page, Selector::css("#stuck-spinner"))
        .with_timeout(Duration::from_millis(200))
        .wait_spinner_gone()
        .await?;

    driver.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_file_input() -> anyhow::Result<()> {
    let (_server, driver, page) = widgets().await?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("upload-me.txt");
    std::fs::write(&path, "hello")?;

    el(&page, Selector::css("#upload"))
        .set_input_files(&[path.as_path()])
        .await?;
    el(&page, Selector::css("#file-name"))
        .wait_text("upload-me.txt")
        .await?;

    driver.close().await?;
    Ok(())
}
