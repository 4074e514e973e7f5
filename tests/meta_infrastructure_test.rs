//! Meta/Infrastructure Tests
//!
//! These tests verify that our testing infrastructure itself works correctly:
//! the fixture server and the fake CLI script, not browser automation.

mod fake_cli;

use fake_cli::FakeCli;
use test_server::TestServer;

/// Meta test: Verify test server starts on a random port
#[tokio::test]
async fn meta_test_server_starts() {
    let server = TestServer::start().await;
    assert!(server.addr().port() > 0);
}

/// Meta test: Verify test server serves both fixture pages
#[tokio::test]
async fn meta_test_server_serves_fixtures() {
    let server = TestServer::start().await;
    server
        .wait_ready()
        .await
        .expect("Server failed to become ready");

    let console = reqwest::get(server.url()).await.unwrap();
    assert!(console.status().is_success());
    let body = console.text().await.unwrap();
    assert!(body.contains("<title>Apolo Console</title>"));
    assert!(body.contains("id=\"root\""));

    let widgets = reqwest::get(format!("{}/widgets", server.url()))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(widgets.contains("id=\"counter\""));
}

/// Meta test: Verify multiple test servers get different ports for isolation
#[tokio::test]
async fn meta_test_multiple_servers_different_ports() {
    let server1 = TestServer::start().await;
    let server2 = TestServer::start().await;

    assert_ne!(server1.addr().port(), server2.addr().port());
}

/// Meta test: Each fake CLI starts from empty backend state
#[tokio::test]
async fn meta_test_fake_cli_state_is_isolated() {
    let first = FakeCli::new().unwrap();
    let second = FakeCli::new().unwrap();
    assert_ne!(first.state_dir(), second.state_dir());

    first.cli().secret.add("only_in_first", "x").await.unwrap();
    assert!(first.cli().secret.exists("only_in_first").await.unwrap());
    assert!(second.cli().secret.ls().await.unwrap().is_empty());
}
