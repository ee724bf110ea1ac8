//! WebDriver and REST wire tests
//!
//! These tests run the real reqwest-backed clients against a local mock server.


use mock_webdriver::{MockWebDriverServer, HANGING_ELEMENT, PNG_BYTES, STALE_ELEMENT};
use scenario_harness::{
    config::Config,
    driver::{BrowserDriver, ElementRef, KeyInput, KeySequence, Key, Locator, WebDriverClient},
    http::{HttpClient, HttpMethod, ReqwestHttpClient},
    scenario::ScenarioRunner,
    scenarios::rest_api::UsersApiScenario,
    session::{SessionManager, SessionManagerImpl},
    Error,
};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

async fn connect(server: &MockWebDriverServer) -> WebDriverClient {
    WebDriverClient::connect(
        server.url(),
        json!({ "alwaysMatch": { "browserName": "chrome" } }),
    )
    .await
    .unwrap()
}

/// Test 1: new session, navigation and quit
#[tokio::test]
async fn test_session_navigate_quit() {
    let server = MockWebDriverServer::start().await.unwrap();
    let client = connect(&server).await;
    assert_eq!(client.session_id(), "stub-session");

    assert_ok!(client.navigate("https://www.saucedemo.com/").await);
    assert_eq!(
        client.current_url().await.unwrap(),
        "https://www.saucedemo.com/inventory.html"
    );
    assert_ok!(client.quit().await);

    let requests = server.requests();
    assert_eq!(
        requests[0].body["capabilities"]["alwaysMatch"]["browserName"],
        "chrome"
    );
    assert_eq!(requests[1].body["url"], "https://www.saucedemo.com/");
    assert_eq!(
        server.commands(),
        vec!["POST /session", "POST /url", "GET /url", "DELETE /"]
    );
}

/// Test 2: invalid URLs never reach the driver
#[tokio::test]
async fn test_navigate_rejects_invalid_url() {
    let server = MockWebDriverServer::start().await.unwrap();
    let client = connect(&server).await;

    let err = assert_err!(client.navigate("not a url").await);
    assert!(matches!(err, Error::Navigation(_)));
    assert_eq!(server.commands(), vec!["POST /session"]);
}

/// Test 3: locator strategies and element references
#[tokio::test]
async fn test_find_elements() {
    let server = MockWebDriverServer::start().await.unwrap();
    let client = connect(&server).await;

    let found = client.find_elements(&Locator::id("user-name")).await.unwrap();
    let ids: Vec<&str> = found.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["el-1", "el-2"]);
    assert_eq!(found[0].locator(), &Locator::id("user-name"));

    let body = &server.requests()[1].body;
    assert_eq!(body["using"], "css selector");
    assert_eq!(body["value"], "[id=\"user-name\"]");

    let err = client
        .find_element(&Locator::class_name("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ElementNotFound(_)));
}

/// Test 4: element reads and typed keys
#[tokio::test]
async fn test_element_commands() {
    let server = MockWebDriverServer::start().await.unwrap();
    let client = connect(&server).await;
    let element = client.find_element(&Locator::css(".title")).await.unwrap();

    assert_eq!(client.element_text(&element).await.unwrap(), "Products");
    assert!(client.is_displayed(&element).await.unwrap());
    assert_eq!(
        client
            .element_attribute(&element, "innerHTML")
            .await
            .unwrap()
            .as_deref(),
        Some("<strong>Automation</strong>")
    );
    assert_eq!(
        client
            .element_attribute(&element, "data-test")
            .await
            .unwrap()
            .as_deref(),
        Some("inventory")
    );

    let keys = KeySequence::new()
        .then(KeyInput::chord(Key::Control, "b"))
        .then("Automation");
    client.send_keys(&element, &keys).await.unwrap();

    let typed = server
        .requests()
        .into_iter()
        .find(|r| r.path.ends_with("/value"))
        .unwrap();
    assert_eq!(typed.body["text"], "\u{E009}b\u{E000}Automation");
}

/// Test 5: wire error codes map onto typed errors
#[tokio::test]
async fn test_error_mapping() {
    let server = MockWebDriverServer::start().await.unwrap();
    let client = connect(&server).await;

    let stale = ElementRef::new(STALE_ELEMENT, Locator::id("login-button"));
    assert!(matches!(
        client.click(&stale).await.unwrap_err(),
        Error::StaleElement(_)
    ));
    assert!(client.is_stale(&stale).await.unwrap());

    assert!(matches!(
        client.alert_text().await.unwrap_err(),
        Error::NoAlertPresent(_)
    ));

    let source = assert_ok!(client.page_source().await);
    assert!(source.contains("Products"));
}

/// Test 6: windows and screenshots
#[tokio::test]
async fn test_windows_and_screenshot() {
    let server = MockWebDriverServer::start().await.unwrap();
    let client = connect(&server).await;

    let handles = client.window_handles().await.unwrap();
    assert_eq!(handles.len(), 2);
    assert_eq!(client.window_handle().await.unwrap().as_str(), "w-main");

    client.switch_to_window(&handles[1]).await.unwrap();
    client.close_window().await.unwrap();
    assert_eq!(server.requests().last().unwrap().method, "DELETE");

    assert_eq!(client.screenshot().await.unwrap(), PNG_BYTES.to_vec());
}

/// Test 7: session manager setup and teardown over the wire
#[tokio::test]
async fn test_session_manager_over_wire() {
    let server = MockWebDriverServer::start().await.unwrap();
    let config = Config {
        webdriver_url: server.url().to_string(),
        implicit_wait_ms: 250,
        ..Config::default()
    };
    let manager = SessionManagerImpl::from_config(&config);

    let session = manager
        .open(&config.browser_session(Some("https://www.saucedemo.com/")))
        .await
        .unwrap();
    assert_eq!(manager.session_count(), 1);
    manager.close(session).await.unwrap();
    assert_eq!(manager.session_count(), 0);

    let commands = server.commands();
    assert_eq!(commands.first().map(String::as_str), Some("POST /session"));
    assert!(commands.contains(&"POST /timeouts".to_string()));
    assert!(commands.contains(&"POST /window/maximize".to_string()));
    assert!(commands.contains(&"POST /url".to_string()));

    let tail: Vec<&str> = commands.iter().rev().take(2).map(String::as_str).collect();
    assert_eq!(tail, vec!["DELETE /", "DELETE /cookie"]);

    let timeouts = server
        .requests()
        .into_iter()
        .find(|r| r.path.ends_with("/timeouts"))
        .unwrap();
    assert_eq!(timeouts.body["implicit"], 250);
}

/// Test 8: an unreachable driver is a session init failure
#[tokio::test]
async fn test_unreachable_driver() {
    let config = Config {
        webdriver_url: "http://127.0.0.1:1".to_string(),
        ..Config::default()
    };
    let manager = SessionManagerImpl::from_config(&config);

    let err = manager
        .open(&config.browser_session(None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SessionInit(_)), "{:?}", err);
    assert_eq!(manager.session_count(), 0);
}

/// Test 9: the reqwest client resolves paths and parses JSON
#[tokio::test]
async fn test_reqwest_client_users() {
    let server = MockWebDriverServer::start().await.unwrap();
    let client = ReqwestHttpClient::new(server.url(), Duration::from_secs(5)).unwrap();

    let response = assert_ok!(client.request(HttpMethod::Get, "/users", None).await);
    assert!(response.is_success());
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(response.json().unwrap()[0]["email"], "Sincere@april.biz");
}

/// Test 10: the REST scenario end to end over real HTTP
#[tokio::test]
async fn test_users_scenario_over_http() {
    let server = MockWebDriverServer::start().await.unwrap();
    let config = Arc::new(Config::default());
    let manager = Arc::new(SessionManagerImpl::from_config(&config));
    let runner = ScenarioRunner::new(manager.clone(), config);

    let scenario = UsersApiScenario {
        base_url: server.url().to_string(),
    };
    let verdict = runner.run(&scenario).await;

    assert!(verdict.is_passed(), "{:?}", verdict);
    assert_eq!(server.commands(), vec!["GET /users"]);
    assert_eq!(manager.session_count(), 0);
}

/// Test 11: a command the driver never answers fails at the command timeout
#[tokio::test]
async fn test_unanswered_command_times_out() {
    let server = MockWebDriverServer::start().await.unwrap();
    let client = WebDriverClient::connect_with_timeout(
        server.url(),
        json!({ "alwaysMatch": { "browserName": "chrome" } }),
        Duration::from_millis(300),
    )
    .await
    .unwrap();

    let wedged = ElementRef::new(HANGING_ELEMENT, Locator::id("download_now"));
    let started = Instant::now();
    let err = assert_err!(client.click(&wedged).await);

    assert!(matches!(err, Error::Driver(_)), "{:?}", err);
    assert!(err.to_string().contains("timed out"), "{}", err);
    assert!(started.elapsed() < Duration::from_secs(5));

    // Teardown still goes through on a fresh connection
    assert_ok!(client.quit().await);
    assert_eq!(server.commands().last().map(String::as_str), Some("DELETE /"));
}
