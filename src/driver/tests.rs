//! Driver layer unit tests

use super::keys::{Key, KeyInput, KeySequence};
use super::mock::{MockBrowser, MockElement};
use super::traits::{BrowserDriver, By, Locator, WindowHandle};
use super::webdriver::{capabilities, locator_strategy, wire_error};
use crate::config::Config;
use crate::Error;

#[test]
fn test_locator_display() {
    assert_eq!(Locator::id("checkout").to_string(), "id=checkout");
    assert_eq!(Locator::link_text("Tooltip").to_string(), "link=Tooltip");
}

#[test]
fn test_locator_strategy_translation() {
    assert_eq!(
        locator_strategy(&Locator::id("first-name")),
        ("css selector", "[id=\"first-name\"]".to_string())
    );
    assert_eq!(
        locator_strategy(&Locator::name("user-name")),
        ("css selector", "[name=\"user-name\"]".to_string())
    );
    assert_eq!(
        locator_strategy(&Locator::class_name("shopping_cart_badge")),
        ("css selector", ".shopping_cart_badge".to_string())
    );
    assert_eq!(
        locator_strategy(&Locator::new(By::LinkText, "Selenium")),
        ("link text", "Selenium".to_string())
    );
}

#[test]
fn test_wire_error_mapping() {
    assert!(matches!(wire_error("no such element", "x"), Error::ElementNotFound(_)));
    assert!(matches!(wire_error("no such frame", "x"), Error::ContextSwitch(_)));
    assert!(matches!(wire_error("no such alert", "x"), Error::NoAlertPresent(_)));
    assert!(matches!(wire_error("stale element reference", "x"), Error::StaleElement(_)));
    assert!(matches!(wire_error("javascript error", "x"), Error::Driver(_)));
}

#[test]
fn test_chrome_capabilities() {
    let mut config = Config::default();
    config.maximize_window = false;
    let caps = capabilities("chrome", &config.browser_session(None));

    let args = caps["alwaysMatch"]["goog:chromeOptions"]["args"]
        .as_array()
        .unwrap();
    assert!(args.iter().any(|a| a == "--headless=new"));
    assert!(args.iter().any(|a| a == "--window-size=1920,1080"));
}

#[tokio::test]
async fn test_mock_find_respects_frame() {
    let browser = MockBrowser::new();
    browser.state().add_frame("a077aa5e");
    browser.add_element(MockElement::new(Locator::css("img")).in_frame("a077aa5e"));

    let outside = browser.find_elements(&Locator::css("img")).await.unwrap();
    assert!(outside.is_empty());

    browser.switch_to_frame("a077aa5e").await.unwrap();
    let inside = browser.find_elements(&Locator::css("img")).await.unwrap();
    assert_eq!(inside.len(), 1);
}

#[tokio::test]
async fn test_mock_unknown_frame_is_context_switch_error() {
    let browser = MockBrowser::new();
    let err = browser.switch_to_frame("missing").await.unwrap_err();
    assert!(matches!(err, Error::ContextSwitch(_)));
}

#[tokio::test]
async fn test_mock_detached_element_is_stale() {
    let browser = MockBrowser::new();
    browser.add_element(MockElement::new(Locator::name("login-button")));
    let button = browser
        .find_element(&Locator::name("login-button"))
        .await
        .unwrap();
    assert!(!browser.is_stale(&button).await.unwrap());

    browser.state().detach(&Locator::name("login-button"));
    assert!(browser.is_stale(&button).await.unwrap());
}

#[tokio::test]
async fn test_mock_default_typing() {
    let browser = MockBrowser::new();
    browser.add_element(MockElement::new(Locator::id("first-name")));
    let input = browser.find_element(&Locator::id("first-name")).await.unwrap();

    let keys = KeySequence::new().then("Bob").then(Key::Space).then("R");
    browser.send_keys(&input, &keys).await.unwrap();

    let value = browser.element_attribute(&input, "value").await.unwrap();
    assert_eq!(value.as_deref(), Some("Bob R"));
}

#[tokio::test]
async fn test_mock_key_handler_sees_chords() {
    let browser = MockBrowser::new();
    browser.add_element(MockElement::new(Locator::class_name("editor")));
    browser.on_keys(Locator::class_name("editor"), |element, strokes| {
        element.text = format!("{} strokes", strokes.len());
    });
    let editor = browser
        .find_element(&Locator::class_name("editor"))
        .await
        .unwrap();

    let keys = KeySequence::new()
        .then(KeyInput::chord(Key::Control, "b"))
        .then("ab");
    browser.send_keys(&editor, &keys).await.unwrap();

    assert_eq!(browser.element_text(&editor).await.unwrap(), "3 strokes");
}

#[tokio::test]
async fn test_mock_click_hidden_element_not_interactable() {
    let browser = MockBrowser::new();
    browser.add_element(MockElement::new(Locator::id("finish")).hidden());
    let finish = browser.find_element(&Locator::id("finish")).await.unwrap();

    let err = browser.click(&finish).await.unwrap_err();
    assert!(matches!(err, Error::ElementNotInteractable(_)));
}

#[tokio::test]
async fn test_mock_windows_and_alerts() {
    let browser = MockBrowser::new();
    let main = browser.window_handle().await.unwrap();
    let tab = browser.state().open_window();

    browser.switch_to_window(&tab).await.unwrap();
    browser.close_window().await.unwrap();
    browser.switch_to_window(&main).await.unwrap();
    assert_eq!(browser.window_handles().await.unwrap(), vec![main.clone()]);

    let err = browser
        .switch_to_window(&WindowHandle::new("gone"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ContextSwitch(_)));

    assert!(matches!(
        browser.alert_text().await.unwrap_err(),
        Error::NoAlertPresent(_)
    ));
    browser.state().show_alert("Successfully submitted");
    browser.accept_alert().await.unwrap();
    assert_eq!(browser.state().accepted_alerts, vec!["Successfully submitted"]);
}

#[tokio::test]
async fn test_mock_quit_closes_session() {
    let browser = MockBrowser::new();
    browser.quit().await.unwrap();
    assert_eq!(browser.quit_count(), 1);

    let err = browser.navigate("https://example.com").await.unwrap_err();
    assert!(matches!(err, Error::SessionClosed(_)));
}
