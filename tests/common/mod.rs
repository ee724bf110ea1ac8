//! Common test utilities
//!
//! Scripted mock sites that behave like the pages the built-in scenarios drive, plus a fixture
//! wiring them into a session manager and runner.

#![allow(dead_code)]

use scenario_harness::{
    config::Config,
    driver::{Key, Keystroke, Locator, MockBrowser, MockDriverFactory, MockElement, MockState},
    http::{HttpMethod, MockHttpClient, MockHttpFactory},
    report::MemoryReportSink,
    scenario::ScenarioRunner,
    scenarios::{guru99, rich_text_editor, sauce_shop},
    session::SessionManagerImpl,
};
use serde_json::json;
use std::sync::Arc;

pub const FOOTER_TEXT: &str =
    "© 2025 Sauce Labs. All Rights Reserved. Terms of Service | Privacy Policy";

pub const BIKE_LIGHT: &str = "add-to-cart-sauce-labs-bike-light";

/// Configuration with short waits and the bundled credentials file
pub fn test_config() -> Config {
    Config {
        default_timeout_ms: 2_000,
        poll_interval_ms: 100,
        credentials_path: concat!(env!("CARGO_MANIFEST_DIR"), "/resources/credential.json")
            .to_string(),
        ..Config::default()
    }
}

/// Mock drivers, a mock REST API and a recording sink behind one session manager
pub struct World {
    pub drivers: Arc<MockDriverFactory>,
    pub http: Arc<MockHttpClient>,
    pub manager: Arc<SessionManagerImpl>,
    pub sink: Arc<MemoryReportSink>,
}

impl World {
    pub fn new(drivers: MockDriverFactory) -> Self {
        Self::with_http(drivers, users_api())
    }

    pub fn with_http(drivers: MockDriverFactory, http: MockHttpClient) -> Self {
        let drivers = Arc::new(drivers);
        let http = Arc::new(http);
        let manager = Arc::new(SessionManagerImpl::new(
            drivers.clone(),
            Arc::new(MockHttpFactory::new(http.clone())),
        ));
        Self {
            drivers,
            http,
            manager,
            sink: Arc::new(MemoryReportSink::new()),
        }
    }

    pub fn runner(&self) -> ScenarioRunner {
        ScenarioRunner::with_sink(
            self.manager.clone(),
            Arc::new(test_config()),
            self.sink.clone(),
        )
    }

    /// The only browser launched so far
    pub fn browser(&self) -> Arc<MockBrowser> {
        let launched = self.drivers.launched();
        assert_eq!(launched.len(), 1, "expected exactly one launched browser");
        launched[0].clone()
    }
}

// ---------------------------------------------------------------------------
// Sauce Labs demo shop
// ---------------------------------------------------------------------------

fn show_login_error(state: &mut MockState, message: &str) {
    let container = Locator::css(".error-message-container");
    state.detach(&container);
    state.add_element(MockElement::new(container).with_text(message));
}

fn load_login_page(state: &mut MockState) {
    state.clear_page();
    state.source = "<html><title>Swag Labs</title></html>".to_string();
    for name in ["user-name", "password", "login-button"] {
        state.add_element(MockElement::new(Locator::name(name)).also(Locator::id(name)));
    }
}

fn load_inventory(state: &mut MockState) {
    state.clear_page();
    state.url = sauce_shop::SHOP_URL.to_string();
    for id in [
        sauce_shop::BACKPACK,
        sauce_shop::FLEECE_JACKET,
        BIKE_LIGHT,
        "shopping_cart_container",
    ] {
        state.add_element(MockElement::new(Locator::id(id)));
    }
    state.add_element(MockElement::new(Locator::css("footer")).with_text(FOOTER_TEXT));
}

fn bump_cart_badge(state: &mut MockState) {
    let badge = Locator::class_name(sauce_shop::CART_BADGE);
    match state.element_mut(&badge) {
        Some(element) => {
            let count: u32 = element.text.parse().unwrap_or(0);
            element.text = (count + 1).to_string();
        }
        None => state.add_element(MockElement::new(badge).with_text("1")),
    }
}

fn submit_login(state: &mut MockState) {
    let value_of = |state: &mut MockState, name: &str| {
        state
            .element_mut(&Locator::name(name))
            .map(|e| e.value.clone())
            .unwrap_or_default()
    };
    let user = value_of(state, "user-name");
    let pass = value_of(state, "password");

    if user.is_empty() {
        show_login_error(state, "Epic sadface: Username is required");
    } else if user != "standard_user" || pass != "secret_sauce" {
        show_login_error(
            state,
            "Epic sadface: Username and password do not match any user in this service",
        );
    } else {
        load_inventory(state);
    }
}

/// Login form, inventory with a cart badge, three-page checkout
///
/// The bike light button has no handler, so the badge never moves for it.
pub fn sauce_shop_browser() -> MockBrowser {
    let browser = MockBrowser::new();
    browser.on_navigate(|state, _url| load_login_page(state));
    browser.on_click(Locator::name("login-button"), submit_login);

    for item in [sauce_shop::BACKPACK, sauce_shop::FLEECE_JACKET] {
        browser.on_click(Locator::id(item), bump_cart_badge);
    }

    browser.on_click(Locator::id("shopping_cart_container"), |state| {
        state.add_element(MockElement::new(Locator::id("checkout")));
    });
    browser.on_click(Locator::id("checkout"), |state| {
        for id in ["first-name", "last-name", "postal-code"] {
            state.add_element(MockElement::new(Locator::id(id)));
        }
        state.add_element(MockElement::new(Locator::id("continue")).hidden_for(1));
    });
    browser.on_click(Locator::id("continue"), |state| {
        state.add_element(MockElement::new(Locator::id("finish")).absent_for(2));
    });
    browser.on_click(Locator::id("finish"), |state| {
        state.source = format!(
            "<html><h2 class=\"complete-header\">{}</h2></html>",
            sauce_shop::ORDER_CONFIRMATION
        );
    });
    browser
}

// ---------------------------------------------------------------------------
// Guru99 demo site
// ---------------------------------------------------------------------------

/// How the Guru99 page behaves when its iframe banner is clicked
#[derive(Debug, Clone, Copy)]
pub enum BannerBehavior {
    OpensTab,
    Inert,
}

/// Home page with an ad iframe, email form raising `alert_text`, and a menu to the tooltip page
pub fn guru99_browser(alert_text: &'static str, banner: BannerBehavior) -> MockBrowser {
    let browser = MockBrowser::new();
    browser.on_navigate(|state, _url| {
        state.clear_page();
        state.add_frame(guru99::AD_FRAME);
        state.add_element(
            MockElement::new(Locator::css(guru99::BANNER))
                .in_frame(guru99::AD_FRAME)
                .hidden_for(1),
        );
        state.add_element(MockElement::new(Locator::id("philadelphia-field-email")));
        state.add_element(MockElement::new(Locator::id("philadelphia-field-submit")));
        state.add_element(MockElement::new(Locator::link_text("Selenium")));
    });

    if let BannerBehavior::OpensTab = banner {
        browser.on_click(Locator::css(guru99::BANNER), |state| {
            state.open_window();
        });
    }
    browser.on_click(Locator::id("philadelphia-field-submit"), move |state| {
        state.show_alert(alert_text);
    });
    browser.on_click(Locator::link_text("Selenium"), |state| {
        state.add_element(MockElement::new(Locator::link_text("Tooltip")).absent_for(1));
    });
    browser.on_click(Locator::link_text("Tooltip"), |state| {
        state.clear_page();
        state.url = "https://demo.guru99.com/test/tooltip.html".to_string();
        state.add_element(MockElement::new(Locator::id("download_now")).hidden_for(2));
    });
    browser
}

// ---------------------------------------------------------------------------
// Rich text editor
// ---------------------------------------------------------------------------

fn toggle_tag(element: &mut MockElement, tag: &str) {
    let marker = format!("data-open-{}", tag);
    if element.attributes.remove(&marker).is_some() {
        element.text.push_str(&format!("</{}>", tag));
    } else {
        element.attributes.insert(marker, "true".to_string());
        element.text.push_str(&format!("<{}>", tag));
    }
}

/// Editable area that turns control+b / control+u into markup
pub fn editor_browser() -> MockBrowser {
    let editable = Locator::class_name(rich_text_editor::EDITABLE_CLASS);
    let browser = MockBrowser::new();

    let page_element = editable.clone();
    browser.on_navigate(move |state, _url| {
        state.clear_page();
        state.add_element(MockElement::new(page_element.clone()));
    });

    browser.on_keys(editable, |element, strokes| {
        for stroke in strokes {
            match stroke {
                Keystroke::Chord(mods, 'b') if mods.contains(&Key::Control) => {
                    toggle_tag(element, "strong")
                }
                Keystroke::Chord(mods, 'u') if mods.contains(&Key::Control) => {
                    toggle_tag(element, "u")
                }
                Keystroke::Key(Key::Space) => element.text.push(' '),
                Keystroke::Char(ch) => element.text.push(*ch),
                _ => {}
            }
        }
    });
    browser
}

// ---------------------------------------------------------------------------
// REST API
// ---------------------------------------------------------------------------

/// `/users` with two well-formed users
pub fn users_api() -> MockHttpClient {
    let http = MockHttpClient::new("https://jsonplaceholder.typicode.com");
    http.respond_json(
        HttpMethod::Get,
        "/users",
        200,
        json!([
            { "id": 1, "name": "Leanne Graham", "email": "Sincere@april.biz" },
            { "id": 2, "name": "Ervin Howell", "email": "Shanna@melissa.tv" }
        ]),
    );
    http
}
