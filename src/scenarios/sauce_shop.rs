//! Sauce Labs demo shop: login, cart, checkout and login validation

use async_trait::async_trait;
use tracing::info;

use crate::assertion::Matcher;
use crate::config::{Config, SessionConfig};
use crate::credentials::Credentials;
use crate::driver::Locator;
use crate::scenario::{Scenario, ScenarioContext};
use crate::steps::{ExecuteScript, Interact, ReadPageSource};
use crate::wait::{ElementClickable, ElementTextMatches, ElementVisible, StalenessOf};
use crate::Result;

pub const SHOP_URL: &str = "https://www.saucedemo.com/inventory.html";

pub const BACKPACK: &str = "add-to-cart-sauce-labs-backpack";
pub const FLEECE_JACKET: &str = "add-to-cart-sauce-labs-fleece-jacket";

pub const CART_BADGE: &str = "shopping_cart_badge";

pub const ORDER_CONFIRMATION: &str = "Thank you for your order!";

/// Fill in and submit the login form, then wait for the form to go away
pub async fn login(ctx: &mut ScenarioContext, username: &str, password: &str) -> Result<()> {
    info!("Performing login");
    let user = ctx.locate(Locator::name("user-name")).await?;
    let pass = ctx.locate(Locator::name("password")).await?;
    let button = ctx.locate(Locator::name("login-button")).await?;

    ctx.run(Interact::type_keys(user, username)).await?;
    ctx.run(Interact::type_keys(pass, password)).await?;
    ctx.run(Interact::click(button.clone())).await?;

    ctx.wait_for(StalenessOf(button)).await?;
    info!("Login successful");
    Ok(())
}

/// Add one item and wait for the cart badge to show `count + 1`
///
/// Returns the new count.
pub async fn add_to_cart(ctx: &mut ScenarioContext, button_id: &str, count: u32) -> Result<u32> {
    let expected = count + 1;
    ctx.click(Locator::id(button_id)).await?;

    ctx.wait_for(ElementTextMatches::new(
        Locator::class_name(CART_BADGE),
        expected.to_string(),
        move |text| text.parse::<u32>().ok() == Some(expected),
    ))
    .await?;

    info!("Added {} to cart, {} item(s) now", button_id, expected);
    Ok(expected)
}

async fn click_when_clickable(ctx: &mut ScenarioContext, locator: Locator) -> Result<()> {
    let element = ctx.wait_for(ElementClickable(locator)).await?;
    ctx.run(Interact::click(element)).await?;
    Ok(())
}

async fn fill_when_clickable(ctx: &mut ScenarioContext, locator: Locator, text: &str) -> Result<()> {
    let element = ctx.wait_for(ElementClickable(locator)).await?;
    ctx.run(Interact::type_keys(element, text)).await?;
    Ok(())
}

/// Check out the cart with a fixed shipping address
pub async fn checkout(ctx: &mut ScenarioContext) -> Result<()> {
    info!("Checking out cart");
    ctx.click(Locator::id("shopping_cart_container")).await?;
    click_when_clickable(ctx, Locator::id("checkout")).await?;

    fill_when_clickable(ctx, Locator::id("first-name"), "Bob").await?;
    fill_when_clickable(ctx, Locator::id("last-name"), "Rob").await?;
    fill_when_clickable(ctx, Locator::id("postal-code"), "12345").await?;

    click_when_clickable(ctx, Locator::id("continue")).await?;
    click_when_clickable(ctx, Locator::id("finish")).await?;

    let source = ctx.run(ReadPageSource).await?;
    ctx.expect(
        "order confirmation",
        source,
        Matcher::contains(ORDER_CONFIRMATION),
    )?;
    info!("Cart checked out");
    Ok(())
}

fn load_credentials(ctx: &ScenarioContext) -> Result<Credentials> {
    let path = &ctx.config().credentials_path;
    info!("Loading login data from {}", path);
    Credentials::from_path(path)
}

/// Log in, add two items and check out
#[derive(Debug, Clone)]
pub struct PurchaseScenario {
    pub url: String,
}

impl Default for PurchaseScenario {
    fn default() -> Self {
        Self {
            url: SHOP_URL.to_string(),
        }
    }
}

#[async_trait]
impl Scenario for PurchaseScenario {
    fn name(&self) -> &str {
        "sauce_shop_purchase"
    }

    fn description(&self) -> &str {
        "Log in, add a backpack and a fleece jacket, complete checkout"
    }

    fn session_config(&self, config: &Config) -> SessionConfig {
        config.browser_session(Some(&self.url))
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let credentials = load_credentials(ctx)?;
        login(
            ctx,
            credentials.require("username")?,
            credentials.require("password")?,
        )
        .await?;

        let mut count = 0;
        for item in [BACKPACK, FLEECE_JACKET] {
            count = add_to_cart(ctx, item, count).await?;
        }

        checkout(ctx).await
    }
}

/// Empty-form validation message, then login and footer content
#[derive(Debug, Clone)]
pub struct LoginErrorScenario {
    pub url: String,
    pub footer_fragments: Vec<String>,
}

impl Default for LoginErrorScenario {
    fn default() -> Self {
        Self {
            url: SHOP_URL.to_string(),
            footer_fragments: vec!["2025".to_string(), "Terms of Service".to_string()],
        }
    }
}

#[async_trait]
impl Scenario for LoginErrorScenario {
    fn name(&self) -> &str {
        "sauce_shop_login_error"
    }

    fn description(&self) -> &str {
        "Submit an empty login form, check the error, then log in and check the footer"
    }

    fn session_config(&self, config: &Config) -> SessionConfig {
        config.browser_session(Some(&self.url))
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        ctx.click(Locator::name("login-button")).await?;
        let container = ctx
            .wait_for(ElementVisible(Locator::css(".error-message-container")))
            .await?;
        let message = ctx
            .run(Interact::read_text(container))
            .await?
            .unwrap_or_default();
        ctx.expect(
            "login error message",
            message,
            Matcher::equals("Epic sadface: Username is required"),
        )?;

        let credentials = load_credentials(ctx)?;
        login(
            ctx,
            credentials.require("username")?,
            credentials.require("password")?,
        )
        .await?;

        ctx.run(ExecuteScript::scroll_to_bottom()).await?;
        let footer = ctx.text(Locator::css("footer")).await?;
        for fragment in &self.footer_fragments {
            ctx.expect(
                &format!("footer contains '{}'", fragment),
                footer.as_str(),
                Matcher::contains(fragment.as_str()),
            )?;
        }
        Ok(())
    }
}
