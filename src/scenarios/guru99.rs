//! Guru99 demo site: iframe ad, new tab, email form alert, tooltip page

use async_trait::async_trait;
use tracing::info;

use crate::config::{Config, SessionConfig};
use crate::driver::Locator;
use crate::scenario::{Scenario, ScenarioContext};
use crate::steps::{CloseNewWindows, HandleAlert, Interact, SwitchContext};
use crate::wait::{ElementClickable, ElementPresent, ElementVisible};
use crate::Result;

pub const HOME_URL: &str = "http://demo.guru99.com/test/guru99home";

/// Frame holding the JMeter banner
pub const AD_FRAME: &str = "a077aa5e";

pub const BANNER: &str = "img[src*='Jmeter720.png']";

pub const TEST_EMAIL: &str = "testautomation@example.com";

/// Iframe, tab and alert handling on the Guru99 home page
#[derive(Debug, Clone)]
pub struct IframeTabScenario {
    pub url: String,
}

impl Default for IframeTabScenario {
    fn default() -> Self {
        Self {
            url: HOME_URL.to_string(),
        }
    }
}

#[async_trait]
impl Scenario for IframeTabScenario {
    fn name(&self) -> &str {
        "guru99_iframe_tab"
    }

    fn description(&self) -> &str {
        "Close the tab opened from an iframe banner, submit the email form, open the tooltip page"
    }

    fn session_config(&self, config: &Config) -> SessionConfig {
        config.browser_session(Some(&self.url))
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        info!("Switching to iframe {}", AD_FRAME);
        ctx.run(SwitchContext::frame(AD_FRAME)).await?;
        let banner = ctx.wait_for(ElementClickable(Locator::css(BANNER))).await?;

        info!("Handling new tab");
        let closed = ctx.run(CloseNewWindows::new(banner)).await?;
        info!("Closed {} tab(s), back on the main window", closed.len());

        ctx.run(SwitchContext::default_content()).await?;
        let email = ctx
            .wait_for(ElementPresent(Locator::id("philadelphia-field-email")))
            .await?;
        ctx.run(Interact::type_keys(email, TEST_EMAIL)).await?;
        ctx.click(Locator::id("philadelphia-field-submit")).await?;

        let text = ctx.run(HandleAlert::containing("Successfully")).await?;
        info!("Alert message: {}", text);

        for link in ["Selenium", "Tooltip"] {
            let item = ctx.wait_for(ElementClickable(Locator::link_text(link))).await?;
            ctx.run(Interact::click(item)).await?;
        }
        info!("Navigated to Tooltip page");

        ctx.wait_for(ElementVisible(Locator::id("download_now"))).await?;
        Ok(())
    }
}
