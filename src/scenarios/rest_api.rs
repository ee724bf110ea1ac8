//! JSONPlaceholder users endpoint

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::assertion::Matcher;
use crate::config::{Config, SessionConfig};
use crate::scenario::{Scenario, ScenarioContext};
use crate::steps::HttpRequest;
use crate::Result;

pub const API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// GET /users, list every user, check the first email address
#[derive(Debug, Clone)]
pub struct UsersApiScenario {
    pub base_url: String,
}

impl Default for UsersApiScenario {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl Scenario for UsersApiScenario {
    fn name(&self) -> &str {
        "rest_api_users"
    }

    fn description(&self) -> &str {
        "GET /users returns users whose first email address is well-formed"
    }

    fn session_config(&self, config: &Config) -> SessionConfig {
        config.http_session(&self.base_url)
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let response = ctx.run(HttpRequest::get("/users")).await?;
        info!("GET /users completed with status {}", response.status);
        ctx.expect("GET /users status", response.status, Matcher::equals(200))?;

        let body = response.json()?.clone();
        ctx.expect("user list", body.clone(), Matcher::NonEmpty)?;

        let users: Vec<User> = serde_json::from_value(body)?;
        info!("Parsed {} users", users.len());
        for user in &users {
            info!("{} | {}", user.name, user.email);
        }

        let first_email = users
            .first()
            .map(|u| u.email.clone())
            .unwrap_or_default();
        ctx.expect("first user email", first_email, Matcher::contains("@"))
    }
}
