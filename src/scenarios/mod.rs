//! Site scenarios
//!
//! - `guru99`: iframe, new tab, alert and menu navigation on the Guru99 demo site
//! - `rich_text_editor`: bold/underline formatting in an online CKEditor
//! - `sauce_shop`: login, cart and checkout on the Sauce Labs demo shop
//! - `rest_api`: the JSONPlaceholder `/users` endpoint

pub mod guru99;
pub mod rich_text_editor;
pub mod sauce_shop;
pub mod rest_api;

use std::sync::Arc;

use crate::scenario::Scenario;
use crate::{Error, Result};

/// Every built-in scenario, in their default run order
pub fn catalog() -> Vec<Arc<dyn Scenario>> {
    vec![
        Arc::new(guru99::IframeTabScenario::default()),
        Arc::new(rich_text_editor::RichTextEditorScenario::default()),
        Arc::new(sauce_shop::PurchaseScenario::default()),
        Arc::new(sauce_shop::LoginErrorScenario::default()),
        Arc::new(rest_api::UsersApiScenario::default()),
    ]
}

/// Pick scenarios by name, keeping the order of `names`; empty `names` selects all
pub fn select(catalog: Vec<Arc<dyn Scenario>>, names: &[String]) -> Result<Vec<Arc<dyn Scenario>>> {
    if names.is_empty() {
        return Ok(catalog);
    }

    names
        .iter()
        .map(|name| {
            catalog
                .iter()
                .find(|s| s.name() == name.as_str())
                .cloned()
                .ok_or_else(|| Error::configuration(format!("Unknown scenario '{}'", name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let scenarios = catalog();
        let names: HashSet<&str> = scenarios.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn test_select() {
        let picked = select(
            catalog(),
            &["rest_api_users".to_string(), "guru99_iframe_tab".to_string()],
        )
        .unwrap();
        let names: Vec<&str> = picked.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["rest_api_users", "guru99_iframe_tab"]);

        match select(catalog(), &["nope".to_string()]) {
            Err(Error::Configuration(msg)) => assert!(msg.contains("nope"), "{}", msg),
            Err(other) => panic!("expected configuration error, got {:?}", other),
            Ok(_) => panic!("unknown scenario name was accepted"),
        }
    }
}
