//! Credential loading
//!
//! Credentials are a flat JSON object of string values, e.g.
//! `{"username": "standard_user", "password": "secret_sauce"}`.

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// Key-value credential record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    values: HashMap<String, String>,
}

impl Credentials {
    /// Read credentials from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read credentials {}: {}",
                path.display(),
                e
            ))
        })?;
        let credentials = Self::from_json(&content)?;
        debug!(
            "Loaded {} credential keys from {}",
            credentials.values.len(),
            path.display()
        );
        Ok(credentials)
    }

    /// Parse credentials from a JSON object
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::configuration("Credentials must be a JSON object"))?;

        let values = object
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect();
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`, or a configuration error naming the missing key
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::configuration(format!("Missing credential '{}'", key)))
    }
}
