//! CRM-specific source configuration.
//!
//! unical-core passes the `[source]` table as a generic JSON map; this gives
//! it a typed shape.

use anyhow::{Context, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct CrmSourceConfig {
    pub base_url: Url,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
}

impl TryFrom<&serde_json::Value> for CrmSourceConfig {
    type Error = anyhow::Error;

    fn try_from(params: &serde_json::Value) -> Result<Self> {
        let raw_url = params
            .get("base_url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing required field: base_url"))?;

        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = if raw_url.ends_with('/') {
            raw_url.to_string()
        } else {
            format!("{raw_url}/")
        };
        let base_url = Url::parse(&normalized).with_context(|| format!("Invalid base_url: {raw_url}"))?;

        let token = params
            .get("token")
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(CrmSourceConfig { base_url, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let config = CrmSourceConfig::try_from(&json!({ "base_url": "https://crm.example.com/backend" })).unwrap();
        assert_eq!(
            config.base_url.join("api/v1/tasks/all").unwrap().as_str(),
            "https://crm.example.com/backend/api/v1/tasks/all"
        );
        assert!(config.token.is_none());
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        assert!(CrmSourceConfig::try_from(&json!({ "token": "abc" })).is_err());
    }
}
