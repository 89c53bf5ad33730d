use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client;
use thiserror::Error;

const TABLE_VAR: &str = "DYNAMODB_TABLE";
const ENDPOINT_VAR: &str = "DYNAMODB_ENDPOINT_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}

/// Settings read once per cold start.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub table_name: String,
    pub endpoint_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = lookup(TABLE_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(TABLE_VAR))?;
        let endpoint_url = lookup(ENDPOINT_VAR).filter(|v| !v.trim().is_empty());

        Ok(Self {
            table_name,
            endpoint_url,
        })
    }

    /// Builds the DynamoDB client, pointing it at `DYNAMODB_ENDPOINT_URL` when set.
    pub fn dynamodb_client(&self, sdk_config: &SdkConfig) -> Client {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(url) = &self.endpoint_url {
            builder = builder.endpoint_url(url);
        }
        Client::from_conf(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_table_and_endpoint() {
        let config = Config::from_lookup(lookup_from(&[
            ("DYNAMODB_TABLE", "coffee-dev"),
            ("DYNAMODB_ENDPOINT_URL", "http://localhost:8000"),
        ]))
        .unwrap();

        assert_eq!(config.table_name, "coffee-dev");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn endpoint_is_optional() {
        let config = Config::from_lookup(lookup_from(&[("DYNAMODB_TABLE", "coffee")])).unwrap();
        assert!(config.endpoint_url.is_none());
    }

    #[test]
    fn missing_or_blank_table_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DYNAMODB_TABLE"));
        assert_eq!(err.to_string(), "DYNAMODB_TABLE not set");

        let err = Config::from_lookup(lookup_from(&[("DYNAMODB_TABLE", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DYNAMODB_TABLE"));
    }
}
