//! Client configuration.

use serde::{Deserialize, Serialize};

/// Endpoint and authentication settings for a [`RestClient`](crate::http::RestClient).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base server URL, e.g. `https://api.example.com`
    pub endpoint: String,
    /// Query string sent with every request, without the leading `?`
    #[serde(default)]
    pub query: String,
    /// Whether requests must carry an auth token
    #[serde(default)]
    pub use_auth_token: bool,
    /// Prepended to the token in the `Authorization` header, e.g. `"Bearer "`
    #[serde(default)]
    pub auth_header_prefix: String,
    /// Initial auth token
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Config {
    pub fn new(endpoint: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            query: query.into(),
            ..Default::default()
        }
    }

    /// Requires an auth token, sent as `<prefix><token>`.
    pub fn with_auth(mut self, prefix: impl Into<String>) -> Self {
        self.use_auth_token = true;
        self.auth_header_prefix = prefix.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_disables_auth() {
        let config = Config::new("https://api.example.com", "key=abc");
        assert_eq!(config.endpoint, "https://api.example.com");
        assert_eq!(config.query, "key=abc");
        assert!(!config.use_auth_token);
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_with_auth() {
        let config = Config::new("https://api.example.com", "")
            .with_auth("Bearer ")
            .with_token(Some("secret".to_string()));
        assert!(config.use_auth_token);
        assert_eq!(config.auth_header_prefix, "Bearer ");
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"endpoint": "https://api.example.com"}"#).unwrap();
        assert_eq!(config, Config::new("https://api.example.com", ""));
    }

    #[test]
    fn test_serialize_skips_token() {
        let config = Config::new("https://api.example.com", "").with_token(Some("secret".into()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
