//! Configuration options for the item manager

use std::time::Duration;
use url::Url;

use crate::error::Error;

/// Environment variable holding the backend base address
pub const BASE_URL_ENV: &str = "ITEM_API_BASE_URL";

/// Base address used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration options for the item manager
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Backend origin prefixed onto every request path and image reference
    pub base_url: String,

    /// Client-wide request timeout; `None` leaves reqwest's default in place
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            user_agent: format!("item-manager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Read the base address from `ITEM_API_BASE_URL`, falling back to the default.
    pub fn from_env() -> Result<Self, Error> {
        let options = match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        };
        options.validate()?;
        Ok(options)
    }

    /// Set the backend base address
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }

    /// Check that the base address is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), Error> {
        let url = Url::parse(&self.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::config(format!(
                "base address must use http or https, got {}",
                other
            ))),
        }
    }

    /// Turn a stored relative image path into a fetchable reference.
    pub fn resolve_image_url(&self, image_path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), image_path)
    }

    /// Build the reqwest client these options describe
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}
