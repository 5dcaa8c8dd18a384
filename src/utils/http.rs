//! Blocking HTTP access shared by remote repositories and catalog fetches.

use crate::config::ProxyConfig;
use std::time::Duration;

/// Transport settings for remote access.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first failed attempt
    pub max_retries: u8,
    /// Optional proxy
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            max_retries: crate::config::DEFAULT_MAX_RETRIES,
            proxy: None,
        }
    }
}

impl HttpSettings {
    /// Settings derived from the repository and proxy configuration.
    #[must_use]
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        Self {
            timeout: config.repositories.timeout(),
            max_retries: config.repositories.max_retries,
            proxy: config.proxy.clone(),
        }
    }
}

#[cfg(feature = "remote")]
pub use client::{build_client, get_text, FetchError};

#[cfg(feature = "remote")]
mod client {
    use super::HttpSettings;
    use reqwest::blocking::Client;
    use std::time::Duration;

    /// Why a GET failed after all retries.
    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    pub enum FetchError {
        /// The server answered 404
        #[error("not found")]
        NotFound,
        /// Transport error or unexpected status
        #[error("{0}")]
        Failed(String),
    }

    /// Build a blocking client with timeout, user agent and optional proxy.
    pub fn build_client(settings: &HttpSettings) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder().timeout(settings.timeout).user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        if let Some(proxy) = &settings.proxy {
            let mut p = reqwest::Proxy::all(proxy.url())?;
            if let Some(username) = &proxy.username {
                p = p.basic_auth(username, proxy.password.as_deref().unwrap_or_default());
            }
            builder = builder.proxy(p);
        }

        builder.build()
    }

    /// GET `url` as text with bounded retry.
    ///
    /// A 404 returns [`FetchError::NotFound`] without retrying. Transport
    /// errors and 5xx responses are retried with exponential backoff.
    pub fn get_text(client: &Client, url: &str, max_retries: u8) -> Result<String, FetchError> {
        let mut last_error = None;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                std::thread::sleep(delay);
                tracing::debug!("Retry attempt {} for {} after {:?}", attempt, url, delay);
            }

            match send(client, url) {
                Ok(body) => return Ok(body),
                Err(Attempt::Final(e)) => return Err(e),
                Err(Attempt::Retry(message)) => {
                    tracing::debug!("GET {} attempt {} failed: {}", url, attempt + 1, message);
                    last_error = Some(message);
                }
            }
        }

        Err(FetchError::Failed(
            last_error.unwrap_or_else(|| "unknown error".to_string()),
        ))
    }

    enum Attempt {
        Retry(String),
        Final(FetchError),
    }

    fn send(client: &Client, url: &str) -> Result<String, Attempt> {
        let response = client
            .get(url)
            .send()
            .map_err(|e| Attempt::Retry(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(Attempt::Final(FetchError::NotFound));
        }
        if status.is_server_error() {
            return Err(Attempt::Retry(format!("server returned {}", status.as_u16())));
        }
        if !status.is_success() {
            return Err(Attempt::Final(FetchError::Failed(format!(
                "server returned {}",
                status.as_u16()
            ))));
        }

        response.text().map_err(|e| Attempt::Retry(e.to_string()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::config::ProxyConfig;

        #[test]
        fn test_build_client_with_proxy() {
            let mut proxy = ProxyConfig::new("proxy.local", 3128);
            proxy.username = Some("user".to_string());
            proxy.password = Some("secret".to_string());
            let settings = HttpSettings {
                proxy: Some(proxy),
                ..HttpSettings::default()
            };
            assert!(build_client(&settings).is_ok());
        }

        #[test]
        fn test_fetch_error_display() {
            assert_eq!(FetchError::NotFound.to_string(), "not found");
            assert_eq!(FetchError::Failed("boom".into()).to_string(), "boom");
        }
    }
}
