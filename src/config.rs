use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:7999";

const BASE_URL_VAR: &str = "ROUTECHAT_BASE_URL";
const TIMEOUT_VAR: &str = "ROUTECHAT_TIMEOUT_SECS";

/// Settings for talking to the routing gateway, fixed once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatConfig {
    pub base_url: String,
    // No timeout unless configured; a hung backend then keeps the session pending
    pub request_timeout: Option<Duration>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ChatConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = match lookup(BASE_URL_VAR) {
            Some(url) if !url.trim().is_empty() => {
                log::debug!("Using base URL from environment variable: {}", BASE_URL_VAR);
                url.trim().to_string()
            }
            _ => DEFAULT_BASE_URL.to_string(),
        };

        let request_timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().context(format!(
                    "Failed to parse '{}' from environment variable '{}' as seconds",
                    raw, TIMEOUT_VAR
                ))?;
                // Zero means "no timeout", same as leaving it unset
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            base_url,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ChatConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn reads_base_url_and_timeout() {
        let config = ChatConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://gateway:8000"),
            (TIMEOUT_VAR, "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://gateway:8000");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = ChatConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "0")])).unwrap();
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn rejects_garbage_timeout() {
        assert!(ChatConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).is_err());
    }
}
