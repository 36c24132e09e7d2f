use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub username_debounce: Duration,
    pub toast_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            username_debounce: Duration::from_millis(600),
            toast_ttl: Duration::from_secs(4),
        }
    }
}

impl ClientConfig {
    /// Reads `DEVSTORIES_*` variables over the defaults. A variable that is set
    /// but not a number is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let api_url = lookup("DEVSTORIES_API_URL")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.api_url);
        let request_timeout = number(&lookup, "DEVSTORIES_HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let username_debounce = number(&lookup, "DEVSTORIES_USERNAME_DEBOUNCE_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.username_debounce);
        let toast_ttl = number(&lookup, "DEVSTORIES_TOAST_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.toast_ttl);
        Ok(Self {
            api_url,
            request_timeout,
            username_debounce,
            toast_ttl,
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn number(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u64>> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u64>()
        .map(Some)
        .with_context(|| format!("{name} must be a whole number, got {raw:?}"))
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
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[("DEVSTORIES_API_URL", "  ")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.username_debounce, Duration::from_millis(600));
    }

    #[test]
    fn variables_override_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DEVSTORIES_API_URL", "https://blog.example/api"),
            ("DEVSTORIES_HTTP_TIMEOUT_SECS", "30"),
            ("DEVSTORIES_TOAST_SECS", " 2 "),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://blog.example/api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.toast_ttl, Duration::from_secs(2));
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("DEVSTORIES_USERNAME_DEBOUNCE_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("DEVSTORIES_USERNAME_DEBOUNCE_MS"));
    }
}
