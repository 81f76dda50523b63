use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_error_body_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    /// `base_url` should be like `http://localhost:8000`; a trailing slash is trimmed.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            max_error_body_bytes: 8 * 1024,
        }
    }

    /// Optional:
    /// - `ISMSP_API_URL` (default: `http://localhost:8000`)
    /// - `ISMSP_TIMEOUT_SECS` (default: 30)
    /// - `ISMSP_MAX_ERROR_BODY_BYTES` (default: 8192)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("ISMSP_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(base_url.trim());

        if let Some(timeout) = lookup("ISMSP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(timeout);
        }

        if let Some(limit) =
            lookup("ISMSP_MAX_ERROR_BODY_BYTES").and_then(|s| s.parse::<usize>().ok())
        {
            config.max_error_body_bytes = limit;
        }

        config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_error_body_bytes, 8192);
    }

    #[test]
    fn overrides_and_trailing_slash() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ISMSP_API_URL", "https://isms.example.org/"),
            ("ISMSP_TIMEOUT_SECS", "5"),
            ("ISMSP_MAX_ERROR_BODY_BYTES", "64"),
        ]));
        assert_eq!(config.base_url, "https://isms.example.org");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_error_body_bytes, 64);
        assert_eq!(config.url("/api/statistics"), "https://isms.example.org/api/statistics");
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ISMSP_API_URL", "  "),
            ("ISMSP_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
