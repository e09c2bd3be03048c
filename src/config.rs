use std::path::PathBuf;
use std::time::Duration;

/// Public sales API the dashboard reads by default.
pub const DEFAULT_SOURCE_URL: &str = "https://labdados.com/produtos";

const ENV_SOURCE: &str = "SALES_DASHBOARD_SOURCE";
const ENV_TIMEOUT: &str = "SALES_DASHBOARD_TIMEOUT_SECS";

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// JSON array served over HTTP(S).
    Http(String),
    /// Local JSON file with the same schema (see `generate_sample`).
    File(PathBuf),
}

impl DataSource {
    /// Interpret a user-supplied source string: URLs stay URLs, anything
    /// else is treated as a filesystem path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DataSource::Http(raw.to_string())
        } else {
            DataSource::File(PathBuf::from(raw))
        }
    }

    /// Human-readable name used in logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Http(url) => url.clone(),
            DataSource::File(path) => path.display().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub request_timeout: Duration,
    /// Initial value of the "top sellers" input.
    pub default_top_sellers: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Http(DEFAULT_SOURCE_URL.to_string()),
            request_timeout: Duration::from_secs(30),
            default_top_sellers: 5,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by `SALES_DASHBOARD_SOURCE` and
    /// `SALES_DASHBOARD_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SOURCE).filter(|s| !s.trim().is_empty()) {
            config.source = DataSource::parse(&raw);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => log::warn!("Ignoring invalid {ENV_TIMEOUT}={raw:?}"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_point_at_public_api() {
        let config = DashboardConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.source, DataSource::Http(DEFAULT_SOURCE_URL.to_string()));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.default_top_sellers, 5);
    }

    #[test]
    fn test_source_override_accepts_local_path() {
        let config = DashboardConfig::from_lookup(lookup_from(&[(ENV_SOURCE, "sample_sales.json")]));
        assert_eq!(config.source, DataSource::File(PathBuf::from("sample_sales.json")));
    }

    #[test]
    fn test_source_override_accepts_url() {
        let config =
            DashboardConfig::from_lookup(lookup_from(&[(ENV_SOURCE, " http://localhost:8000/x ")]));
        assert_eq!(config.source, DataSource::Http("http://localhost:8000/x".to_string()));
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let config = DashboardConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT, "soon")]));
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        let config = DashboardConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT, "5")]));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
