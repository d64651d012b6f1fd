use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://fsa-puppy-bowl.herokuapp.com/api";
pub const DEFAULT_COHORT: &str = "2508-FTB-ET-WEB-FT";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub collection_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves settings through `lookup` so callers other than the process
    /// environment can feed values in.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let collection_url = match value("ROSTER_API_URL") {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let base =
                    value("ROSTER_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
                let cohort =
                    value("ROSTER_COHORT").unwrap_or_else(|| DEFAULT_COHORT.to_string());
                format!("{}/{}/players", base.trim_end_matches('/'), cohort)
            }
        };

        let timeout_secs = value("ROSTER_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);

        Self {
            collection_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
