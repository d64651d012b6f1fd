use std::collections::HashMap;
use std::time::Duration;

use roster_terminal::config::{Config, DEFAULT_API_BASE, DEFAULT_COHORT};

fn config_from(pairs: &[(&str, &str)]) -> Config {
    let vars = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_point_at_cohort_players() {
    let config = Config::default();
    assert_eq!(
        config.collection_url,
        format!("{DEFAULT_API_BASE}/{DEFAULT_COHORT}/players")
    );
    assert_eq!(config.timeout, Duration::from_secs(10));
}

#[test]
fn base_and_cohort_compose_url() {
    let config = config_from(&[
        ("ROSTER_API_BASE", "http://localhost:8080/api/"),
        ("ROSTER_COHORT", "2601-TEST"),
    ]);
    assert_eq!(
        config.collection_url,
        "http://localhost:8080/api/2601-TEST/players"
    );
}

#[test]
fn full_url_override_wins() {
    let config = config_from(&[
        ("ROSTER_API_URL", "http://mock.test/players/"),
        ("ROSTER_COHORT", "ignored"),
    ]);
    assert_eq!(config.collection_url, "http://mock.test/players");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = config_from(&[("ROSTER_API_URL", "  "), ("ROSTER_COHORT", "")]);
    assert_eq!(config, Config::default());
}

#[test]
fn timeout_is_parsed_and_clamped() {
    assert_eq!(
        config_from(&[("ROSTER_HTTP_TIMEOUT_SECS", "30")]).timeout,
        Duration::from_secs(30)
    );
    assert_eq!(
        config_from(&[("ROSTER_HTTP_TIMEOUT_SECS", "0")]).timeout,
        Duration::from_secs(1)
    );
    assert_eq!(
        config_from(&[("ROSTER_HTTP_TIMEOUT_SECS", "9999")]).timeout,
        Duration::from_secs(120)
    );
    assert_eq!(
        config_from(&[("ROSTER_HTTP_TIMEOUT_SECS", "soon")]).timeout,
        Duration::from_secs(10)
    );
}
