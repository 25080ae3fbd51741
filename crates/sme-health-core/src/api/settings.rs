use std::collections::HashMap;

use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment-driven configuration for the backend client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the backend, default `http://localhost:8000`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Offer report downloads for every locale instead of English only.
    pub report_all_locales: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            report_all_locales: false,
        }
    }
}

impl BackendSettings {
    const BASE_URL_ENV: &'static str = "SME_HEALTH_BASE_URL";
    const TIMEOUT_ENV: &'static str = "SME_HEALTH_TIMEOUT_SECS";
    const REPORT_LOCALES_ENV: &'static str = "SME_HEALTH_REPORT_ALL_LOCALES";

    /// Load settings from environment variables.
    ///
    /// * `SME_HEALTH_BASE_URL` — Backend base URL (default `http://localhost:8000`).
    /// * `SME_HEALTH_TIMEOUT_SECS` — Request timeout in seconds (default 30).
    /// * `SME_HEALTH_REPORT_ALL_LOCALES` — Offer report downloads in every language.
    pub fn from_env() -> Self {
        Self::from_map(std::env::vars().collect())
    }

    fn from_map(vars: HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let base_url = vars
            .get(Self::BASE_URL_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.base_url);
        let timeout_secs = vars
            .get(Self::TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.timeout_secs);
        let report_all_locales = vars
            .get(Self::REPORT_LOCALES_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.report_all_locales);

        Self {
            base_url,
            timeout_secs,
            report_all_locales,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn with_env_lock<F: FnOnce()>(func: F) {
        let _guard = ENV_LOCK.lock().unwrap();
        func();
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        with_env_lock(|| {
            env::remove_var(BackendSettings::BASE_URL_ENV);
            env::remove_var(BackendSettings::TIMEOUT_ENV);
            env::remove_var(BackendSettings::REPORT_LOCALES_ENV);

            let settings = BackendSettings::from_env();
            assert_eq!(settings.base_url, "http://localhost:8000");
            assert_eq!(settings.timeout_secs, 30);
            assert!(!settings.report_all_locales);
        });
    }

    #[test]
    fn environment_overrides_defaults() {
        with_env_lock(|| {
            env::set_var(BackendSettings::BASE_URL_ENV, "http://backend:9000/");
            env::set_var(BackendSettings::TIMEOUT_ENV, "5");
            env::set_var(BackendSettings::REPORT_LOCALES_ENV, "true");

            let settings = BackendSettings::from_env();
            assert_eq!(settings.base_url, "http://backend:9000/");
            assert_eq!(settings.timeout_secs, 5);
            assert!(settings.report_all_locales);

            env::remove_var(BackendSettings::BASE_URL_ENV);
            env::remove_var(BackendSettings::TIMEOUT_ENV);
            env::remove_var(BackendSettings::REPORT_LOCALES_ENV);
        });
    }

    #[test]
    fn blank_and_unparseable_values_fall_back() {
        with_env_lock(|| {
            env::set_var(BackendSettings::BASE_URL_ENV, "  ");
            env::set_var(BackendSettings::TIMEOUT_ENV, "soon");
            env::set_var(BackendSettings::REPORT_LOCALES_ENV, "0");

            let settings = BackendSettings::from_env();
            assert_eq!(settings.base_url, "http://localhost:8000");
            assert_eq!(settings.timeout_secs, 30);
            assert!(!settings.report_all_locales);

            env::remove_var(BackendSettings::BASE_URL_ENV);
            env::remove_var(BackendSettings::TIMEOUT_ENV);
            env::remove_var(BackendSettings::REPORT_LOCALES_ENV);
        });
    }

    #[test]
    fn deserializes_from_partial_config_table() {
        let settings: BackendSettings =
            serde_json::from_str(r#"{ "base_url": "http://api.internal:8000" }"#).unwrap();
        assert_eq!(settings.base_url, "http://api.internal:8000");
        assert_eq!(settings.timeout_secs, 30);
    }
}
