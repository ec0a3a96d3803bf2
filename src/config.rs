use std::env;
use std::str::FromStr;

use crate::models::AvailabilityTable;
use crate::services::ai::openai::DEFAULT_BASE_URL;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_timeout_secs: u64,
    pub static_dir: String,
    pub default_caller: String,
    pub thinking_delay_ms: u64,
    pub availability: AvailabilityTable,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            openai_api_key: lookup("OPENAI_API_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            openai_model: lookup("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llm_timeout_secs: parse_var(&lookup, "LLM_TIMEOUT_SECS").unwrap_or(defaults.llm_timeout_secs),
            static_dir: lookup("STATIC_DIR").unwrap_or(defaults.static_dir),
            default_caller: lookup("DEFAULT_CALLER").unwrap_or(defaults.default_caller),
            thinking_delay_ms: parse_var(&lookup, "THINKING_DELAY_MS").unwrap_or(defaults.thinking_delay_ms),
            availability: lookup("AVAILABILITY_JSON")
                .and_then(|json| match AvailabilityTable::from_json(&json) {
                    Ok(table) => Some(table),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring invalid AVAILABILITY_JSON");
                        None
                    }
                })
                .unwrap_or(defaults.availability),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            openai_api_key: None,
            openai_model: "gpt-4".to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            llm_timeout_secs: 30,
            static_dir: "public".to_string(),
            default_caller: "web-user".to_string(),
            thinking_delay_ms: 0,
            availability: AvailabilityTable::reference(),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %value, "ignoring unparseable value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.port, 3000);
        assert!(cfg.openai_api_key.is_none());
        assert_eq!(cfg.openai_model, "gpt-4");
        assert_eq!(cfg.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.llm_timeout_secs, 30);
        assert_eq!(cfg.default_caller, "web-user");
        assert_eq!(cfg.thinking_delay_ms, 0);
        assert_eq!(cfg.availability, AvailabilityTable::reference());
    }

    #[test]
    fn test_values_read_from_lookup() {
        let cfg = config(&[
            ("PORT", " 8080 "),
            ("OPENAI_API_KEY", "  sk-test "),
            ("OPENAI_MODEL", "gpt-4o"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("DEFAULT_CALLER", "kiosk"),
            ("THINKING_DELAY_MS", "250"),
        ]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.openai_model, "gpt-4o");
        assert_eq!(cfg.llm_timeout_secs, 5);
        assert_eq!(cfg.default_caller, "kiosk");
        assert_eq!(cfg.thinking_delay_ms, 250);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        assert!(config(&[("OPENAI_API_KEY", "")]).openai_api_key.is_none());
        assert!(config(&[("OPENAI_API_KEY", "   \t")]).openai_api_key.is_none());
    }

    #[test]
    fn test_unparseable_numbers_use_defaults() {
        let cfg = config(&[
            ("PORT", "eighty"),
            ("LLM_TIMEOUT_SECS", "-1"),
            ("THINKING_DELAY_MS", "soon"),
        ]);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.llm_timeout_secs, 30);
        assert_eq!(cfg.thinking_delay_ms, 0);

        assert_eq!(config(&[("PORT", "70000")]).port, 3000);
    }

    #[test]
    fn test_invalid_availability_uses_reference() {
        for json in [
            "not json",
            r#"{"days":[{"day":"someday","slots":["9:00 AM"]}]}"#,
            r#"{"days":[{"day":"monday","slots":[]}]}"#,
        ] {
            let cfg = config(&[("AVAILABILITY_JSON", json)]);
            assert_eq!(cfg.availability, AvailabilityTable::reference(), "{json}");
        }
    }

    #[test]
    fn test_valid_availability_override() {
        let cfg = config(&[(
            "AVAILABILITY_JSON",
            r#"{"days":[{"day":"Saturday","slots":["9:00 AM","11:00 AM"]}]}"#,
        )]);
        assert_eq!(cfg.availability.days.len(), 1);
        assert_eq!(
            cfg.availability.slots_for("saturday").unwrap(),
            ["9:00 AM".to_string(), "11:00 AM".to_string()]
        );
    }
}
