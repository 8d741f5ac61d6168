// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::KindredConfig;

/// Upper bound on events embedded in one insight prompt.
const MAX_EVENT_LIMIT: u32 = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &KindredConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if let Some(token) = &config.server.bearer_token
        && token.trim().is_empty()
    {
        fail("server.bearer_token must not be empty when set".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.anthropic.model.trim().is_empty() {
        fail("anthropic.model must not be empty".to_string());
    }

    if config.anthropic.max_tokens == 0 {
        fail("anthropic.max_tokens must be greater than 0".to_string());
    }

    if config.anthropic.timeout_secs == 0 {
        fail("anthropic.timeout_secs must be greater than 0".to_string());
    }

    if !(1..=MAX_EVENT_LIMIT).contains(&config.insight.event_limit) {
        fail(format!(
            "insight.event_limit must be between 1 and {MAX_EVENT_LIMIT}, got {}",
            config.insight.event_limit
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&KindredConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = KindredConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn bad_host_fails_validation() {
        let mut config = KindredConfig::default();
        config.server.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "server.host"));
    }

    #[test]
    fn zero_event_limit_fails_validation() {
        let mut config = KindredConfig::default();
        config.insight.event_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "event_limit"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = KindredConfig::default();
        config.anthropic.model = String::new();
        config.anthropic.max_tokens = 0;
        config.server.bearer_token = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn ephemeral_port_is_allowed() {
        let mut config = KindredConfig::default();
        config.server.port = 0;
        config.server.host = "0.0.0.0".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
