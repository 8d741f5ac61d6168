// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./kindred.toml` > `~/.config/kindred/kindred.toml` > `/etc/kindred/kindred.toml`
//! with environment variable overrides via `KINDRED_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::KindredConfig;

/// Config sections that `KINDRED_<SECTION>_<KEY>` variables map into.
const ENV_SECTIONS: &[&str] = &["server", "storage", "anthropic", "insight"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/kindred/kindred.toml` (system-wide)
/// 3. `~/.config/kindred/kindred.toml` (user XDG config)
/// 4. `./kindred.toml` (local directory)
/// 5. `KINDRED_*` environment variables
pub fn load_config() -> Result<KindredConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<KindredConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KindredConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KindredConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KindredConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KindredConfig::default()))
        .merge(Toml::file("/etc/kindred/kindred.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("kindred/kindred.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("kindred.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `KINDRED_ANTHROPIC_API_KEY` must map to `anthropic.api_key`,
/// not `anthropic.api.key`.
fn env_provider() -> Env {
    Env::prefixed("KINDRED_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env var name to a dotted, lowercase config path.
///
/// Figment hands the key over in its original case (`SERVER_PORT`).
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
        {
            return format!("{section}.{field}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("ANTHROPIC_API_KEY"), "anthropic.api_key");
        assert_eq!(map_env_key("SERVER_BEARER_TOKEN"), "server.bearer_token");
        assert_eq!(map_env_key("STORAGE_DATABASE_PATH"), "storage.database_path");
        assert_eq!(map_env_key("INSIGHT_EVENT_LIMIT"), "insight.event_limit");
        assert_eq!(map_env_key("server_port"), "server.port");
    }

    #[test]
    fn top_level_keys_pass_through() {
        assert_eq!(map_env_key("LOG_LEVEL"), "log_level");
    }

    #[test]
    fn section_env_vars_reach_the_standard_loader() {
        figment::Jail::expect_with(|jail| {
            let config_home = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", config_home);
            jail.set_env("KINDRED_SERVER_PORT", "5000");
            jail.set_env("KINDRED_SERVER_BEARER_TOKEN", "secret");
            jail.set_env("KINDRED_INSIGHT_EVENT_LIMIT", "25");
            jail.set_env("KINDRED_LOG_LEVEL", "debug");

            let config = load_config()?;
            assert_eq!(config.server.port, 5000);
            assert_eq!(config.server.bearer_token.as_deref(), Some("secret"));
            assert_eq!(config.insight.event_limit, 25);
            assert_eq!(config.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[server]
port = 4000
"#,
            )?;
            jail.set_env("KINDRED_SERVER_PORT", "5000");
            jail.set_env("KINDRED_ANTHROPIC_API_KEY", "sk-from-env");

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.server.port, 5000);
            assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-from-env"));
            Ok(())
        });
    }
}
