use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config/arena.toml";

/// Top-level configuration for the arena client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "ApiConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ApiConfig {
    fn default_base_url() -> String {
        "http://localhost:8080".into()
    }

    const fn default_timeout_ms() -> u64 {
        10_000
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Matches the one-second granularity of the countdown display.
    #[serde(default = "ClockConfig::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl ClockConfig {
    const fn default_tick_interval_ms() -> u64 {
        1_000
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Self::default_tick_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding the bearer token issued by the identity provider.
    #[serde(default = "AuthConfig::default_token_env")]
    pub token_env: String,
    /// Display identity for the signed-in user; informational only.
    #[serde(default = "AuthConfig::default_user")]
    pub user: String,
}

impl AuthConfig {
    fn default_token_env() -> String {
        "ARENA_TOKEN".into()
    }

    fn default_user() -> String {
        "cli".into()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: Self::default_token_env(),
            user: Self::default_user(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from ARENA_CONFIG or `config/arena.toml`, then apply
    /// ARENA_API_BASE_URL and ARENA_LOG_LEVEL overrides. A missing default
    /// file yields the built-in defaults; a missing ARENA_CONFIG target is an error.
    pub fn load_from_env() -> Result<Self> {
        let mut cfg = match std::env::var("ARENA_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH)?,
            Err(_) => Self::default(),
        };
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from a specific file (TOML or JSON based on extension).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let data = fs::read_to_string(path_ref)
            .with_context(|| format!("unable to read config {}", path_ref.display()))?;
        if is_json(path_ref) {
            Ok(serde_json::from_str(&data)
                .with_context(|| format!("invalid JSON config {}", path_ref.display()))?)
        } else {
            Ok(toml::from_str(&data)
                .with_context(|| format!("invalid TOML config {}", path_ref.display()))?)
        }
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            bail!("api.base_url must be an http(s) URL, got {base:?}");
        }
        if self.api.timeout_ms == 0 {
            bail!("api.timeout_ms must be > 0");
        }
        if self.clock.tick_interval_ms == 0 {
            bail!("clock.tick_interval_ms must be > 0");
        }
        if self.auth.token_env.is_empty() {
            bail!("auth.token_env must be non-empty");
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("ARENA_API_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(level) = std::env::var("ARENA_LOG_LEVEL") {
            self.telemetry.log_level = Some(level);
        }
    }
}

fn is_json(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:8080");
        assert_eq!(cfg.clock.tick_interval(), Duration::from_secs(1));
        assert_eq!(cfg.auth.token_env, "ARENA_TOKEN");
        assert!(cfg.telemetry.log_level.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn loads_toml_and_json_by_extension() {
        let dir = tempdir().unwrap();
        let toml_path = dir.path().join("arena.toml");
        fs::write(
            &toml_path,
            "[api]\nbase_url = \"https://contests.example\"\n\n[clock]\ntick_interval_ms = 250\n",
        )
        .unwrap();
        let cfg = Config::load(&toml_path).unwrap();
        assert_eq!(cfg.api.base_url, "https://contests.example");
        assert_eq!(cfg.clock.tick_interval_ms, 250);
        assert_eq!(cfg.api.timeout_ms, 10_000);

        let json_path = dir.path().join("arena.json");
        fs::write(&json_path, r#"{"telemetry":{"log_level":"debug"}}"#).unwrap();
        let cfg = Config::load(&json_path).unwrap();
        assert_eq!(cfg.telemetry.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn validation_rejects_zero_interval_and_bad_scheme() {
        let mut cfg = Config::default();
        cfg.clock.tick_interval_ms = 0;
        let err = cfg.validate().unwrap_err();
        assert!(format!("{err:?}").contains("tick_interval_ms"));

        let mut cfg = Config::default();
        cfg.api.base_url = "ftp://contests".into();
        let err = cfg.validate().unwrap_err();
        assert!(format!("{err:?}").contains("http(s)"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{err:?}").contains("invalid TOML config"));
    }

    #[test]
    fn env_override_replaces_base_url() {
        let mut cfg = Config::default();
        std::env::set_var("ARENA_API_BASE_URL", "https://override.example");
        cfg.apply_env_overrides();
        std::env::remove_var("ARENA_API_BASE_URL");
        assert_eq!(cfg.api.base_url, "https://override.example");
    }
}
