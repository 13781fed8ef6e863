//! Application-level configuration loading, including the scoring weights table.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CAGESIDE_BACK_CONFIG_PATH";

const DEFAULT_WINNER_POINTS: u32 = 3;
const DEFAULT_METHOD_POINTS: u32 = 1;
const DEFAULT_ROUND_POINTS: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Points awarded for each correct component of a pick.
///
/// Method and round points are only granted when the predicted winner is also
/// correct; a method cannot be judged right when the wrong fighter was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Points for picking the winning fighter.
    pub winner: u32,
    /// Points for picking the finishing method, winner permitting.
    pub method: u32,
    /// Points for picking the finishing round, winner permitting.
    pub round: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            winner: DEFAULT_WINNER_POINTS,
            method: DEFAULT_METHOD_POINTS,
            round: DEFAULT_ROUND_POINTS,
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    scoring: ScoringWeights,
    default_page_size: u32,
    max_page_size: u32,
    token_ttl: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration file");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// The point weights used when scoring picks against posted results.
    pub fn scoring(&self) -> ScoringWeights {
        self.scoring
    }

    /// Page size applied when a listing request does not ask for one.
    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Clamp a requested page size into the allowed range.
    pub fn clamp_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }

    /// Lifetime of issued bearer tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringWeights::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    scoring: Option<RawScoring>,
    #[serde(default)]
    default_page_size: Option<u32>,
    #[serde(default)]
    max_page_size: Option<u32>,
    #[serde(default)]
    token_ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of the scoring weights table.
struct RawScoring {
    winner_points: Option<u32>,
    method_points: Option<u32>,
    round_points: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        let scoring = raw
            .scoring
            .map(|weights| ScoringWeights {
                winner: weights.winner_points.unwrap_or(DEFAULT_WINNER_POINTS),
                method: weights.method_points.unwrap_or(DEFAULT_METHOD_POINTS),
                round: weights.round_points.unwrap_or(DEFAULT_ROUND_POINTS),
            })
            .unwrap_or_default();

        Self {
            scoring,
            default_page_size: raw.default_page_size.unwrap_or(defaults.default_page_size),
            max_page_size: raw.max_page_size.unwrap_or(defaults.max_page_size),
            token_ttl: raw
                .token_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.token_ttl),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_point_rules() {
        let config = AppConfig::default();
        assert_eq!(config.scoring().winner, 3);
        assert_eq!(config.scoring().method, 1);
        assert_eq!(config.scoring().round, 1);
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_fields() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"scoring": {"winner_points": 5}, "default_page_size": 10}"#)
                .unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.scoring().winner, 5);
        assert_eq!(config.scoring().method, 1);
        assert_eq!(config.default_page_size(), 10);
        assert_eq!(config.token_ttl(), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn page_size_is_clamped_into_the_allowed_range() {
        let config = AppConfig::default();
        assert_eq!(config.clamp_page_size(None), 20);
        assert_eq!(config.clamp_page_size(Some(0)), 1);
        assert_eq!(config.clamp_page_size(Some(500)), 100);
        assert_eq!(config.clamp_page_size(Some(42)), 42);
    }
}
