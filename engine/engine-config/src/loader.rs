//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from subdirectory)
    "/app/config.toml", // Docker container
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by BLINDERS_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
/// 4. Docker container path (/app/config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("BLINDERS_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from BLINDERS_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "BLINDERS_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files fall back to the built-in defaults with a
/// warning; environment overrides are applied either way.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field (Option<u32>, Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: BLINDERS_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "BLINDERS_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.exploration_epsilon,
        "BLINDERS_MCTS_EXPLORATION_EPSILON",
        parse
    );
    env_override!(
        config,
        mcts.decision_epsilon,
        "BLINDERS_MCTS_DECISION_EPSILON",
        parse
    );
    env_override!(
        config,
        mcts.unbounded_rollouts,
        "BLINDERS_MCTS_UNBOUNDED_ROLLOUTS",
        parse
    );
    // An explicit depth bounds rollouts again
    if let Ok(v) = std::env::var("BLINDERS_MCTS_MAX_ROLLOUT_DEPTH")
        .and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
    {
        config.mcts.max_rollout_depth = Some(v);
        config.mcts.unbounded_rollouts = false;
    }
    env_override!(config, mcts.rollout_policy, "BLINDERS_MCTS_ROLLOUT_POLICY");
    env_override!(config, mcts.win_variants, "BLINDERS_MCTS_WIN_VARIANTS");
    env_override!(config, mcts.seed, "BLINDERS_MCTS_SEED", optional_parse);

    // Agent budgets are mutually exclusive, so overriding one clears the other
    if let Ok(v) = std::env::var("BLINDERS_AGENT_TIME_BUDGET_MS")
        .and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
    {
        config.agent.time_budget_ms = Some(v);
        config.agent.iterations = None;
    }
    if let Ok(v) = std::env::var("BLINDERS_AGENT_ITERATIONS")
        .and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
    {
        config.agent.iterations = Some(v);
        config.agent.time_budget_ms = None;
    }

    config
}
