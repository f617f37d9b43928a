//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic shared by
//! everything that embeds the search (agents, benchmarks, tools).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`BLINDERS_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! BLINDERS_<SECTION>_<KEY>=value
//!
//! Examples:
//!     BLINDERS_COMMON_LOG_LEVEL=debug
//!     BLINDERS_MCTS_EXPLORATION_EPSILON=1.4
//!     BLINDERS_MCTS_ROLLOUT_POLICY=random
//!     BLINDERS_AGENT_TIME_BUDGET_MS=500
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
