//! Type definitions shared across the updater crates

mod runtime_config;

pub use runtime_config::{
    GitHubConfig, NetworkConfig, ResolutionConfig, TagOrder, ToolsConfig, UpdaterConfig,
};
