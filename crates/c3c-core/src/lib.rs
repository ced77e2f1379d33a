//! # c3c-core
//!
//! Core library for the C3C updater providing:
//! - Runtime configuration types (network, GitHub source, external tools)
//! - Hierarchical configuration loading (embedded defaults, user file, env)
//! - Shared error types

pub mod config;
pub mod error;
pub mod types;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use types::UpdaterConfig;
