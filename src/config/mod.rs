//! Configuration module for scrooge
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Application settings persistence
//! - The user's YAML budget configuration

pub mod paths;
pub mod settings;
pub mod user;

pub use paths::ScroogePaths;
pub use settings::Settings;
pub use user::UserConfig;
