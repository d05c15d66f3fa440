//! Configuration management.
//!
//! Settings live in one TOML file with a table per concern (`[paths]`,
//! `[logging]`, `[assembly]`, `[denoise]`). Components never read settings
//! directly; they take the config values produced by
//! [`Settings::to_assembly_config`] and [`Settings::to_denoise_config`].
//!
//! # Example
//!
//! ```no_run
//! use dub_core::config::{ConfigManager, ConfigSection};
//! use dub_core::models::AssemblyMode;
//!
//! let mut config = ConfigManager::new(".config/dub.toml");
//! config.load_or_create().unwrap();
//!
//! config.settings_mut().assembly.mode = AssemblyMode::Sequential;
//! config.update_section(ConfigSection::Assembly).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AssemblySettings, ConfigSection, DenoiseSettings, LoggingSettings, PathSettings, Settings,
};
