//! Configuration for quarry.
//!
//! Handles the settings file, profile overrides and server metadata taken
//! from environment variables.

mod connection;
mod settings;

pub use connection::{probe_from_env, probe_from_vars, ConnectionError};
pub use settings::{expand_env_vars, DialectSettings, ProfileOverrides, Settings, SettingsError};
