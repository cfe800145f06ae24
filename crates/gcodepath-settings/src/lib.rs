//! gcodepath Settings Crate
//!
//! Handles configuration loading, saving and validation.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings, MAX_DECIMALS};
pub use error::{SettingsError, SettingsResult};
