//! On-disk tracker configuration
//!
//! Host applications usually configure the tracker in code at startup;
//! this module persists the same settings between runs (site ID, identity
//! slots, and any standing global fields) through `confy`.

mod error;

#[cfg(test)]
mod config_tests;

pub use error::ConfigError;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::fields::FieldValue;

const APP_NAME: &str = "pagepulse";
const CONFIG_NAME: &str = "tracker";

/// Tracker settings persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub site_id: Option<String>,
    pub session_id: Option<String>,
    pub global_user_id: Option<String>,

    /// Standing global fields applied to every submission.
    #[serde(default)]
    pub global_fields: HashMap<String, FieldValue>,
}

impl TrackerConfig {
    /// Load from the platform configuration directory (defaults if the
    /// file does not exist yet).
    pub fn load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::from)
    }

    /// Persist to the platform configuration directory.
    pub fn store(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }
}
