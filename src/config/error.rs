//! Error types for configuration operations

use thiserror::Error;

/// Errors during configuration load/store
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load tracker configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save tracker configuration")]
    Save(#[source] confy::ConfyError),
}
