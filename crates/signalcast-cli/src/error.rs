use thiserror::Error;

use crate::store::StoreError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] signalcast_core::ValidationError),

    #[error(transparent)]
    Config(#[from] signalcast_core::ConfigError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Exit code when the envelope carries classified acquisition errors.
    pub const ACQUISITION_EXIT_CODE: u8 = 3;

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::Config(_) => 7,
            Self::Store(_) => 10,
        }
    }
}
