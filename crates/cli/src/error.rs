//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

use portfolio_admin::AppError;
use portfolio_admin::i18n::Translator;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    /// A draft file could not be read.
    #[error("Could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A draft file is not a valid draft.
    #[error("Invalid draft in {path}: {source}")]
    Draft {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Standard input could not be read.
    #[error("Could not read input: {0}")]
    Input(std::io::Error),

    /// Output could not be encoded.
    #[error("Could not encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Backend error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::App(e) => e.code(),
            _ => None,
        }
    }

    /// Message for the admin, translated where the library knows how.
    pub fn user_message(&self, t: &Translator) -> String {
        match self {
            Self::App(e) => e.user_message(t),
            other => other.to_string(),
        }
    }
}

impl From<portfolio_admin::services::AuthError> for CliError {
    fn from(err: portfolio_admin::services::AuthError) -> Self {
        Self::App(err.into())
    }
}

impl From<portfolio_admin::gateway::GatewayError> for CliError {
    fn from(err: portfolio_admin::gateway::GatewayError) -> Self {
        Self::App(err.into())
    }
}
