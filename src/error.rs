//! # View Error Types
//!
//! Errors raised by the view facade. Engine and listener failures are carried
//! through unmodified so callers can inspect the original cause.

use thiserror::Error;
use viewkit_events::DispatchError;
use viewkit_templating::{EngineError, HelperError};

use crate::config::ConfigError;

/// View operation result type
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors raised by [`View`](crate::View) operations.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("{type_name} does not satisfy the helper contract: {reason}")]
    InvalidHelper {
        type_name: String,
        reason: String,
    },

    #[error("Undefined helper \"{name}\"")]
    UndefinedHelper { name: String },

    #[error("helper \"{name}\" failed: {source}")]
    Helper {
        name: String,
        source: HelperError,
    },

    #[error(transparent)]
    Listener(#[from] DispatchError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ViewError {
    /// Create an invalid helper registration error.
    pub fn invalid_helper(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHelper {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an undefined helper error.
    pub fn undefined_helper(name: impl Into<String>) -> Self {
        Self::UndefinedHelper { name: name.into() }
    }

    /// Whether the error is a programming mistake in helper registration or use.
    #[must_use]
    pub fn is_helper_misuse(&self) -> bool {
        matches!(
            self,
            ViewError::InvalidHelper { .. } | ViewError::UndefinedHelper { .. }
        )
    }
}
