//! Engine and helper error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or rendering templates.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no engine supports template '{0}'")]
    Unsupported(String),

    #[error("template not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("template load error in '{template}': {source}")]
    Load {
        template: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("render error for '{template}': {source}")]
    Render {
        template: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EngineError {
    /// Wrap a template-language error raised while parsing `template`.
    pub fn load(
        template: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Load {
            template: template.into(),
            source: source.into(),
        }
    }

    /// Wrap a template-language error raised while rendering `template`.
    pub fn render(
        template: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Render {
            template: template.into(),
            source: source.into(),
        }
    }
}

/// Errors raised by a helper invocation.
#[derive(Debug, Error)]
pub enum HelperError {
    #[error("invalid argument at position {position}: {reason}")]
    InvalidArgument { position: usize, reason: String },

    #[error("{0}")]
    Failed(String),
}

impl HelperError {
    /// Reject the positional argument at `position`.
    pub fn invalid_argument(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            position,
            reason: reason.into(),
        }
    }

    /// Report a helper failure unrelated to a specific argument.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
