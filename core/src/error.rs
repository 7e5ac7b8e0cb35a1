//! Error types for the access layer.
//!
//! # Design
//! The taxonomy is closed: every failure a caller can observe is one of
//! `Transport`, `Parse` or `UnexpectedContent`. Transport-library errors are
//! converted at the transport boundary and never leak through the public API.

use thiserror::Error;

/// Errors returned by `RestClient` operations and the services built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The exchange failed: connection refused, DNS failure, timeout, or a
    /// non-2xx status. `status` is set whenever the server answered.
    #[error("{}", transport_message(*status, message))]
    Transport { status: Option<u16>, message: String },

    /// The body could not be decoded into the envelope or record shape, or
    /// the request body could not be encoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// An HTML page was served where JSON was expected.
    #[error("unexpected content: {0}")]
    UnexpectedContent(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

fn transport_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("server returned {code}: {message}"),
        None => format!("transport error: {message}"),
    }
}
