//! The response envelope shared by every backend endpoint.

use serde::{Deserialize, Serialize};

/// Successful reply: `{ data, message, success, timestamp }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    pub message: String,
    pub success: bool,
    pub timestamp: String,
}

/// Failure reply sent alongside a non-2xx status. It has no `data`.
///
/// Some handlers name the text `error` instead of `message`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(alias = "error")]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}
