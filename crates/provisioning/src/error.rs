//! Provisioning error model.

use thiserror::Error;

/// Failure of a remote identity provisioning call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    /// The call did not complete within the configured deadline.
    #[error("provisioning call timed out")]
    Timeout,

    /// The service rejected the request (e.g. bind value already
    /// registered on sign-up).
    #[error("provisioning rejected: {0}")]
    Rejected(String),

    /// The service answered with an unexpected status.
    #[error("provisioning remote error (status {status}): {message}")]
    Remote { status: u16, message: String },

    /// Transport-level failure (connect, TLS, decode).
    #[error("provisioning transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProvisioningError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProvisioningError::Timeout
        } else {
            ProvisioningError::Transport(err.to_string())
        }
    }
}
