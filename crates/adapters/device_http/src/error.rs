//! Device API adapter error types.

use irrigator_domain::error::IrrigatorError;

/// Errors specific to the device API adapter.
#[derive(Debug, thiserror::Error)]
pub enum DeviceApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never got a response (refused, timed out, …).
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON we expected.
    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl DeviceApiError {
    /// Convert into an [`IrrigatorError::Transport`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> IrrigatorError {
        IrrigatorError::Transport(Box::new(self))
    }
}

impl From<DeviceApiError> for IrrigatorError {
    fn from(err: DeviceApiError) -> Self {
        err.into_domain()
    }
}
