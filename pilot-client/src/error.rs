//! Control-plane client errors

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of a single control-plane call
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received
    #[error("request to control plane failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The control plane answered with a non-2xx status
    #[error("control plane returned status {status}: {message}")]
    ApiError { status: u16, message: String },

    /// The response body did not decode into the expected document
    #[error("unexpected response body: {0}")]
    ParseError(String),

    /// The configured address cannot carry an API path
    #[error("invalid control plane address \"{address}\": {reason}")]
    InvalidAddress { address: String, reason: String },
}

impl ClientError {
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// The requested object does not exist on the control plane
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_404_is_not_found() {
        assert!(ClientError::api_error(404, "job not found").is_not_found());
        assert!(!ClientError::api_error(409, "index mismatch").is_not_found());
        assert!(!ClientError::ParseError("eof".to_string()).is_not_found());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ClientError::api_error(500, "no leader").to_string(),
            "control plane returned status 500: no leader"
        );
        let err = ClientError::InvalidAddress {
            address: "unix:sock".to_string(),
            reason: "cannot be a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid control plane address \"unix:sock\": cannot be a base"
        );
    }
}
