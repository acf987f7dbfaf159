//! Backend error types

/// Failure talking to the engine API
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Connection, TLS or body transfer failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Body is not a recognised engine response
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    /// API root could not be joined with an engine path
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// Check if the next poll may succeed without intervention
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Malformed { .. } | Self::InvalidUrl(_) => false,
        }
    }

    /// Check if the response arrived but could not be understood
    #[inline]
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        let err = BackendError::Status {
            status: 503,
            url: "http://x".into(),
        };
        assert!(err.is_retryable());
        let err = BackendError::Status {
            status: 404,
            url: "http://x".into(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_is_not_retryable() {
        let err = BackendError::Malformed {
            url: "http://x".into(),
            reason: "eof".into(),
        };
        assert!(err.is_malformed());
        assert!(!err.is_retryable());
    }
}
