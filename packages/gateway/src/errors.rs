use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("unauthorized")]
    Unauthorized,
    #[error("json error: {0}")]
    Serde(String),
    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayError {
    /// Returns true if the error is transient and should be retried.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout | Self::RateLimited => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert!(GatewayError::Timeout.should_retry());
        assert!(GatewayError::Transport("reset".into()).should_retry());
        assert!(GatewayError::Http { status: 503, body: String::new() }.should_retry());
        assert!(!GatewayError::Http { status: 404, body: String::new() }.should_retry());
        assert!(!GatewayError::Unauthorized.should_retry());
        assert!(!GatewayError::Serde("bad".into()).should_retry());
    }
}
