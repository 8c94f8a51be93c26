use thiserror::Error;

/// Everything a gateway operation can fail with. No variant is retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// required input missing or unreadable
    #[error("{0}")]
    Validation(String),

    /// a third-party service failed or answered with a non-success status
    #[error("{message}")]
    Upstream {
        message: String,
        /// raw upstream body, when there was one
        details: Option<String>,
    },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    pub fn upstream(message: impl Into<String>) -> Self {
        GatewayError::Upstream {
            message: message.into(),
            details: None,
        }
    }
}
