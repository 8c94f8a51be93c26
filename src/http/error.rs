use log::error;
use rouille::Response;
use serde::Serialize;

use crate::gateway::error::GatewayError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    BadGateway {
        message: String,
        details: Option<String>,
    },
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    /// keeps the given public message, logs the cause
    pub fn from_gateway(public: &str, err: GatewayError) -> Self {
        match err {
            GatewayError::Validation(msg) => ApiError::BadRequest(msg),
            GatewayError::Upstream { message, details } => ApiError::BadGateway { message, details },
            GatewayError::Internal(cause) => {
                error!("{public}: {cause:#}");
                ApiError::Internal(public.to_string())
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::BadGateway { .. } => 502,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => ErrorBody {
                error: msg,
                details: None,
            },
            ApiError::BadGateway { message, details } => ErrorBody {
                error: message,
                details: details.as_deref(),
            },
        };
        Response::json(&body).with_status_code(status)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::from_gateway("Internal server error", err)
    }
}
