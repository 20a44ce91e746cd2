use serde::de::DeserializeOwned;
use thiserror::Error;

/// Decoded response payload: JSON when the content type says so, raw text
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    /// Deserialize a JSON body into a typed value.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ResponseBody::Json(value) => serde_json::from_value(value)
                .map_err(|err| ApiError::decode(err.to_string())),
            ResponseBody::Text(_) => Err(ApiError::decode("expected JSON, got text body")),
            ResponseBody::Empty => Err(ApiError::decode("expected JSON, got empty body")),
        }
    }
}

/// Failure taxonomy of the API client. `Timeout` and `Network` are
/// retryable; everything else terminates the call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("network failure: {message}")]
    Network { message: String },
    /// Authorization failed and the one refresh attempt this call is
    /// allowed has been used (or was impossible). The caller decides what
    /// to do with the user's session.
    #[error("session expired")]
    SessionExpired,
    #[error("http status {status}")]
    Http { status: u16, body: ResponseBody },
    #[error("failed to decode response: {message}")]
    Decode { message: String },
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Network { .. })
    }

    /// HTTP status carried by an `Http` error, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::invalid_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ApiError::Timeout.is_retryable());
        assert!(ApiError::network("connection reset").is_retryable());
        assert!(!ApiError::SessionExpired.is_retryable());
        assert!(
            !ApiError::Http {
                status: 500,
                body: ResponseBody::Empty
            }
            .is_retryable()
        );
    }

    #[test]
    fn typed_decoding_surfaces_decode_failure() {
        let body = ResponseBody::Json(serde_json::json!({"unexpected": true}));
        let result: Result<girder_api_types::TokenRefreshResponse, _> = body.into_json();
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }
}
