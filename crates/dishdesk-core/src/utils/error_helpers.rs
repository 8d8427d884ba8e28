use crate::error::ApiError;

/// Helper functions for standardizing reqwest error conversions.
/// Convert reqwest errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            timeout_secs,
            endpoint: endpoint.to_string(),
        }
    } else if error.is_connect() || error.is_request() {
        ApiError::Network {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        }
    } else {
        ApiError::Http {
            status: error.status().map(|s| s.as_u16()).unwrap_or(0),
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        }
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: impl std::fmt::Display, endpoint: &str) -> ApiError {
    ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}
