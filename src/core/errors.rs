use http::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, timeout).
    Network(String),
    /// The server answered with a non-success status.
    Status { status: StatusCode, message: Option<String> },
    /// The response body did not have the expected shape.
    Decode(String),
    /// The in-flight request was abandoned by its owner.
    Cancelled,
}

impl ApiError {
    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message: Some(msg), .. } => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Status { status, message: Some(msg) } => {
                write!(f, "Server error {}: {}", status.as_u16(), msg)
            }
            ApiError::Status { status, message: None } => {
                write!(f, "Server error {}", status.as_u16())
            }
            ApiError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            ApiError::Cancelled => write!(f, "Request cancelled"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
