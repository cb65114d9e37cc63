use std::fmt;

/// Failure talking to the remote insights backend
#[derive(Debug)]
pub enum RemoteError {
    Request(String),
    Status(u16, String),
    NonJsonResponse(String),
    Parse(String),
    Timeout(u64),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RemoteError::Request(msg) => write!(f, "Request error: {}", msg),
            RemoteError::Status(code, preview) => write!(f, "HTTP {}: {}", code, preview),
            RemoteError::NonJsonResponse(preview) => write!(f, "Non-JSON response: {}", preview),
            RemoteError::Parse(msg) => write!(f, "Parse error: {}", msg),
            RemoteError::Timeout(ms) => write!(f, "Timed out after {}ms", ms),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Parse(err.to_string())
    }
}
