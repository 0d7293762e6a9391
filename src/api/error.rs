use thiserror::Error;

/// Client-side error taxonomy for backend calls.
///
/// No variant is fatal: every failure returns the caller to its pre-action
/// state and interaction stays enabled. There are no automatic retries.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Failed a local precondition; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response from the backend. `message` is extracted from the
    /// error body when one is present.
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Backend { status: u16, message: Option<String> },

    /// Network failure or malformed response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Failed to read or write the persisted session.
    #[error("session storage: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_displays_extracted_message() {
        let err = ApiError::Backend {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn backend_error_without_body_message_falls_back() {
        let err = ApiError::Backend { status: 500, message: None };
        assert_eq!(err.to_string(), "request failed");
        assert!(!err.is_unauthorized());
    }
}
