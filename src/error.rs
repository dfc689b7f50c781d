//! Error types for the search-box controller.

use thiserror::Error;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Errors that can occur while talking to the search backend.
///
/// None of these are fatal to the controller: the autocomplete path logs them
/// and the search path renders them into the status region.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned status {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ControllerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_status() {
        let err = ControllerError::Status(502);
        assert_eq!(err.to_string(), "Backend returned status 502");
    }

    #[test]
    fn test_error_display_parse() {
        let err = ControllerError::Parse("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Failed to parse response: invalid JSON");
    }

    #[test]
    fn test_error_display_other() {
        let err = ControllerError::Other("something went wrong".to_string());
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ControllerError = json_err.into();
        assert!(matches!(err, ControllerError::Parse(_)));
    }

    #[test]
    fn test_error_from_url_parse() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: ControllerError = url_err.into();
        assert!(err.to_string().starts_with("URL parsing error"));
    }
}
