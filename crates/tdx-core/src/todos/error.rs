use std::fmt;

/// Which todo operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Fetch,
    Create,
    Update,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::Fetch => write!(f, "fetch failed"),
            FetchErrorKind::Create => write!(f, "create failed"),
            FetchErrorKind::Update => write!(f, "update failed"),
        }
    }
}

/// Failure of a todo operation.
///
/// Displays only the short classification; `details` (status, body,
/// transport error) is kept for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub details: Option<String>,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind) -> Self {
        Self {
            kind,
            details: None,
        }
    }

    pub fn with_details(kind: FetchErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            details: Some(details.into()),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(kind: FetchErrorKind, status: u16, body: &str) -> Self {
        if body.is_empty() {
            Self::with_details(kind, format!("HTTP {status}"))
        } else {
            Self::with_details(kind, format!("HTTP {status}: {body}"))
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_hides_details() {
        let err = FetchError::http_status(FetchErrorKind::Update, 500, "boom");
        assert_eq!(err.to_string(), "update failed");
        assert_eq!(err.details.as_deref(), Some("HTTP 500: boom"));
        assert_eq!(FetchError::new(FetchErrorKind::Fetch).to_string(), "fetch failed");
    }
}
