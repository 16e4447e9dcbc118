//! Per-request caller context

/// Session used when the caller sends none
pub const DEFAULT_SESSION_ID: &str = "1";

/// Who issued a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Opaque session identifier grouping audit records
    pub session_id: String,
    /// Caller address as seen by the server
    pub session_ip: String,
}

impl CallerContext {
    /// Builds a context; an absent or empty session falls back to the default
    pub fn new(session_id: Option<&str>, session_ip: impl Into<String>) -> Self {
        let session_id = session_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID);
        Self {
            session_id: session_id.to_string(),
            session_ip: session_ip.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        assert_eq!(CallerContext::new(None, "::1").session_id, "1");
        assert_eq!(CallerContext::new(Some(""), "::1").session_id, "1");
        assert_eq!(CallerContext::new(Some("abc"), "::1").session_id, "abc");
    }
}
