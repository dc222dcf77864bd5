use thiserror::Error;

/// Errors surfaced by subscription operations against the remote service.
///
/// The categories are deliberately coarse so callers can tell apart "local
/// configuration is unusable" from "service unreachable or rejected the
/// request" from "service reachable but returned garbage".
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Missing or invalid local configuration (unknown auth scheme, absent
    /// required field). Surfaced before any network call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote service was unreachable, rejected the request with a
    /// non-success status, or returned a success response with nothing
    /// usable in it.
    #[error("remote service error: {0}")]
    Remote(String),

    /// The response body could not be parsed as the expected structure.
    #[error("response decode error: {0}")]
    Decode(String),
}

/// Errors from the host-provided storage medium backing the persisted
/// per-instance record.
#[derive(Debug, Error)]
pub enum StateError {
    /// The storage medium failed to read or write the record.
    #[error("state storage error: {0}")]
    Storage(String),

    /// The stored record could not be serialized or deserialized.
    #[error("state serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_error_display() {
        let err = SubscriptionError::Configuration("unsupported auth scheme 'oauth2'".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: unsupported auth scheme 'oauth2'"
        );

        let err = SubscriptionError::Remote("HTTP 503".to_string());
        assert_eq!(err.to_string(), "remote service error: HTTP 503");
    }

    #[test]
    fn state_error_display() {
        let err = StateError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "state storage error: disk full");
    }
}
