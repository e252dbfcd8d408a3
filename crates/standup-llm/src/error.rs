//! Backend error types.

/// Convenience alias for backend results.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors surfaced by a text-generation backend.
///
/// The engine never retries internally; callers see these unchanged from
/// `summarize`/`summarize_and_score`, and rendered into a terminal `Failed`
/// event in the streaming form.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        message: String,
    },

    /// The endpoint answered 2xx but the payload was unusable.
    #[error("invalid backend response: {message}")]
    InvalidResponse {
        /// What was wrong with the payload.
        message: String,
    },

    /// The call exceeded its deadline.
    #[error("generation timed out after {elapsed_ms}ms")]
    Timeout {
        /// Milliseconds elapsed before the deadline fired.
        elapsed_ms: u64,
    },

    /// The backend could not be constructed or reached at all.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Reason the backend is unusable.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_renders_status_and_body() {
        let err = BackendError::Api {
            status: 503,
            message: "overloaded".into(),
        };
        assert_eq!(
            err.to_string(),
            "backend returned status 503: overloaded"
        );
    }

    #[test]
    fn timeout_renders_elapsed() {
        let err = BackendError::Timeout { elapsed_ms: 30_000 };
        assert_eq!(err.to_string(), "generation timed out after 30000ms");
    }
}
