use http::StatusCode;
use std::fmt;
use std::time::Duration;

/// Why a request attempt did not count as a success.
///
/// Every failed attempt is attributed to exactly one kind; these are the
/// keys of the report's failure breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No complete response within the configured per-request timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// A response arrived, but with a 4xx/5xx status.
    Http(u16),
    /// Transport-level failure that fits none of the above.
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Connect => write!(f, "connect"),
            FailureKind::Http(status) => write!(f, "http {}", status),
            FailureKind::Other => write!(f, "other"),
        }
    }
}

/// Result of one request attempt: how long it took, and whether it failed.
///
/// Failures are data, never errors; a bad request can't abort a run.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    latency: Duration,
    failure: Option<FailureKind>,
}

impl Outcome {
    pub fn success(latency: Duration) -> Outcome {
        Outcome {
            latency,
            failure: None,
        }
    }

    pub fn failure(kind: FailureKind, latency: Duration) -> Outcome {
        Outcome {
            latency,
            failure: Some(kind),
        }
    }

    /// Classify a completed response by status: 2xx/3xx succeed, 4xx/5xx
    /// count as `Http` failures.
    pub fn from_status(status: StatusCode, latency: Duration) -> Outcome {
        if status.is_client_error() || status.is_server_error() {
            Outcome::failure(FailureKind::Http(status.as_u16()), latency)
        } else {
            Outcome::success(latency)
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ok_statuses_succeed() {
        let o = Outcome::from_status(StatusCode::OK, Duration::from_millis(5));
        assert!(o.succeeded());
        assert_eq!(o.failure_kind(), None);
        let o = Outcome::from_status(StatusCode::MOVED_PERMANENTLY, Duration::from_millis(5));
        assert!(o.succeeded());
    }

    #[test]
    fn error_statuses_fail_with_their_code() {
        let o = Outcome::from_status(StatusCode::NOT_FOUND, Duration::from_millis(5));
        assert_eq!(o.failure_kind(), Some(FailureKind::Http(404)));
        let o = Outcome::from_status(StatusCode::INTERNAL_SERVER_ERROR, Duration::from_millis(5));
        assert_eq!(o.failure_kind(), Some(FailureKind::Http(500)));
        assert!(!o.succeeded());
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(FailureKind::Timeout.to_string(), "timeout");
        assert_eq!(FailureKind::Http(503).to_string(), "http 503");
    }
}
