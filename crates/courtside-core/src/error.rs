// Error types for talking to the remote stats provider.

use thiserror::Error;

/// Failure of a call to the remote stats provider.
///
/// A well-formed empty result set is *not* an error; it is reported through
/// [`crate::model::StatsOutcome::NoData`] instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("rate limited by upstream after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP 429 from upstream. The retry layer waits and tries again only
    /// for this case.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::Status { status: 429, .. })
    }

    /// Status code to report to a downstream HTTP client.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Status { status, .. } => *status,
            ApiError::RateLimited { .. } => 429,
            _ => 500,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_429_counts_as_rate_limited() {
        let limited = ApiError::Status {
            status: 429,
            url: "http://x/stats".into(),
        };
        let not_found = ApiError::Status {
            status: 404,
            url: "http://x/stats".into(),
        };
        assert!(limited.is_rate_limited());
        assert!(!not_found.is_rate_limited());
        assert!(!ApiError::RateLimited { attempts: 5 }.is_rate_limited());
    }

    #[test]
    fn status_code_mapping() {
        let err = ApiError::Status {
            status: 404,
            url: "http://x/players/1".into(),
        };
        assert_eq!(err.status_code(), 404);
        assert_eq!(ApiError::RateLimited { attempts: 5 }.status_code(), 429);

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::Decode(decode).status_code(), 500);
    }

    #[test]
    fn display_mentions_status_and_url() {
        let err = ApiError::Status {
            status: 503,
            url: "http://x/teams".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("http://x/teams"));
    }
}
