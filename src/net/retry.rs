//! HTTP retry with exponential backoff.
//!
//! Retries 429, 5xx, timeouts and connection errors. Any other response is
//! handed back to the caller, which decides what its status means.

use crate::config::HttpConfig;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use reqwest::StatusCode;
use reqwest::blocking::{RequestBuilder, Response};
use std::thread;
use std::time::Duration;

fn is_retriable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff(http: &HttpConfig, attempt: u32) -> Duration {
    Duration::from_millis(http.retry_backoff_ms.saturating_mul(2u64.saturating_pow(attempt)))
}

pub fn send_with_retry<F>(build_request: F, http: &HttpConfig, context: &str) -> AppResult<Response>
where
    F: Fn() -> RequestBuilder,
{
    let attempts = http.max_retries.max(1);
    let mut attempt = 0;

    loop {
        let last = attempt + 1 >= attempts;

        match build_request().send() {
            Ok(resp) if is_retriable(resp.status()) && !last => {
                let delay = backoff(http, attempt);
                warning(format!(
                    "{context}: HTTP {}, retrying in {:?}",
                    resp.status(),
                    delay
                ));
                thread::sleep(delay);
            }
            Ok(resp) => return Ok(resp),
            Err(e) if (e.is_timeout() || e.is_connect()) && !last => {
                let delay = backoff(http, attempt);
                warning(format!("{context}: network error ({e}), retrying in {delay:?}"));
                thread::sleep(delay);
            }
            Err(e) => return Err(e.into()),
        }

        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(retry_backoff_ms: u64) -> HttpConfig {
        HttpConfig {
            timeout_secs: 5,
            max_retries: 3,
            retry_backoff_ms,
        }
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let cfg = http(100);
        assert_eq!(backoff(&cfg, 0), Duration::from_millis(100));
        assert_eq!(backoff(&cfg, 1), Duration::from_millis(200));
        assert_eq!(backoff(&cfg, 3), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_saturates() {
        assert_eq!(backoff(&http(1000), 80), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_retriable_statuses() {
        assert!(is_retriable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retriable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retriable(StatusCode::BAD_GATEWAY));

        assert!(!is_retriable(StatusCode::NOT_FOUND));
        assert!(!is_retriable(StatusCode::CONFLICT));
        assert!(!is_retriable(StatusCode::UNAUTHORIZED));
    }
}
