//! Helpers shared by the booking store and payment clients.

use booking_core::ConfigError;
use reqwest::{Client, Url};
use std::time::Duration;

/// HTTP client with a bounded total request time
pub(crate) fn build_client(timeout: Duration) -> Result<Client, ConfigError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ConfigError::Invalid(format!("failed to create HTTP client: {}", e)))
}

/// Append path segments to `base`, percent-encoding each one
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().ok()?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Some(url)
}

/// Human readable reason from an error body.
///
/// Prefers a JSON `message` or `error` string, then the raw body.
pub(crate) fn error_reason(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(reason) = value.get(key).and_then(|v| v.as_str()) {
                return reason.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no reason given".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_segments() {
        let base = Url::parse("http://localhost:4000/api/v1").unwrap();
        assert_eq!(
            endpoint(&base, &["booking"]).unwrap().as_str(),
            "http://localhost:4000/api/v1/booking"
        );

        let base = Url::parse("http://localhost:4000").unwrap();
        assert_eq!(
            endpoint(&base, &["booking", "a/b c"]).unwrap().as_str(),
            "http://localhost:4000/booking/a%2Fb%20c"
        );
    }

    #[test]
    fn test_error_reason() {
        assert_eq!(
            error_reason(r#"{"success":false,"message":"You are not authenticated"}"#),
            "You are not authenticated"
        );
        assert_eq!(error_reason(r#"{"error":"bad amount"}"#), "bad amount");
        assert_eq!(error_reason("Internal Server Error\n"), "Internal Server Error");
        assert_eq!(error_reason(""), "no reason given");
    }
}
