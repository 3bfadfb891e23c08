use thiserror::Error;

/// Failures surfaced by a fetch-and-render cycle.
///
/// None of these are retried automatically; the caller decides whether to prompt the user again.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// User input was rejected before any request was made.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The weather provider answered with a non-success status.
    #[error("Provider returned status {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    /// The request never produced a usable response (unreachable host, timeout, undecodable body).
    #[error("Connection error: {0}")]
    Connection(String),
}

impl WeatherError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn connection(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Connection(format!("{context}: {err}"))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Status code, if the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ProviderStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_message_carries_status_and_body() {
        let err = WeatherError::ProviderStatus {
            status: 404,
            body: r#"{"cod":"404","message":"city not found"}"#.to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("city not found"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn connection_error_has_no_status() {
        let err = WeatherError::connection("Failed to reach OpenWeather", "dns error");
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Connection error: Failed to reach OpenWeather: dns error");
    }
}
