use reqwest::StatusCode;
use thiserror::Error;

/// Failure taxonomy for a weather query.
///
/// Every upstream or decoding failure is classified into exactly one of these;
/// callers decide how to present it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("location not found")]
    NotFound,

    #[error("provider rejected the API key")]
    Unauthorized,

    #[error("provider rate limit exceeded")]
    RateLimited,

    #[error("weather service unavailable (status {status})")]
    ServiceUnavailable { status: u16 },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("network error: {0}")]
    NetworkError(String),
}

impl WeatherError {
    /// Maps a non-success HTTP status to the taxonomy.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => WeatherError::NotFound,
            StatusCode::UNAUTHORIZED => WeatherError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => WeatherError::RateLimited,
            other => WeatherError::ServiceUnavailable { status: other.as_u16() },
        }
    }

    /// Wording suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::NotFound => "City not found. Please check the spelling and try again.",
            WeatherError::Unauthorized => {
                "The weather service rejected the configured API key. Run `weatherdash configure`."
            }
            WeatherError::RateLimited => "Too many requests. Please wait a moment and try again.",
            WeatherError::ServiceUnavailable { .. } => {
                "Weather service is currently unavailable. Please try again later."
            }
            WeatherError::MalformedResponse(_) => {
                "The weather service returned data that could not be understood."
            }
            WeatherError::NetworkError(_) => {
                "Failed to fetch weather data. Please check your internet connection."
            }
        }
    }

    /// Whether a caller may reasonably retry the same query later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WeatherError::RateLimited
                | WeatherError::ServiceUnavailable { .. }
                | WeatherError::NetworkError(_)
        )
    }
}
