// Typed errors with thiserror. Surface meaningful messages to JS.
// Playback failures never land here: per the error-handling policy they
// degrade to a paused/idle state instead of propagating.

use thiserror::Error;

/// Engine error types. Only the JSON boundary can actually fail.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        PlayerError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlayerError::InvalidConfig("missing field".to_string());
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn serde_error_converts() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: PlayerError = err.into();
        assert!(matches!(err, PlayerError::Serialization(_)));
    }
}
