//! Error types for wire value conversion

use thiserror::Error;

/// A single scalar's wire encoding violates the expected grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Weekday value is not a decimal integer
    #[error("invalid wire format: weekday {0:?} is not an integer")]
    InvalidWeekday(String),
}

impl FormatError {
    /// Prefix shared by every `FormatError` message
    pub const MESSAGE_PREFIX: &'static str = "invalid wire format:";

    /// Whether an error message (for example one relayed through a JSON
    /// deserializer) originated from a `FormatError`
    pub fn is_format_message(message: &str) -> bool {
        message.starts_with(Self::MESSAGE_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefix() {
        let err = FormatError::InvalidWeekday("abc".to_string());
        assert!(FormatError::is_format_message(&err.to_string()));
        assert!(!FormatError::is_format_message("invalid type: integer"));
    }
}
