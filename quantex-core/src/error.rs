//! Errors raised while building a lexicon or resolving a single match
//!
//! Only `Construction` and `UnsupportedLanguage` ever escape a parse call.
//! `Value` errors are confined to the match that produced them.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const CONSTRUCTION: &str = "CONSTRUCTION_ERROR";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";
    pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantError {
    /// Malformed lexicon or grammar; fatal for the language
    #[error("Lexicon construction error: {0}")]
    Construction(String),

    /// Unparseable numeric text in one match
    #[error("Invalid value: {0}")]
    Value(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl QuantError {
    pub fn construction(details: impl Into<String>) -> Self {
        QuantError::Construction(details.into())
    }

    pub fn value(details: impl Into<String>) -> Self {
        QuantError::Value(details.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            QuantError::Construction(_) => codes::CONSTRUCTION,
            QuantError::Value(_) => codes::INVALID_VALUE,
            QuantError::UnsupportedLanguage(_) => codes::UNSUPPORTED_LANGUAGE,
        }
    }

    /// True for errors that abort a whole parse call
    pub fn is_fatal(&self) -> bool {
        !matches!(self, QuantError::Value(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(QuantError::value("x").code(), codes::INVALID_VALUE);
        assert_eq!(QuantError::UnsupportedLanguage("xx".into()).code(), codes::UNSUPPORTED_LANGUAGE);
    }

    #[test]
    fn test_fatality() {
        assert!(QuantError::construction("bad prefix").is_fatal());
        assert!(!QuantError::value("invalid range").is_fatal());
    }

    #[test]
    fn test_display() {
        let e = QuantError::value("1/0 is not a number");
        assert_eq!(e.to_string(), "Invalid value: 1/0 is not a number");
    }
}
