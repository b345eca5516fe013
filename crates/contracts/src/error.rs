//! Layered error definitions
//!
//! Categorized by source: config / dispatch / general

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Configuration serialize error
    #[error("config serialize error: {message}")]
    ConfigSerialize { message: String },

    /// No constructor registered for a class identifier
    #[error("unknown committer class '{class}'")]
    UnknownClass { class: String },

    /// Constructor ran but could not produce an instance
    #[error("cannot instantiate committer class '{class}': {message}")]
    Instantiation { class: String, message: String },

    /// Nested composites exceed the configured depth
    #[error("committer nesting too deep: depth {depth} exceeds max {max}")]
    NestingTooDeep { depth: usize, max: usize },

    // ===== Dispatch Errors =====
    /// Queue add/remove failed inside a committer
    #[error("committer '{committer}' failed to queue '{reference}': {message}")]
    QueueFailed {
        committer: String,
        reference: String,
        message: String,
    },

    /// Commit failed inside a committer
    #[error("committer '{committer}' commit failed: {message}")]
    CommitFailed { committer: String, message: String },

    /// Committer was re-entered while already dispatching (cyclic composite)
    #[error("committer re-entered during {operation}; composite contains itself")]
    Reentrant { operation: &'static str },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create configuration serialize error
    pub fn config_serialize(message: impl Into<String>) -> Self {
        Self::ConfigSerialize {
            message: message.into(),
        }
    }

    /// Create unknown class error
    pub fn unknown_class(class: impl Into<String>) -> Self {
        Self::UnknownClass {
            class: class.into(),
        }
    }

    /// Create instantiation error
    pub fn instantiation(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Instantiation {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Create queue failure error
    pub fn queue_failed(
        committer: impl Into<String>,
        reference: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::QueueFailed {
            committer: committer.into(),
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create commit failure error
    pub fn commit_failed(committer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommitFailed {
            committer: committer.into(),
            message: message.into(),
        }
    }

    /// Whether this error comes from reading or writing configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. }
                | Self::ConfigValidation { .. }
                | Self::ConfigSerialize { .. }
                | Self::UnknownClass { .. }
                | Self::Instantiation { .. }
                | Self::NestingTooDeep { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = ContractError::unknown_class("acme::Missing");
        assert_eq!(err.to_string(), "unknown committer class 'acme::Missing'");

        let err = ContractError::queue_failed("solr", "doc1", "connection refused");
        assert!(err.to_string().contains("doc1"));
        assert!(err.to_string().contains("solr"));
    }

    #[test]
    fn test_config_error_classification() {
        assert!(ContractError::unknown_class("x").is_config_error());
        assert!(ContractError::NestingTooDeep { depth: 65, max: 64 }.is_config_error());
        assert!(!ContractError::commit_failed("x", "boom").is_config_error());
        assert!(!ContractError::Reentrant { operation: "commit" }.is_config_error());
    }
}
