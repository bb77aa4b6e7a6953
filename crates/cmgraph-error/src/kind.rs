//! Error kinds for cmgraph operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// This enum categorizes errors to help users write clear error handling logic.
/// Users can match on ErrorKind to decide how to handle specific error cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid configuration or parameters
    ConfigInvalid,

    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // File API errors
    // =========================================================================
    /// A referenced file-API document does not exist
    MissingInputDocument,

    /// Deserializing a file-API document failed
    DeserializeFailed,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Model errors
    // =========================================================================
    /// A dependency id has no matching target in the snapshot
    UnresolvedDependencyId,

    /// A target's provenance table yields zero or several declaration records
    AmbiguousDefinitionSite,

    // =========================================================================
    // Graph errors
    // =========================================================================
    /// More frequent targets than available marker symbols
    MarkerAlphabetExhausted,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::IoFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(
            ErrorKind::UnresolvedDependencyId.to_string(),
            "UnresolvedDependencyId"
        );
        assert_eq!(
            ErrorKind::MarkerAlphabetExhausted.to_string(),
            "MarkerAlphabetExhausted"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::IoFailed.is_retryable());
        assert!(!ErrorKind::MissingInputDocument.is_retryable());
        assert!(!ErrorKind::UnresolvedDependencyId.is_retryable());
        assert!(!ErrorKind::AmbiguousDefinitionSite.is_retryable());
    }
}
