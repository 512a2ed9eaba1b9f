use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;

/// Errors surfaced by archive fetches and constraint lookups.
///
/// Nothing is retried or silently recovered; a failed lookup never returns a
/// partially filled result.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The requested period, table, constraint or generic function is not in
    /// the archive.
    #[error("{operation}: `{key}` not found in archive")]
    NotFound {
        operation: &'static str,
        key: String,
    },

    /// Archive content was present but malformed relative to the expected
    /// report shape.
    #[error("malformed {table} report: {reason}")]
    Parse { table: String, reason: String },

    /// The archive was unreachable or the transfer failed.
    #[error("archive transport failure: {0}")]
    Transport(String),
}

impl ArchiveError {
    pub fn not_found(operation: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            operation,
            key: key.into(),
        }
    }

    pub fn parse(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// True for the not-found variant, whatever the operation.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for ArchiveError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_key_and_operation() {
        let err = ArchiveError::not_found("get_lhs_terms", "NONEXISTENT_ID");
        assert_eq!(
            err.to_string(),
            "get_lhs_terms: `NONEXISTENT_ID` not found in archive"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_display() {
        let err = ArchiveError::parse("GENCONDATA", "missing end-of-report trailer");
        assert_eq!(
            err.to_string(),
            "malformed GENCONDATA report: missing end-of-report trailer"
        );
        assert!(!err.is_not_found());
    }
}
