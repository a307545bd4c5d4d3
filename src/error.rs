//! Crate-wide error type.
//!
//! Matching itself never fails (see `matcher`/`context`/`path`): malformed patterns
//! degrade to literal semantics rather than erroring. This enum covers the fallible
//! external-collaborator boundaries only: pattern preprocessing and the filesystem
//! walker.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by this crate's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    /// `~user` could not be resolved while `Flags::TILDE_CHECK` was set.
    #[error("unresolved tilde user '~{user}'")]
    UnresolvedTildeUser { user: String },

    /// The pattern, once relative-path components were resolved, was empty.
    #[error("'{pattern}': pattern is empty")]
    EmptyPattern { pattern: String },

    /// The pattern is an absolute path where only relative patterns are accepted.
    #[error("'{pattern}': absolute patterns are not supported here")]
    AbsolutePattern { pattern: String },

    /// The root directory could not be resolved for the given pattern.
    #[error("'{pattern}': failed to resolve root directory: {source}")]
    InvalidRoot {
        pattern: String,
        #[source]
        source: std::io::Error,
    },

    /// A pattern's remainder still referenced `..` after root resolution.
    #[error("'{remainder}': pattern remainder contains unresolved relative path components")]
    UnresolvedRelativePath { remainder: String },

    /// Pattern compilation failed for a reason other than a malformed construct
    /// (malformed constructs degrade silently; this covers programmer-facing misuse
    /// such as an empty glob passed to [`crate::Builder::build_glob`]).
    #[error("'{glob}': {reason}")]
    InvalidGlob { glob: String, reason: String },

    /// Failure while walking the filesystem, wrapping [`walkdir::Error`].
    #[error("failed to walk path {path}: {kind}")]
    Walk {
        path: PathBuf,
        kind: WalkErrorKind,
        #[source]
        source: walkdir::Error,
    },
}

/// Narrow classification of a [`walkdir::Error`], mirroring the distinctions this
/// crate's walker integration cares about.
#[derive(Debug, Error)]
pub enum WalkErrorKind {
    #[error("invalid data encountered")]
    InvalidData,
    #[error("missing permissions to read entry")]
    PermissionDenied,
    #[error("unexpected I/O error")]
    Other,
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let kind = match err.io_error() {
            Some(inner) => match inner.kind() {
                std::io::ErrorKind::InvalidData => WalkErrorKind::InvalidData,
                std::io::ErrorKind::PermissionDenied => WalkErrorKind::PermissionDenied,
                _ => WalkErrorKind::Other,
            },
            None => WalkErrorKind::Other,
        };
        Error::Walk {
            path,
            kind,
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_user() {
        let err = Error::UnresolvedTildeUser {
            user: "nobody".to_string(),
        };
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn display_includes_pattern() {
        let err = Error::AbsolutePattern {
            pattern: "/abs/*.txt".to_string(),
        };
        assert!(err.to_string().contains("/abs/*.txt"));
    }
}
