//! Error taxonomy for the lexer/parser and the reload engine (spec §7).

use std::path::PathBuf;

/// Severity under which an error was raised. At boot every kind below
/// `SemanticImmutable` is fatal; on reload every kind is demoted to a log
/// record and the whole reload is aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Log,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{file}:{line}: syntax error{}", token.as_ref().map(|t| format!(" at \"{t}\"")).unwrap_or_default())]
    Syntax {
        file: PathBuf,
        line: usize,
        token: Option<String>,
    },

    #[error("could not open \"{file}\": {source}")]
    FileAccess {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}:{line}: include depth exceeds the maximum of {max}")]
    Limit {
        file: PathBuf,
        line: usize,
        max: usize,
    },

    #[error("{file}:{line}: unrecognized configuration parameter class in \"{name}\"")]
    SemanticUnknown {
        name: String,
        file: PathBuf,
        line: usize,
    },

    #[error("invalid value for parameter \"{name}\": {message}")]
    SemanticReject { name: String, message: String },

    #[error(
        "parameter \"{name}\" cannot be changed without restarting the server"
    )]
    SemanticImmutable { name: String },

    #[error("a reload is already in progress")]
    ReloadInProgress,
}

impl ConfigError {
    /// Whether this error kind is ever demoted to a warning instead of
    /// aborting the whole reload (spec §7: only `SemanticImmutable`).
    pub fn is_warning_only(&self) -> bool {
        matches!(self, ConfigError::SemanticImmutable { .. })
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
