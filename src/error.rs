//! Error type shared by every stage and by the chain operator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while binding, chaining or running stages.
///
/// Nothing here is retried internally; every variant surfaces to the direct
/// caller of `call`, `chain` or the collector that pulled the failing item.
#[derive(Debug, Error)]
pub enum PipeError {
    #[error("{stage}: arguments number wrong. required {expected} got {actual}")]
    Arity {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{stage}: {reason} parameter '{name}'")]
    Binding {
        stage: &'static str,
        name: String,
        reason: &'static str,
    },

    #[error("{stage}: parameter '{param}' expects {expected}")]
    ArgType {
        stage: &'static str,
        param: &'static str,
        expected: &'static str,
    },

    #[error("{kind} value is not iterable")]
    NotIterable { kind: &'static str },

    #[error("cannot build a map entry from {0}; expected a pair")]
    NotAPair(String),

    #[error("expected {expected} element, got {found}")]
    ElementType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid glob: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("failed to run '{cmd}': {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error writing to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}

impl PipeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipeError>;
