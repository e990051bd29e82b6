/// Errors raised by the mesh loader and configuration parsing
use thiserror::Error;

/// A mesh text load was rejected. The current geometry is left untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
    #[error("line {line}, column {column}: invalid number `{token}`")]
    InvalidNumber {
        line: usize,
        column: usize,
        token: String,
    },
    #[error("line {line}: vertex needs 3 coordinates, found {found}")]
    MissingCoordinate { line: usize, found: usize },
    #[error("line {line}: face needs at least 2 indices, found {count}")]
    DegenerateFace { line: usize, count: usize },
    #[error("line {line}, column {column}: vertex index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        line: usize,
        column: usize,
        index: i64,
        vertex_count: usize,
    },
}

impl LoadError {
    /// 1-based line of the offending record
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidNumber { line, .. }
            | Self::MissingCoordinate { line, .. }
            | Self::DegenerateFace { line, .. }
            | Self::IndexOutOfRange { line, .. } => *line,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse viewer config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid viewer config: {0}")]
    Invalid(String),
}
