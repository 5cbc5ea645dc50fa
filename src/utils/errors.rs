use std::fmt;
use thiserror::Error;

/// Position of a minifier failure inside the chunk it was given.
///
/// `line` is 1-based, `column` is 0-based (counted in characters), which is
/// what minifier diagnostics conventionally report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Compute the position of a byte offset in `source`.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = floor_char_boundary(source, offset.min(source.len()));
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count();
        Self { line, column }
    }

    /// Byte offset of this position in `source`, if the line exists.
    ///
    /// Columns past the end of the line clamp to the line end.
    pub fn to_offset(self, source: &str) -> Option<usize> {
        if self.line == 0 {
            return None;
        }

        let mut line_start = 0;
        for _ in 1..self.line {
            line_start += source[line_start..].find('\n')? + 1;
        }

        let line_text = source[line_start..].split('\n').next().unwrap_or_default();
        let column_bytes = line_text
            .char_indices()
            .nth(self.column)
            .map_or(line_text.len(), |(idx, _)| idx);

        Some(line_start + column_bytes)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Failure reported by a minification engine.
///
/// This is the single error category of the render adapter. It is passed
/// through untouched so the position stays meaningful to whoever reports it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct MinifyError {
    pub message: String,
    pub position: Option<SourcePosition>,
}

impl MinifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(SourcePosition::new(line, column)),
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.position.map(|p| p.line)
    }

    pub fn column(&self) -> Option<usize> {
        self.position.map(|p| p.column)
    }
}

#[derive(Error, Debug)]
pub enum UltraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Minify(#[from] MinifyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UltraError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, UltraError>;
