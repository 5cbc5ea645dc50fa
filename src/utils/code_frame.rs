//! Code frames for minifier failures
//!
//! A code frame is the failing source line (plus a little context) with the
//! error position underlined and labelled. Rendering is delegated to miette's
//! graphical handler without colors so the output is stable in log files.

use crate::utils::errors::{MinifyError, SourcePosition};
use miette::{
    Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, SourceCode, SourceSpan,
};
use std::fmt;

const CONTEXT_LINES: usize = 2;

#[derive(Debug)]
struct CodeFrame {
    message: String,
    source: String,
    span: SourceSpan,
}

impl fmt::Display for CodeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CodeFrame {}

impl Diagnostic for CodeFrame {
    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.message.clone()),
            self.span,
        ))))
    }
}

/// Render `message` against `source` at `position`.
///
/// Returns `None` when the position does not exist in `source`.
pub fn render_code_frame(source: &str, position: SourcePosition, message: &str) -> Option<String> {
    let offset = position.to_offset(source)?;
    let len = source[offset..].chars().next().map_or(0, char::len_utf8);

    let frame = CodeFrame {
        message: message.to_string(),
        source: source.to_string(),
        span: SourceSpan::from((offset, len)),
    };

    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_context_lines(CONTEXT_LINES)
        .render_report(&mut out, &frame)
        .ok()?;
    Some(out)
}

/// Best-effort report for an engine failure: a code frame when the error
/// carries a usable position, the bare message otherwise.
pub fn describe_failure(source: &str, error: &MinifyError) -> String {
    error
        .position
        .and_then(|position| render_code_frame(source, position, &error.message))
        .unwrap_or_else(|| error.message.clone())
}
