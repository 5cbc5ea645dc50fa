use crate::utils::errors::UltraError;
use sourcemap::SourceMap;
use std::fmt;
use std::str::FromStr;

/// Module format of one requested output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// `es` / `esm`
    Es,
    Cjs,
    Iife,
    Umd,
    Amd,
    System,
}

impl OutputFormat {
    /// ES module output: top-level `import`/`export`, strict mode
    pub fn is_module(self) -> bool {
        matches!(self, OutputFormat::Es)
    }

    /// CommonJS output: the file has its own top-level scope
    pub fn is_commonjs(self) -> bool {
        matches!(self, OutputFormat::Cjs)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Es => "es",
            OutputFormat::Cjs => "cjs",
            OutputFormat::Iife => "iife",
            OutputFormat::Umd => "umd",
            OutputFormat::Amd => "amd",
            OutputFormat::System => "system",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = UltraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es" | "esm" => Ok(OutputFormat::Es),
            "cjs" => Ok(OutputFormat::Cjs),
            "iife" => Ok(OutputFormat::Iife),
            "umd" => Ok(OutputFormat::Umd),
            "amd" => Ok(OutputFormat::Amd),
            "system" => Ok(OutputFormat::System),
            other => Err(UltraError::config(format!("Unknown output format: {}", other))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source map request of one output: a flag or a named mode (`inline`, `hidden`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMapOption {
    Enabled(bool),
    Mode(String),
}

impl SourceMapOption {
    /// Whether the bundler asked for a source map at all.
    /// Any mode string is a request, including an empty one.
    pub fn is_requested(&self) -> bool {
        match self {
            SourceMapOption::Enabled(enabled) => *enabled,
            SourceMapOption::Mode(_) => true,
        }
    }

    /// Named mode deciding where the map is written; `None` for plain files
    pub fn mode(&self) -> Option<&str> {
        match self {
            SourceMapOption::Mode(mode) if !mode.is_empty() => Some(mode),
            _ => None,
        }
    }
}

impl Default for SourceMapOption {
    fn default() -> Self {
        SourceMapOption::Enabled(false)
    }
}

impl From<bool> for SourceMapOption {
    fn from(enabled: bool) -> Self {
        SourceMapOption::Enabled(enabled)
    }
}

impl From<&str> for SourceMapOption {
    fn from(mode: &str) -> Self {
        SourceMapOption::Mode(mode.to_string())
    }
}

impl FromStr for SourceMapOption {
    type Err = UltraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "true" => SourceMapOption::Enabled(true),
            "false" => SourceMapOption::Enabled(false),
            mode => SourceMapOption::Mode(mode.to_string()),
        })
    }
}

/// Output descriptor handed to render hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub sourcemap: SourceMapOption,
}

impl OutputOptions {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            sourcemap: SourceMapOption::default(),
        }
    }

    pub fn with_sourcemap(mut self, sourcemap: impl Into<SourceMapOption>) -> Self {
        self.sourcemap = sourcemap.into();
        self
    }
}

/// The chunk being rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChunk {
    pub file_name: String,
}

impl RenderedChunk {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

/// Code and optional source map returned by a render hook
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

impl RenderedOutput {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            map: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MinificationStats {
    pub original_size: usize,
    pub minified_size: usize,
    pub reduction_percentage: f64,
    pub saved_bytes: usize,
}

impl MinificationStats {
    pub fn new(original: &str, minified: &str) -> Self {
        let original_size = original.len();
        let minified_size = minified.len();
        let reduction_percentage = if original_size == 0 {
            0.0
        } else {
            (original_size as f64 - minified_size as f64) / original_size as f64 * 100.0
        };

        Self {
            original_size,
            minified_size,
            reduction_percentage,
            saved_bytes: original_size.saturating_sub(minified_size),
        }
    }
}

impl fmt::Display for MinificationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% reduction ({} → {} bytes, saved {})",
            self.reduction_percentage, self.original_size, self.minified_size, self.saved_bytes
        )
    }
}
