//! Minifier configuration and per-output option derivation

use crate::core::models::OutputOptions;
use crate::core::name_cache::{NameCache, SharedNameCache};
use serde::{Deserialize, Serialize};

/// Either a plain on/off switch or a detailed configuration block,
/// e.g. `"mangle": false` or `"mangle": { "properties": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Toggle<T> {
    Enabled(bool),
    Config(T),
}

impl<T: Default + Clone> Toggle<T> {
    /// Resolve to the effective configuration, `None` when switched off.
    /// `true` means the default configuration.
    pub fn resolve(&self) -> Option<T> {
        match self {
            Toggle::Enabled(true) => Some(T::default()),
            Toggle::Enabled(false) => None,
            Toggle::Config(config) => Some(config.clone()),
        }
    }
}

fn resolve_or_default<T: Default + Clone>(toggle: Option<&Toggle<T>>) -> Option<T> {
    toggle.map_or_else(|| Some(T::default()), Toggle::resolve)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompressConfig {
    pub drop_console: bool,
    pub drop_debugger: bool,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            drop_console: false,
            drop_debugger: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MangleConfig {
    /// Property mangling, off unless configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Toggle<PropertiesConfig>>,
}

impl MangleConfig {
    pub fn properties(&self) -> Option<PropertiesConfig> {
        self.properties.as_ref().and_then(Toggle::resolve)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertiesConfig {
    /// Only names matching this pattern are mangled; all names when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Names never mangled
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reserved: Vec<String>,
    /// Allow mangling of well-known built-in property names
    pub builtins: bool,
}

impl PropertiesConfig {
    pub fn with_regex(regex: impl Into<String>) -> Self {
        Self {
            regex: Some(regex.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentsMode {
    All,
    /// Legal comments only (`@license`, `@preserve`, `/*!`)
    #[default]
    Some,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Toggle<CommentsMode>>,
}

/// Which comments survive in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentRetention {
    All,
    Legal,
    None,
}

impl FormatConfig {
    pub fn comment_retention(&self) -> CommentRetention {
        match &self.comments {
            None | Some(Toggle::Config(CommentsMode::Some)) => CommentRetention::Legal,
            Some(Toggle::Enabled(true)) | Some(Toggle::Config(CommentsMode::All)) => {
                CommentRetention::All
            }
            Some(Toggle::Enabled(false)) => CommentRetention::None,
        }
    }
}

/// Caller configuration for the minify plugin.
///
/// Mirrors the minifier's option schema except for source maps, which are
/// always derived from the output being rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MinifyOptions {
    /// Treat the chunk as an ES module. Defaults to true for `es` output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<bool>,

    /// Mangle and drop names in the top-level scope. Defaults to true for
    /// `cjs` output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toplevel: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compress: Option<Toggle<CompressConfig>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mangle: Option<Toggle<MangleConfig>>,

    #[serde(alias = "output", skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatConfig>,

    /// Shared with the caller; updated after every successful run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_cache: Option<SharedNameCache>,
}

impl MinifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: bool) -> Self {
        self.module = Some(module);
        self
    }

    pub fn with_toplevel(mut self, toplevel: bool) -> Self {
        self.toplevel = Some(toplevel);
        self
    }

    pub fn with_compress(mut self, compress: Toggle<CompressConfig>) -> Self {
        self.compress = Some(compress);
        self
    }

    pub fn with_mangle(mut self, mangle: Toggle<MangleConfig>) -> Self {
        self.mangle = Some(mangle);
        self
    }

    pub fn with_mangle_properties(self, properties: PropertiesConfig) -> Self {
        self.with_mangle(Toggle::Config(MangleConfig {
            properties: Some(Toggle::Config(properties)),
        }))
    }

    pub fn with_comments(mut self, comments: Toggle<CommentsMode>) -> Self {
        self.format = Some(FormatConfig {
            comments: Some(comments),
        });
        self
    }

    pub fn with_name_cache(mut self, cache: SharedNameCache) -> Self {
        self.name_cache = Some(cache);
        self
    }

    /// Apply explicitly set values of `overrides` on top of `self`
    pub fn merge(mut self, overrides: MinifyOptions) -> Self {
        if overrides.module.is_some() {
            self.module = overrides.module;
        }
        if overrides.toplevel.is_some() {
            self.toplevel = overrides.toplevel;
        }
        if overrides.compress.is_some() {
            self.compress = overrides.compress;
        }
        if overrides.mangle.is_some() {
            self.mangle = overrides.mangle;
        }
        if overrides.format.is_some() {
            self.format = overrides.format;
        }
        if overrides.name_cache.is_some() {
            self.name_cache = overrides.name_cache;
        }
        self
    }
}

/// Options for one engine invocation, derived per rendered output
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub module: bool,
    pub toplevel: bool,
    pub source_map: bool,
    /// `None` disables compression
    pub compress: Option<CompressConfig>,
    /// `None` disables mangling
    pub mangle: Option<MangleConfig>,
    pub comments: CommentRetention,
    pub name_cache: Option<NameCache>,
    /// Output file name, used as the source name in generated maps
    pub file_name: Option<String>,
}

impl EngineOptions {
    /// Derive engine options for one output.
    ///
    /// Format defaults come first, caller configuration overrides them, and
    /// the source map flag is taken from the output alone.
    pub fn derive(config: &MinifyOptions, output: &OutputOptions) -> Self {
        let mut module = false;
        let mut toplevel = false;

        if output.format.is_module() {
            module = true;
        }
        if output.format.is_commonjs() {
            toplevel = true;
        }

        if let Some(configured) = config.module {
            module = configured;
        }
        if let Some(configured) = config.toplevel {
            toplevel = configured;
        }

        Self {
            module,
            toplevel,
            source_map: output.sourcemap.is_requested(),
            compress: resolve_or_default(config.compress.as_ref()),
            mangle: resolve_or_default(config.mangle.as_ref()),
            comments: config
                .format
                .as_ref()
                .map_or(CommentRetention::Legal, FormatConfig::comment_retention),
            name_cache: config.name_cache.as_ref().map(SharedNameCache::snapshot),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}
