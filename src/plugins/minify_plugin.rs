// Minify Plugin: minifies every rendered chunk for the output being generated

use crate::core::interfaces::MinifyService;
use crate::core::models::{MinificationStats, OutputOptions, RenderedChunk, RenderedOutput};
use crate::core::options::{EngineOptions, MinifyOptions};
use crate::core::plugin::Plugin;
use crate::infrastructure::processors::OxcMinifier;
use crate::utils::code_frame::describe_failure;
use crate::utils::errors::MinifyError;
use crate::utils::{Logger, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Plugin that minifies rendered chunks
///
/// Options that depend on the output (module syntax for `es`, top-level
/// scope for `cjs`, source maps) are derived for every output; everything
/// else comes from the [`MinifyOptions`] given at construction.
///
/// # Example
/// ```no_run
/// use ultra_minify::core::models::{OutputFormat, OutputOptions};
/// use ultra_minify::plugins::MinifyPlugin;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let plugin = MinifyPlugin::default();
/// let output = OutputOptions::new(OutputFormat::Cjs).with_sourcemap(true);
/// let rendered = plugin.render("const answer = 42;".to_string(), &output).await?;
/// assert!(rendered.map.is_some());
/// # Ok(())
/// # }
/// ```
pub struct MinifyPlugin {
    options: MinifyOptions,
    minifier: Arc<dyn MinifyService>,
}

impl MinifyPlugin {
    /// Create a plugin backed by the oxc minifier
    pub fn new(options: MinifyOptions) -> Self {
        Self::with_minifier(options, Arc::new(OxcMinifier::new()))
    }

    /// Create a plugin backed by a custom minification engine
    pub fn with_minifier(options: MinifyOptions, minifier: Arc<dyn MinifyService>) -> Self {
        Self { options, minifier }
    }

    pub fn options(&self) -> &MinifyOptions {
        &self.options
    }

    /// Minify `code` for one output.
    pub async fn render(
        &self,
        code: String,
        output: &OutputOptions,
    ) -> std::result::Result<RenderedOutput, MinifyError> {
        let options = EngineOptions::derive(&self.options, output);
        self.run(code, options).await
    }

    /// Minify `code` for one output, naming the chunk in generated source maps.
    pub async fn render_named(
        &self,
        code: String,
        file_name: &str,
        output: &OutputOptions,
    ) -> std::result::Result<RenderedOutput, MinifyError> {
        let options = EngineOptions::derive(&self.options, output).with_file_name(file_name);
        self.run(code, options).await
    }

    async fn run(
        &self,
        code: String,
        options: EngineOptions,
    ) -> std::result::Result<RenderedOutput, MinifyError> {
        let result = match self.minifier.minify(&code, &options).await {
            Ok(result) => result,
            Err(error) => {
                Logger::minify_failed(&describe_failure(&code, &error));
                return Err(error);
            }
        };

        if options.name_cache.is_some() {
            if let (Some(shared), Some(updated)) = (&self.options.name_cache, result.name_cache) {
                Logger::name_cache_updated(updated.len());
                shared.replace(updated);
            }
        }

        Logger::minify_complete(
            options.file_name.as_deref().unwrap_or("chunk"),
            &MinificationStats::new(&code, &result.code),
        );

        Ok(RenderedOutput {
            code: result.code,
            map: result.map,
        })
    }
}

impl Default for MinifyPlugin {
    fn default() -> Self {
        Self::new(MinifyOptions::default())
    }
}

#[async_trait]
impl Plugin for MinifyPlugin {
    fn name(&self) -> &str {
        "minify"
    }

    async fn render_chunk(
        &self,
        code: &str,
        chunk: &RenderedChunk,
        output: &OutputOptions,
    ) -> Result<Option<RenderedOutput>> {
        Logger::minify_start(&chunk.file_name, output.format.as_str());
        let rendered = self
            .render_named(code.to_string(), &chunk.file_name, output)
            .await?;
        Ok(Some(rendered))
    }
}
