// Plugin system for the render stage
// Plugins see every rendered chunk once per requested output

use crate::core::models::{OutputOptions, RenderedChunk, RenderedOutput};
use crate::utils::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Main plugin trait that all plugins must implement
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique name for this plugin
    fn name(&self) -> &str;

    /// Transform a rendered chunk for one output.
    ///
    /// Return `Some(output)` to replace the chunk's code (and map),
    /// or `None` to leave it unchanged.
    ///
    /// # Arguments
    /// * `code` - Chunk code as produced by the previous stage
    /// * `chunk` - The chunk being rendered
    /// * `output` - Format and source map settings of the output
    async fn render_chunk(
        &self,
        _code: &str,
        _chunk: &RenderedChunk,
        _output: &OutputOptions,
    ) -> Result<Option<RenderedOutput>> {
        Ok(None)
    }
}

/// Manages plugin registration and execution
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    /// Create a new empty plugin manager
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Register a plugin
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Get number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Execute render_chunk hooks for all plugins
    ///
    /// Plugins are executed in registration order and each one receives the
    /// code produced by the previous one. The map of the last plugin that
    /// produced one is kept. The first error aborts the chain unchanged.
    pub async fn render_chunk(
        &self,
        code: String,
        chunk: &RenderedChunk,
        output: &OutputOptions,
    ) -> Result<RenderedOutput> {
        let mut rendered = RenderedOutput::new(code);

        for plugin in &self.plugins {
            if let Some(next) = plugin.render_chunk(&rendered.code, chunk, output).await? {
                rendered.code = next.code;
                if next.map.is_some() {
                    rendered.map = next.map;
                }
            }
        }

        Ok(rendered)
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
