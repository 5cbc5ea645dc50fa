use crate::core::name_cache::NameCache;
use crate::core::options::EngineOptions;
use crate::utils::errors::MinifyError;
use async_trait::async_trait;
use sourcemap::SourceMap;

/// Result of one engine invocation
#[derive(Debug, Clone)]
pub struct MinifyOutput {
    pub code: String,
    pub map: Option<SourceMap>,
    /// Updated cache, present when the options carried one
    pub name_cache: Option<NameCache>,
}

/// Minification engine interface
#[async_trait]
pub trait MinifyService: Send + Sync {
    async fn minify(
        &self,
        code: &str,
        options: &EngineOptions,
    ) -> std::result::Result<MinifyOutput, MinifyError>;
}
