use crate::core::models::{OutputFormat, OutputOptions, RenderedChunk, RenderedOutput, SourceMapOption};
use crate::core::name_cache::SharedNameCache;
use crate::core::plugin::PluginManager;
use crate::plugins::MinifyPlugin;
use crate::utils::{CliOverrides, ConfigLoader, Logger, NameCacheFile, Timer, UltraError};
use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ultra-minify")]
#[command(about = "Ultra Minify - minify rendered chunks per output format")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Minify a rendered chunk for one or more output formats
    Minify(MinifyArgs),
    /// Print an example configuration file
    Init,
}

#[derive(Args, Debug, Clone)]
pub struct MinifyArgs {
    /// Rendered chunk to minify
    pub input: PathBuf,

    /// Output format; repeat to render several outputs concurrently
    #[arg(short, long = "format", default_value = "es")]
    pub formats: Vec<OutputFormat>,

    /// Source map: true, false, inline or hidden
    #[arg(long, default_value = "false")]
    pub sourcemap: SourceMapOption,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    pub outdir: PathBuf,

    /// Configuration file (defaults to ultra-minify.config.json if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name cache file, read before and written after minification
    #[arg(long)]
    pub name_cache: Option<PathBuf>,

    /// Treat the chunk as an ES module
    #[arg(long)]
    pub module: Option<bool>,

    /// Mangle top-level names
    #[arg(long)]
    pub toplevel: Option<bool>,

    /// Disable compression
    #[arg(long)]
    pub no_compress: bool,

    /// Disable name mangling
    #[arg(long)]
    pub no_mangle: bool,
}

impl MinifyArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            module: self.module,
            toplevel: self.toplevel,
            no_compress: self.no_compress,
            no_mangle: self.no_mangle,
        }
    }
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let cli = Cli::parse();

        // Initialize logging
        Logger::init(cli.verbose);

        match cli.command {
            Commands::Minify(args) => {
                let root = std::env::current_dir()?;
                self.handle_minify_command(&args, &root).await.map(|_| ())
            }
            Commands::Init => {
                println!("{}", ConfigLoader::generate_example());
                Ok(())
            }
        }
    }

    /// Render `args.input` once per requested format and write the results.
    ///
    /// Returns the paths of the written code files.
    pub async fn handle_minify_command(
        &self,
        args: &MinifyArgs,
        root: &Path,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let _timer = Timer::start("minify");

        let file_config = ConfigLoader::load(args.config.as_deref(), root)?;
        let mut options = ConfigLoader::merge_with_cli(file_config, &args.overrides());

        let cache_file = args.name_cache.as_ref().map(NameCacheFile::new);
        if let Some(file) = &cache_file {
            let cache = file
                .load()
                .with_context(|| format!("Failed to read name cache {}", file.path().display()))?;
            options.name_cache = Some(SharedNameCache::new(cache));
        }
        let name_cache = options.name_cache.clone();

        let code = tokio::fs::read_to_string(&args.input)
            .await
            .with_context(|| format!("Failed to read {}", args.input.display()))?;
        let stem = args
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chunk".to_string());

        let mut manager = PluginManager::new();
        manager.register(Arc::new(MinifyPlugin::new(options)));

        let manager = &manager;
        let code = &code;
        let renders = args.formats.iter().map(|format| {
            let chunk = RenderedChunk::new(format!("{}.{}.js", stem, format));
            let output = OutputOptions::new(*format).with_sourcemap(args.sourcemap.clone());
            async move {
                let rendered = manager.render_chunk(code.clone(), &chunk, &output).await?;
                Ok::<_, UltraError>((chunk, output, rendered))
            }
        });
        let results = futures::future::try_join_all(renders).await?;

        tokio::fs::create_dir_all(&args.outdir).await?;

        let mut written = Vec::with_capacity(results.len());
        for (chunk, output, rendered) in results {
            written.push(write_output(&args.outdir, &chunk, &output, rendered).await?);
        }

        if let (Some(file), Some(cache)) = (&cache_file, &name_cache) {
            file.save(&cache.snapshot())
                .with_context(|| format!("Failed to write name cache {}", file.path().display()))?;
        }

        Ok(written)
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

async fn write_output(
    outdir: &Path,
    chunk: &RenderedChunk,
    output: &OutputOptions,
    rendered: RenderedOutput,
) -> anyhow::Result<PathBuf> {
    let code_path = outdir.join(&chunk.file_name);
    let mut code = rendered.code;

    if let Some(map) = rendered.map {
        let mut json = Vec::new();
        map.to_writer(&mut json)
            .with_context(|| format!("Failed to serialize source map for {}", chunk.file_name))?;

        let map_name = format!("{}.map", chunk.file_name);
        match output.sourcemap.mode() {
            Some("inline") => {
                let url = format!(
                    "data:application/json;charset=utf-8;base64,{}",
                    STANDARD.encode(&json)
                );
                append_source_mapping_url(&mut code, &url);
            }
            Some("hidden") => {
                tokio::fs::write(outdir.join(&map_name), &json).await?;
            }
            _ => {
                tokio::fs::write(outdir.join(&map_name), &json).await?;
                append_source_mapping_url(&mut code, &map_name);
            }
        }
    }

    tokio::fs::write(&code_path, &code).await?;
    Logger::output_written(&code_path.display().to_string(), code.len());
    Ok(code_path)
}

fn append_source_mapping_url(code: &mut String, url: &str) {
    if !code.is_empty() && !code.ends_with('\n') {
        code.push('\n');
    }
    code.push_str("//# sourceMappingURL=");
    code.push_str(url);
    code.push('\n');
}
