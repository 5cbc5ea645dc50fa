use crate::core::interfaces::{MinifyOutput, MinifyService};
use crate::core::options::{CommentRetention, EngineOptions, MangleConfig};
use crate::infrastructure::processors::property_mangler::mangle_properties;
use crate::utils::errors::{MinifyError, SourcePosition};
use async_trait::async_trait;
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, CommentOptions, LegalComment};
use oxc_diagnostics::OxcDiagnostic;
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use sourcemap::SourceMap;
use std::path::PathBuf;

const DEFAULT_SOURCE_NAME: &str = "chunk.js";

/// JavaScript minification using oxc
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcMinifier;

impl OxcMinifier {
    pub fn new() -> Self {
        Self
    }

    /// Minify one chunk on the current thread
    pub fn minify_chunk(code: &str, options: &EngineOptions) -> Result<MinifyOutput, MinifyError> {
        let allocator = Allocator::default();
        let source_type = if options.module {
            SourceType::mjs()
        } else {
            SourceType::cjs()
        };

        let parsed = Parser::new(&allocator, code, source_type).parse();
        if let Some(error) = parsed.errors.first() {
            return Err(parse_error(code, error));
        }

        let mut program = parsed.program;
        let minified = Minifier::new(minifier_options(options)).minify(&allocator, &mut program);

        let mut name_cache = options.name_cache.clone();
        if let Some(properties) = options.mangle.as_ref().and_then(MangleConfig::properties) {
            let cached = name_cache
                .as_ref()
                .map(|cache| cache.props.clone())
                .unwrap_or_default();
            let props = mangle_properties(&allocator, &mut program, &properties, cached)?;
            if let Some(cache) = name_cache.as_mut() {
                cache.props = props;
            }
        }

        let generated = Codegen::new()
            .with_options(codegen_options(options))
            .with_scoping(minified.scoping)
            .build(&program);

        let map = generated
            .map
            .map(|map| SourceMap::from_slice(map.to_json_string().as_bytes()))
            .transpose()
            .map_err(|e| MinifyError::new(format!("Invalid source map: {}", e)))?;

        Ok(MinifyOutput {
            code: generated.code,
            map,
            name_cache,
        })
    }
}

#[async_trait]
impl MinifyService for OxcMinifier {
    async fn minify(&self, code: &str, options: &EngineOptions) -> Result<MinifyOutput, MinifyError> {
        let code = code.to_string();
        let options = options.clone();

        // Run minification in a blocking task since oxc is CPU-intensive
        tokio::task::spawn_blocking(move || Self::minify_chunk(&code, &options))
            .await
            .map_err(|e| MinifyError::new(format!("Minification task failed: {}", e)))?
    }
}

fn minifier_options(options: &EngineOptions) -> MinifierOptions {
    MinifierOptions {
        mangle: options.mangle.as_ref().map(|_| MangleOptions {
            top_level: options.toplevel || options.module,
            ..MangleOptions::default()
        }),
        compress: options.compress.as_ref().map(|compress| CompressOptions {
            drop_console: compress.drop_console,
            drop_debugger: compress.drop_debugger,
            ..CompressOptions::default()
        }),
    }
}

fn codegen_options(options: &EngineOptions) -> CodegenOptions {
    let comments = match options.comments {
        CommentRetention::All => CommentOptions::default(),
        CommentRetention::Legal => CommentOptions {
            legal: LegalComment::Inline,
            ..CommentOptions::disabled()
        },
        CommentRetention::None => CommentOptions::disabled(),
    };

    let source_map_path = options.source_map.then(|| {
        PathBuf::from(options.file_name.as_deref().unwrap_or(DEFAULT_SOURCE_NAME))
    });

    CodegenOptions {
        minify: true,
        comments,
        source_map_path,
        ..CodegenOptions::default()
    }
}

/// Position of the primary label, if the parser attached one
fn parse_error(code: &str, diagnostic: &OxcDiagnostic) -> MinifyError {
    let position = diagnostic
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map(|label| SourcePosition::from_offset(code, label.offset()));

    MinifyError {
        message: diagnostic.to_string(),
        position,
    }
}
