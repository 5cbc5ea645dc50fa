use async_trait::async_trait;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use ultra_minify::core::interfaces::{MinifyOutput, MinifyService};
use ultra_minify::core::models::{
    OutputFormat, OutputOptions, RenderedChunk, RenderedOutput, SourceMapOption,
};
use ultra_minify::core::name_cache::{NameCache, SharedNameCache};
use ultra_minify::core::options::{EngineOptions, MinifyOptions, Toggle};
use ultra_minify::core::plugin::{Plugin, PluginManager};
use ultra_minify::plugins::MinifyPlugin;
use ultra_minify::utils::{MinifyError, Result, UltraError};

/// Engine double that records the options of every call
#[derive(Default)]
struct RecordingMinifier {
    calls: Mutex<Vec<EngineOptions>>,
    failure: Option<MinifyError>,
}

impl RecordingMinifier {
    fn failing(error: MinifyError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    fn calls(&self) -> Vec<EngineOptions> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MinifyService for RecordingMinifier {
    async fn minify(
        &self,
        code: &str,
        options: &EngineOptions,
    ) -> std::result::Result<MinifyOutput, MinifyError> {
        self.calls.lock().push(options.clone());
        tokio::task::yield_now().await;

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        // Every call hands out one more property name
        let name_cache = options.name_cache.clone().map(|mut cache| {
            let n = cache.props.len();
            cache.props.insert(&format!("_p{}", n), format!("m{}", n));
            cache
        });

        Ok(MinifyOutput {
            code: format!("/*min*/{}", code.trim()),
            map: None,
            name_cache,
        })
    }
}

fn plugin_with(options: MinifyOptions) -> (MinifyPlugin, Arc<RecordingMinifier>) {
    let engine = Arc::new(RecordingMinifier::default());
    (MinifyPlugin::with_minifier(options, engine.clone()), engine)
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_format_defaults() {
    let (plugin, engine) = plugin_with(MinifyOptions::new());

    for format in [OutputFormat::Es, OutputFormat::Cjs, OutputFormat::Iife] {
        plugin
            .render("var a = 1;".to_string(), &OutputOptions::new(format))
            .await
            .unwrap();
    }

    let calls = engine.calls();
    assert_eq!((calls[0].module, calls[0].toplevel), (true, false));
    assert_eq!((calls[1].module, calls[1].toplevel), (false, true));
    assert_eq!((calls[2].module, calls[2].toplevel), (false, false));
    assert!(calls.iter().all(|call| !call.source_map));
}

#[tokio::test]
async fn test_esm_alias_is_module() {
    let (plugin, engine) = plugin_with(MinifyOptions::new());
    let output = OutputOptions::new("esm".parse().unwrap());

    plugin.render("var a = 1;".to_string(), &output).await.unwrap();

    assert!(engine.calls()[0].module);
}

#[tokio::test]
async fn test_caller_config_overrides_format_defaults() {
    let options = MinifyOptions::new().with_toplevel(false).with_module(true);
    let (plugin, engine) = plugin_with(options);

    plugin
        .render("var a = 1;".to_string(), &OutputOptions::new(OutputFormat::Cjs))
        .await
        .unwrap();

    let call = &engine.calls()[0];
    assert!(call.module);
    assert!(!call.toplevel);
}

#[tokio::test]
async fn test_source_map_follows_output() {
    let (plugin, engine) = plugin_with(MinifyOptions::new());

    for sourcemap in ["true", "inline", "hidden", "false", ""] {
        let sourcemap: SourceMapOption = sourcemap.parse().unwrap();
        let output = OutputOptions::new(OutputFormat::Es).with_sourcemap(sourcemap);
        plugin.render("var a = 1;".to_string(), &output).await.unwrap();
    }

    let flags: Vec<bool> = engine.calls().iter().map(|call| call.source_map).collect();
    assert_eq!(flags, vec![true, true, true, false, true]);
}

#[test]
fn test_source_map_is_not_configurable() {
    let result = serde_json::from_str::<MinifyOptions>(r#"{"sourceMap": false}"#);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_success_returns_engine_result() {
    let (plugin, _engine) = plugin_with(MinifyOptions::new());

    let rendered = plugin
        .render("  var a = 1;  ".to_string(), &OutputOptions::new(OutputFormat::Es))
        .await
        .unwrap();

    assert_eq!(rendered.code, "/*min*/var a = 1;");
    assert!(rendered.map.is_none());
}

#[tokio::test]
async fn test_name_cache_written_back() {
    let cache = SharedNameCache::new(NameCache::new());
    let (plugin, engine) = plugin_with(MinifyOptions::new().with_name_cache(cache.clone()));
    let output = OutputOptions::new(OutputFormat::Es);

    plugin.render("a.x".to_string(), &output).await.unwrap();
    assert_eq!(cache.snapshot().props.get("_p0"), Some("m0"));

    // The second run starts from the names of the first
    plugin.render("a.x".to_string(), &output).await.unwrap();
    let snapshot = cache.snapshot();
    assert_eq!(snapshot.props.get("_p0"), Some("m0"));
    assert_eq!(snapshot.props.get("_p1"), Some("m1"));

    let calls = engine.calls();
    assert_eq!(calls[0].name_cache.as_ref().map(NameCache::len), Some(0));
    assert_eq!(calls[1].name_cache.as_ref().map(NameCache::len), Some(1));
    assert!(plugin.options().name_cache.as_ref().unwrap().ptr_eq(&cache));
}

#[tokio::test]
async fn test_without_name_cache_nothing_is_written() {
    let (plugin, engine) = plugin_with(MinifyOptions::new());

    plugin
        .render("a.x".to_string(), &OutputOptions::new(OutputFormat::Es))
        .await
        .unwrap();

    assert!(engine.calls()[0].name_cache.is_none());
    assert!(plugin.options().name_cache.is_none());
}

#[tokio::test]
async fn test_failure_is_reraised_unchanged_and_logged() {
    let error = MinifyError::at("Unexpected token", 2, 4);
    let engine = Arc::new(RecordingMinifier::failing(error.clone()));
    let cache = SharedNameCache::new(NameCache::new());
    let plugin = MinifyPlugin::with_minifier(
        MinifyOptions::new().with_name_cache(cache.clone()),
        engine,
    );

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let source = "const ok = 1;\nvar = 1;\nconsole.log(ok);";
    let result = plugin
        .render(source.to_string(), &OutputOptions::new(OutputFormat::Es))
        .await;

    assert_eq!(result.unwrap_err(), error);
    assert!(cache.snapshot().is_empty());

    let logged = logs.contents();
    assert!(logged.contains("Minification failed"), "{logged}");
    assert!(logged.contains("var = 1;"), "{logged}");
    assert!(logged.contains("Unexpected token"), "{logged}");
}

#[tokio::test]
async fn test_failure_without_position_logs_message() {
    let engine = Arc::new(RecordingMinifier::failing(MinifyError::new("engine crashed")));
    let plugin = MinifyPlugin::with_minifier(MinifyOptions::new(), engine);

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let error = plugin
        .render("var a;".to_string(), &OutputOptions::new(OutputFormat::Cjs))
        .await
        .unwrap_err();

    assert_eq!(error.message, "engine crashed");
    assert!(logs.contents().contains("engine crashed"));
}

#[tokio::test]
async fn test_concurrent_outputs_do_not_share_options() {
    let (plugin, engine) = plugin_with(MinifyOptions::new());
    let cjs = OutputOptions::new(OutputFormat::Cjs).with_sourcemap(true);
    let es = OutputOptions::new(OutputFormat::Es);

    let (first, second) = futures::join!(
        plugin.render("var a = 1;".to_string(), &cjs),
        plugin.render("var b = 2;".to_string(), &es),
    );
    first.unwrap();
    second.unwrap();

    let calls = engine.calls();
    assert_eq!(calls.len(), 2);
    let cjs_call = calls.iter().find(|call| call.toplevel).unwrap();
    let es_call = calls.iter().find(|call| call.module).unwrap();
    assert!(!cjs_call.module && cjs_call.source_map);
    assert!(!es_call.toplevel && !es_call.source_map);

    // Shared configuration is never touched by derivation
    assert_eq!(plugin.options().module, None);
    assert_eq!(plugin.options().toplevel, None);
}

#[tokio::test]
async fn test_disabled_compress_and_mangle_reach_engine() {
    let options = MinifyOptions {
        compress: Some(Toggle::Enabled(false)),
        mangle: Some(Toggle::Enabled(false)),
        ..MinifyOptions::default()
    };
    let (plugin, engine) = plugin_with(options);

    plugin
        .render("var a;".to_string(), &OutputOptions::new(OutputFormat::Es))
        .await
        .unwrap();

    let call = &engine.calls()[0];
    assert!(call.compress.is_none());
    assert!(call.mangle.is_none());
}

struct BreakingPlugin;

#[async_trait]
impl Plugin for BreakingPlugin {
    fn name(&self) -> &str {
        "breaking"
    }

    async fn render_chunk(
        &self,
        _code: &str,
        _chunk: &RenderedChunk,
        _output: &OutputOptions,
    ) -> Result<Option<RenderedOutput>> {
        Ok(Some(RenderedOutput::new("var = 1")))
    }
}

#[tokio::test]
async fn test_plugin_chain_reports_engine_error() {
    let mut manager = PluginManager::new();
    manager.register(Arc::new(BreakingPlugin));
    manager.register(Arc::new(MinifyPlugin::default()));

    let error = manager
        .render_chunk(
            "var a = 1;".to_string(),
            &RenderedChunk::new("index.js"),
            &OutputOptions::new(OutputFormat::Es),
        )
        .await
        .unwrap_err();

    match error {
        UltraError::Minify(error) => {
            assert!(!error.message.is_empty());
            assert_eq!(error.line(), Some(1));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_plugin_chain_passes_code_along() {
    let (plugin, _engine) = plugin_with(MinifyOptions::new());
    let mut manager = PluginManager::new();
    manager.register(Arc::new(plugin));

    let rendered = manager
        .render_chunk(
            "var a = 1;".to_string(),
            &RenderedChunk::new("index.js"),
            &OutputOptions::new(OutputFormat::Cjs),
        )
        .await
        .unwrap();

    assert_eq!(rendered.code, "/*min*/var a = 1;");
}
