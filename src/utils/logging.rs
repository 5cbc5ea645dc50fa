use crate::core::models::MinificationStats;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    /// Install the global subscriber. Output goes to stderr so minified code
    /// piped through stdout stays clean.
    pub fn init(verbose: bool) {
        let default_directive = if verbose {
            "ultra_minify=debug"
        } else {
            "ultra_minify=info"
        };

        let filter = EnvFilter::try_from_env("ULTRA_MINIFY_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        // A second init (tests, embedding hosts) keeps the first subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    pub fn minify_start(file_name: &str, format: &str) {
        debug!("⚡ Minifying: {} ({})", file_name, format);
    }

    pub fn minify_complete(file_name: &str, stats: &MinificationStats) {
        debug!("✅ {}: {}", file_name, stats);
    }

    pub fn name_cache_updated(entries: usize) {
        debug!("🔤 Name cache updated ({} entries)", entries);
    }

    /// Report a minification failure. `report` is a rendered code frame when
    /// one could be produced.
    pub fn minify_failed(report: &str) {
        error!("❌ Minification failed\n{}", report);
    }

    pub fn output_written(path: &str, bytes: usize) {
        info!("📦 {} ({} bytes)", path, bytes);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
