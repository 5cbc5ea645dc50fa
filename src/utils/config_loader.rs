use crate::core::name_cache::NameCache;
use crate::core::options::{MinifyOptions, Toggle};
use crate::utils::{Logger, Result, UltraError};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "ultra-minify.config.json";

/// Values given on the command line; each one overrides the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub module: Option<bool>,
    pub toplevel: Option<bool>,
    pub no_compress: bool,
    pub no_mangle: bool,
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `explicit` or from `ultra-minify.config.json`
    /// in `root`. A missing default file is not an error; a missing explicit
    /// file is.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Option<MinifyOptions>> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                if !default_path.exists() {
                    Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
                    return Ok(None);
                }
                default_path
            }
        };

        Self::load_from_file(&config_path).map(Some)
    }

    pub fn load_from_file(config_path: &Path) -> Result<MinifyOptions> {
        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(config_path)?;
        let config: MinifyOptions = serde_json::from_str(&content).map_err(|e| {
            UltraError::config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;

        Logger::debug("✅ Config file loaded successfully");
        Ok(config)
    }

    /// Merge file config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(file_config: Option<MinifyOptions>, cli: &CliOverrides) -> MinifyOptions {
        let mut overrides = MinifyOptions {
            module: cli.module,
            toplevel: cli.toplevel,
            ..MinifyOptions::default()
        };
        if cli.no_compress {
            overrides.compress = Some(Toggle::Enabled(false));
        }
        if cli.no_mangle {
            overrides.mangle = Some(Toggle::Enabled(false));
        }

        file_config.unwrap_or_default().merge(overrides)
    }

    /// Generate example config file
    pub fn generate_example() -> String {
        r#"{
  "compress": { "dropConsole": false, "dropDebugger": true },
  "mangle": { "properties": { "regex": "^_" } },
  "format": { "comments": "some" }
}"#
        .to_string()
    }
}

/// Name cache persisted as JSON between runs
pub struct NameCacheFile {
    path: PathBuf,
}

impl NameCacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache; a file that does not exist yet yields an empty cache
    pub fn load(&self) -> Result<NameCache> {
        if !self.path.exists() {
            return Ok(NameCache::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(NameCache::default());
        }

        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, cache: &NameCache) -> Result<()> {
        let content = serde_json::to_string_pretty(cache)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
