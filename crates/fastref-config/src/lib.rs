//! `fastref.toml` loading and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Once;

use fastref_core::{FqName, FqNameError, PackageName};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

/// Environment variable that points at an explicit config file.
pub const FASTREF_CONFIG_ENV_VAR: &str = "FASTREF_CONFIG_PATH";

/// Top-level `fastref.toml`.
///
/// ```toml
/// target = "org.junit.Test"
/// conflicts = ["org.testng.Test"]
/// type_alias_packages = []
/// implicit_imports = ["kotlin"]
///
/// [logging]
/// level = "info"
/// json = false
/// stderr = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FastrefConfig {
    /// Fully-qualified name of the class being searched for.
    #[serde(default)]
    pub target: Option<String>,

    /// Classes sharing the target's simple name that usages must be told apart from.
    #[serde(default)]
    pub conflicts: Vec<String>,

    /// Packages known to declare type aliases whose names may shadow the target.
    #[serde(default)]
    pub type_alias_packages: Vec<String>,

    /// Packages every file sees as if wildcard-imported.
    #[serde(default)]
    pub implicit_imports: Vec<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr. When disabled, events are filtered but discarded.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" | "none" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level with `RUST_LOG` merged on top.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid name in `{field}`: {source}")]
    InvalidName {
        field: &'static str,
        #[source]
        source: FqNameError,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl FastrefConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    /// Parses and validates a config document.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: FastrefConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every configured name parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target_name()?;
        self.conflict_names()?;
        self.type_alias_package_names()?;
        self.implicit_import_packages()?;
        Ok(())
    }

    pub fn target_name(&self) -> Result<Option<FqName>, ConfigError> {
        self.target
            .as_deref()
            .map(|text| parse_fq("target", text))
            .transpose()
    }

    pub fn conflict_names(&self) -> Result<Vec<FqName>, ConfigError> {
        self.conflicts
            .iter()
            .map(|text| parse_fq("conflicts", text))
            .collect()
    }

    pub fn type_alias_package_names(&self) -> Result<Vec<PackageName>, ConfigError> {
        self.type_alias_packages
            .iter()
            .map(|text| parse_package("type_alias_packages", text))
            .collect()
    }

    pub fn implicit_import_packages(&self) -> Result<Vec<PackageName>, ConfigError> {
        self.implicit_imports
            .iter()
            .map(|text| parse_package("implicit_imports", text))
            .collect()
    }
}

fn parse_fq(field: &'static str, text: &str) -> Result<FqName, ConfigError> {
    FqName::parse(text.trim()).map_err(|source| ConfigError::InvalidName { field, source })
}

fn parse_package(field: &'static str, text: &str) -> Result<PackageName, ConfigError> {
    parse_fq(field, text).map(|name| PackageName::from(name.as_qualified().clone()))
}

/// Locates the config file for a scan root.
///
/// Search order:
/// 1) `FASTREF_CONFIG_PATH` (absolute or relative to `root`)
/// 2) `fastref.toml` in `root`
/// 3) `.fastref.toml` in `root`
pub fn discover_config_path(root: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(FASTREF_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["fastref.toml", ".fastref.toml"]
        .into_iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Loads the config for `root`, falling back to [`FastrefConfig::default`] when
/// no file is present.
pub fn load_for_root(root: &Path) -> Result<(FastrefConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(root) else {
        return Ok((FastrefConfig::default(), None));
    };

    let config = FastrefConfig::load_from_path(&path)?;
    tracing::debug!(target: "fastref.config", path = %path.display(), "loaded config");
    Ok((config, Some(path)))
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let make_writer = if config.stderr {
            BoxMakeWriter::new(std::io::stderr)
        } else {
            BoxMakeWriter::new(std::io::sink)
        };

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
