//! Project configuration module.
//!
//! Handles loading, validating, and merging `mw-gadgets.toml`. Three layers
//! are merged, each overriding the one before:
//!
//! ```text
//! stock defaults
//! mw-gadgets.toml              # project root, optional
//! environment variables        # GADGET_NAMESPACE, SERVER_DEV_ORIGIN, SERVER_PREVIEW_ORIGIN
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_root = "src"                            # Holds gadgets/ and mediawiki/
//! manifest = "gadgets/gadgets-definition.yaml"   # Relative to source_root
//! dist_dir = "dist"                              # Bundler output, rollup bundles
//! entrypoint = "load.js"                         # Relative to dist_dir
//! namespace = "ext.gadget"                       # Registration name prefix
//!
//! [server]
//! dev_origin = "http://localhost:5173"
//! preview_origin = "http://localhost:4173"
//!
//! [transform]
//! engine = "esbuild"        # or "none" to write generated code untouched
//! esbuild_path = "esbuild"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! namespace = "ext.wiki"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::urls::StaticUrls;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project config file.
pub const CONFIG_FILE: &str = "mw-gadgets.toml";

/// Environment variables that override config keys.
const ENV_OVERRIDES: &[(&str, &[&str])] = &[
    ("GADGET_NAMESPACE", &["namespace"]),
    ("SERVER_DEV_ORIGIN", &["server", "dev_origin"]),
    ("SERVER_PREVIEW_ORIGIN", &["server", "preview_origin"]),
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `mw-gadgets.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub source_root: PathBuf,
    pub manifest: PathBuf,
    pub dist_dir: PathBuf,
    pub entrypoint: PathBuf,
    pub namespace: String,
    pub server: ServerConfig,
    pub transform: TransformConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            manifest: PathBuf::from("gadgets/gadgets-definition.yaml"),
            dist_dir: PathBuf::from("dist"),
            entrypoint: PathBuf::from("load.js"),
            namespace: crate::payload::DEFAULT_NAMESPACE.to_string(),
            server: ServerConfig::default(),
            transform: TransformConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::Validation("namespace must not be empty".into()));
        }
        if self
            .namespace
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '\\'))
        {
            return Err(ConfigError::Validation(format!(
                "namespace must not contain quotes or whitespace: {:?}",
                self.namespace
            )));
        }
        for (key, origin) in [
            ("server.dev_origin", &self.server.dev_origin),
            ("server.preview_origin", &self.server.preview_origin),
        ] {
            StaticUrls::new(origin)
                .map_err(|e| ConfigError::Validation(format!("{key}: {e}")))?;
        }
        if self.entrypoint.as_os_str().is_empty() {
            return Err(ConfigError::Validation("entrypoint must not be empty".into()));
        }
        Ok(())
    }

    /// `<root>/<source_root>`
    pub fn source_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.source_root)
    }

    /// `<root>/<source_root>/<manifest>`
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        self.source_dir(root).join(&self.manifest)
    }

    /// `<root>/<dist_dir>`
    pub fn dist_path(&self, root: &Path) -> PathBuf {
        root.join(&self.dist_dir)
    }

    /// `<root>/<dist_dir>/<entrypoint>`
    pub fn entrypoint_path(&self, root: &Path) -> PathBuf {
        self.dist_path(root).join(&self.entrypoint)
    }

    /// Origin URLs are served from: preview server for built output, dev
    /// server otherwise.
    pub fn origin(&self, preview: bool) -> &str {
        if preview {
            &self.server.preview_origin
        } else {
            &self.server.dev_origin
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub dev_origin: String,
    pub preview_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dev_origin: "http://localhost:5173".to_string(),
            preview_origin: "http://localhost:4173".to_string(),
        }
    }
}

/// Which transform generated code is run through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Esbuild,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    pub engine: Engine,
    pub esbuild_path: PathBuf,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            esbuild_path: PathBuf::from("esbuild"),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ProjectConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `mw-gadgets.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Build an overlay from environment variables. Empty values are ignored.
pub fn env_overlay(lookup: impl Fn(&str) -> Option<String>) -> Option<toml::Value> {
    let mut overlay: Option<toml::Value> = None;
    for (var, path) in ENV_OVERRIDES {
        let Some(value) = lookup(var).filter(|v| !v.is_empty()) else {
            continue;
        };
        let nested = path.iter().rev().fold(toml::Value::String(value), |inner, key| {
            let mut table = toml::Table::new();
            table.insert(key.to_string(), inner);
            toml::Value::Table(table)
        });
        overlay = Some(match overlay {
            Some(acc) => merge_toml(acc, nested),
            None => nested,
        });
    }
    overlay
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = Option<toml::Value>>,
) -> Result<ProjectConfig, ConfigError> {
    let merged = overlays.into_iter().flatten().fold(base, merge_toml);
    let config: ProjectConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config for the project rooted at `root`.
///
/// Merges the config file and then the environment on top of stock
/// defaults, rejects unknown keys, and validates the result.
pub fn load_config(root: &Path) -> Result<ProjectConfig, ConfigError> {
    let file = load_raw_config(root)?;
    let env = env_overlay(|var| std::env::var(var).ok());
    resolve_config(stock_defaults_value(), [file, env])
}

/// Returns a fully-commented stock `mw-gadgets.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mw-gadgets Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# GADGET_NAMESPACE, SERVER_DEV_ORIGIN and SERVER_PREVIEW_ORIGIN in the
# environment override the matching keys below.
# Unknown keys will cause an error.

# Directory holding gadgets/ and mediawiki/, relative to this file.
source_root = "src"

# Gadget manifest, relative to source_root.
manifest = "gadgets/gadgets-definition.yaml"

# Bundler output directory. Rolled-up gadget-impl.js files and the
# entrypoint are written here.
dist_dir = "dist"

# Entrypoint file name, relative to dist_dir.
entrypoint = "load.js"

# Prefix of every registered module name: <namespace>.<gadget>@<hash>
namespace = "ext.gadget"

# ---------------------------------------------------------------------------
# Static file servers
# ---------------------------------------------------------------------------
[server]
# Origin of the bundler's dev server.
dev_origin = "http://localhost:5173"

# Origin serving built output (used with --preview and by rollup).
preview_origin = "http://localhost:4173"

# ---------------------------------------------------------------------------
# Generated code transform
# ---------------------------------------------------------------------------
[transform]
# "esbuild" runs generated code through esbuild (needed for --minify).
# "none" writes it untouched.
engine = "esbuild"

# esbuild binary, looked up on PATH when not absolute.
esbuild_path = "esbuild"
"##
}
