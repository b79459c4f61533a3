//!
//! Configuration loading and defaults for snipmd.
//!
//! Configuration lives in `.snipmd.toml`, found by walking up from the working
//! directory or passed explicitly. User values are merged over built-in
//! defaults into the [`TransformOptions`] the transform runs with.

use crate::formatter::FormatterOptions;
use crate::resolver::{AliasTable, normalize_path};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".snipmd.toml";

/// Alias available in every project, relative to the project root.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[("@code", "src/code-snippets")];

/// Probed in this order before any user-supplied extension.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".ts",
    ".tsx",
    ".js",
    ".jsx",
    ".mjs",
    ".mts",
    "/index.ts",
    "/index.tsx",
    "/index.js",
    "/index.jsx",
];

/// Represents the configuration file as written by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SnippetConfig {
    /// Base directory for relative alias paths (default: the config file's directory)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Glob patterns excluded from file discovery
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Extensions appended after the defaults
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Document extensions parsed as MDX (default: `["mdx"]`)
    #[serde(default)]
    pub mdx_extensions: Option<Vec<String>>,

    /// Alias prefix -> base path; overrides defaults with the same prefix
    #[serde(default)]
    pub aliases: IndexMap<String, PathBuf>,

    #[serde(default)]
    pub formatter: FormatterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FormatterConfig {
    /// Command to run (first element is the binary, rest are arguments)
    #[serde(default = "default_formatter_command")]
    pub command: Vec<String>,

    /// Options forwarded to the formatter; override defaults key by key
    #[serde(default)]
    pub options: FormatterOptions,
}

fn default_formatter_command() -> Vec<String> {
    vec!["prettier".to_string()]
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            command: default_formatter_command(),
            options: FormatterOptions::new(),
        }
    }
}

impl SnippetConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Everything the transform needs, after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    pub aliases: AliasTable,
    pub extensions: Vec<String>,
    /// Documents with these extensions get ESM blocks and JSX-aware parsing.
    pub mdx_extensions: Vec<String>,
    pub formatter_options: FormatterOptions,
}

impl TransformOptions {
    /// Built-in defaults for a project rooted at `root`.
    pub fn defaults(root: &Path) -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(alias, base)| (*alias, normalize_path(&root.join(base))))
            .collect();

        let mut formatter_options = FormatterOptions::new();
        formatter_options.insert("printWidth".to_string(), serde_json::Value::from(80));
        formatter_options.insert("tabWidth".to_string(), serde_json::Value::from(2));

        Self {
            aliases,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            mdx_extensions: vec!["mdx".to_string()],
            formatter_options,
        }
    }

    /// Merge `config` over the defaults.
    ///
    /// Aliases and formatter options override per key, extensions are
    /// appended, and `mdx-extensions` replaces the default list. Relative
    /// alias paths resolve against `root`.
    pub fn from_config(config: &SnippetConfig, root: &Path) -> Self {
        let mut options = Self::defaults(root);

        for (alias, base) in &config.aliases {
            options.aliases.insert(alias.clone(), normalize_path(&root.join(base)));
        }
        options.extensions.extend(config.extensions.iter().cloned());
        if let Some(mdx_extensions) = &config.mdx_extensions {
            options.mdx_extensions = mdx_extensions.clone();
        }
        for (key, value) in &config.formatter.options {
            options.formatter_options.insert(key.clone(), value.clone());
        }

        options
    }
}

/// A configuration together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: SnippetConfig,
    /// Config file path; `None` when running on defaults
    pub path: Option<PathBuf>,
    /// Project root that relative paths resolve against
    pub root: PathBuf,
}

impl LoadedConfig {
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions::from_config(&self.config, &self.root)
    }
}

/// Find `.snipmd.toml` in `start` or any parent. Stops at a repository root
/// (a directory containing `.git`).
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            log::debug!("Found config file at {}", candidate.display());
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}

/// Load the explicit config file, or discover one from `cwd`, or fall back to
/// defaults rooted at `cwd`.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedConfig, ConfigError> {
    let path = match explicit {
        Some(path) => Some(normalize_path(&cwd.join(path))),
        None => discover_config(cwd),
    };

    let Some(path) = path else {
        log::debug!("No config file found; using defaults");
        return Ok(LoadedConfig {
            config: SnippetConfig::default(),
            path: None,
            root: cwd.to_path_buf(),
        });
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
        source,
        path: path.display().to_string(),
    })?;
    let config = SnippetConfig::from_toml(&content)?;

    let config_dir = path.parent().unwrap_or(cwd).to_path_buf();
    let root = match &config.root {
        Some(root) => normalize_path(&config_dir.join(root)),
        None => config_dir,
    };

    Ok(LoadedConfig {
        config,
        path: Some(path),
        root,
    })
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
