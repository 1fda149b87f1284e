//! Fully resolved build options.
//!
//! `KilnOptions` is the terminal configuration produced once per build by the
//! preset resolver. Every field is bound; downstream code reads it and never
//! mutates it.

mod defaults;
mod types;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

pub use defaults::DEFAULT_ENTRY;
pub use types::{InjectBinding, OutputFormat, ServeStatic};

/// Resolved build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KilnOptions {
    /// Normalized name of the root preset
    pub preset: String,

    pub log_level: String,

    /// Development build
    pub dev: bool,

    pub root_dir: PathBuf,
    pub src_dir: PathBuf,

    /// Scratch directory for generated build files
    pub build_dir: PathBuf,

    pub output: OutputDirs,

    pub base_url: String,

    /// Server entry module (usually a `#internal/...` virtual id)
    pub entry: String,

    /// Output may rely on Node.js APIs
    pub node: bool,

    /// Bundle every dependency instead of tracing externals into `node_modules`
    pub no_externals: bool,

    pub serve_static: ServeStatic,
    pub minify: bool,
    pub source_map: bool,
    pub inline_dynamic_imports: bool,
    pub timing: bool,

    /// Import aliases (e.g., "~" → "src")
    pub alias: IndexMap<String, String>,

    /// Build-time text replacements
    pub replace: IndexMap<String, String>,

    /// Free globals the bundler binds to imports
    pub inject: IndexMap<String, InjectBinding>,

    pub module_side_effects: Vec<String>,

    /// Free-form runtime configuration exposed to the server
    pub runtime_config: Map<String, Value>,

    pub commands: Commands,
    pub bundle: BundleOptions,
    pub compat: CompatOptions,
}

/// Output directory layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDirs {
    pub dir: PathBuf,
    pub server_dir: PathBuf,
    pub public_dir: PathBuf,
}

/// Commands printed after a build to preview or deploy the output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commands {
    pub preview: String,
    pub deploy: String,
}

/// Options forwarded to the bundler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleOptions {
    /// Keep the entry module's export signature intact
    pub preserve_entry_signatures: bool,
    pub output: BundleOutputOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleOutputOptions {
    pub entry_file_names: String,
    pub format: OutputFormat,
    pub hoist_transitive_imports: bool,

    /// Force every module into one chunk with this name
    pub single_chunk: Option<String>,
}

/// Output adaptations for the target runtime's module semantics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatOptions {
    /// Rewrite builtin and bare specifiers to `node:` / `npm:` schemes
    pub scheme_imports: bool,

    /// Globals whose entry chunks get a compatibility import (global → module)
    pub preamble: IndexMap<String, String>,
}
