//! Partial configuration trees.
//!
//! A `ConfigNode` mirrors [`KilnOptions`](crate::KilnOptions) field for field,
//! with every field optional. Presets declare nodes, and the resolver folds
//! them into an accumulator node with [`Merge`].

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::merge::{Merge, merge_nested, merge_values, replace};
use crate::options::{InjectBinding, OutputFormat, ServeStatic};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigNode {
    pub preset: Option<String>,
    pub log_level: Option<String>,
    pub dev: Option<bool>,
    pub root_dir: Option<PathBuf>,
    pub src_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub output: Option<OutputDirsNode>,
    pub base_url: Option<String>,
    pub entry: Option<String>,
    pub node: Option<bool>,
    pub no_externals: Option<bool>,
    pub serve_static: Option<ServeStatic>,
    pub minify: Option<bool>,
    pub source_map: Option<bool>,
    pub inline_dynamic_imports: Option<bool>,
    pub timing: Option<bool>,
    pub alias: Option<IndexMap<String, String>>,
    pub replace: Option<IndexMap<String, String>>,
    pub inject: Option<IndexMap<String, InjectBinding>>,
    pub module_side_effects: Option<Vec<String>>,
    pub runtime_config: Option<Value>,
    pub commands: Option<CommandsNode>,
    pub bundle: Option<BundleNode>,
    pub compat: Option<CompatNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputDirsNode {
    pub dir: Option<PathBuf>,
    pub server_dir: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsNode {
    pub preview: Option<String>,
    pub deploy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleNode {
    pub preserve_entry_signatures: Option<bool>,
    pub output: Option<BundleOutputNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleOutputNode {
    pub entry_file_names: Option<String>,
    pub format: Option<OutputFormat>,
    pub hoist_transitive_imports: Option<bool>,
    pub single_chunk: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompatNode {
    pub scheme_imports: Option<bool>,
    pub preamble: Option<IndexMap<String, String>>,
}

impl ConfigNode {
    /// Parse a node from a JSON-shaped value, rejecting unknown keys.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::invalid("config", e))
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Merge for ConfigNode {
    fn merge(&mut self, other: Self) -> Result<()> {
        replace(&mut self.preset, other.preset);
        replace(&mut self.log_level, other.log_level);
        replace(&mut self.dev, other.dev);
        replace(&mut self.root_dir, other.root_dir);
        replace(&mut self.src_dir, other.src_dir);
        replace(&mut self.build_dir, other.build_dir);
        merge_nested(&mut self.output, other.output)?;
        replace(&mut self.base_url, other.base_url);
        replace(&mut self.entry, other.entry);
        replace(&mut self.node, other.node);
        replace(&mut self.no_externals, other.no_externals);
        replace(&mut self.serve_static, other.serve_static);
        replace(&mut self.minify, other.minify);
        replace(&mut self.source_map, other.source_map);
        replace(&mut self.inline_dynamic_imports, other.inline_dynamic_imports);
        replace(&mut self.timing, other.timing);
        merge_nested(&mut self.alias, other.alias)?;
        merge_nested(&mut self.replace, other.replace)?;
        merge_nested(&mut self.inject, other.inject)?;
        // Sequences are replaced, never concatenated.
        replace(&mut self.module_side_effects, other.module_side_effects);
        if let Some(update) = other.runtime_config {
            match self.runtime_config.as_mut() {
                Some(base) => merge_values(base, update, "runtime_config")?,
                None => self.runtime_config = Some(update),
            }
        }
        merge_nested(&mut self.commands, other.commands)?;
        merge_nested(&mut self.bundle, other.bundle)?;
        merge_nested(&mut self.compat, other.compat)?;
        Ok(())
    }
}

impl Merge for OutputDirsNode {
    fn merge(&mut self, other: Self) -> Result<()> {
        replace(&mut self.dir, other.dir);
        replace(&mut self.server_dir, other.server_dir);
        replace(&mut self.public_dir, other.public_dir);
        Ok(())
    }
}

impl Merge for CommandsNode {
    fn merge(&mut self, other: Self) -> Result<()> {
        replace(&mut self.preview, other.preview);
        replace(&mut self.deploy, other.deploy);
        Ok(())
    }
}

impl Merge for BundleNode {
    fn merge(&mut self, other: Self) -> Result<()> {
        replace(
            &mut self.preserve_entry_signatures,
            other.preserve_entry_signatures,
        );
        merge_nested(&mut self.output, other.output)
    }
}

impl Merge for BundleOutputNode {
    fn merge(&mut self, other: Self) -> Result<()> {
        replace(&mut self.entry_file_names, other.entry_file_names);
        replace(&mut self.format, other.format);
        replace(&mut self.hoist_transitive_imports, other.hoist_transitive_imports);
        replace(&mut self.single_chunk, other.single_chunk);
        Ok(())
    }
}

impl Merge for CompatNode {
    fn merge(&mut self, other: Self) -> Result<()> {
        replace(&mut self.scheme_imports, other.scheme_imports);
        merge_nested(&mut self.preamble, other.preamble)
    }
}
