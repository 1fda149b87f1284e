//! Defaults that fill fields no preset set.

use serde_json::{Map, Value};
use std::path::PathBuf;

use super::{BundleOptions, BundleOutputOptions, Commands, CompatOptions, KilnOptions, OutputDirs};
use crate::error::{ConfigError, Result, value_kind};
use crate::node::ConfigNode;

pub const DEFAULT_ENTRY: &str = "#internal/kiln/entries/node-server";

const DEFAULT_PRESET_LABEL: &str = "custom";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_BUILD_DIR: &str = ".kiln";
const DEFAULT_OUTPUT_DIR: &str = ".output";
const DEFAULT_BASE_URL: &str = "/";
const DEFAULT_ENTRY_FILE_NAMES: &str = "index.mjs";

impl ConfigNode {
    /// Fill every missing field with its default and produce the resolved options.
    ///
    /// Directory defaults are derived from other fields: `src_dir` and
    /// `build_dir` from `root_dir`, the server and public directories from
    /// `output.dir`.
    pub fn into_options(mut self) -> Result<KilnOptions> {
        let runtime_config = match self.runtime_config.take() {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ConfigError::MergeTypeMismatch {
                    field: "runtime_config".to_string(),
                    expected: "a table",
                    found: value_kind(&other),
                });
            }
        };
        Ok(self.fill_defaults(runtime_config))
    }

    fn fill_defaults(self, runtime_config: Map<String, Value>) -> KilnOptions {
        let root_dir = self.root_dir.unwrap_or_else(|| PathBuf::from("."));
        let src_dir = self.src_dir.unwrap_or_else(|| root_dir.clone());
        let build_dir = self
            .build_dir
            .unwrap_or_else(|| root_dir.join(DEFAULT_BUILD_DIR));

        let output = self.output.unwrap_or_default();
        let output_dir = output
            .dir
            .unwrap_or_else(|| root_dir.join(DEFAULT_OUTPUT_DIR));
        let output = OutputDirs {
            server_dir: output
                .server_dir
                .unwrap_or_else(|| output_dir.join("server")),
            public_dir: output
                .public_dir
                .unwrap_or_else(|| output_dir.join("public")),
            dir: output_dir,
        };

        let commands = self.commands.unwrap_or_default();
        let bundle = self.bundle.unwrap_or_default();
        let bundle_output = bundle.output.unwrap_or_default();
        let compat = self.compat.unwrap_or_default();

        KilnOptions {
            preset: self
                .preset
                .unwrap_or_else(|| DEFAULT_PRESET_LABEL.to_string()),
            log_level: self
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            dev: self.dev.unwrap_or(false),
            root_dir,
            src_dir,
            build_dir,
            output,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            entry: self.entry.unwrap_or_else(|| DEFAULT_ENTRY.to_string()),
            node: self.node.unwrap_or(true),
            no_externals: self.no_externals.unwrap_or(false),
            serve_static: self.serve_static.unwrap_or_default(),
            minify: self.minify.unwrap_or(false),
            source_map: self.source_map.unwrap_or(true),
            inline_dynamic_imports: self.inline_dynamic_imports.unwrap_or(false),
            timing: self.timing.unwrap_or(false),
            alias: self.alias.unwrap_or_default(),
            replace: self.replace.unwrap_or_default(),
            inject: self.inject.unwrap_or_default(),
            module_side_effects: self.module_side_effects.unwrap_or_default(),
            runtime_config,
            commands: Commands {
                preview: commands.preview.unwrap_or_default(),
                deploy: commands.deploy.unwrap_or_default(),
            },
            bundle: BundleOptions {
                preserve_entry_signatures: bundle.preserve_entry_signatures.unwrap_or(true),
                output: BundleOutputOptions {
                    entry_file_names: bundle_output
                        .entry_file_names
                        .unwrap_or_else(|| DEFAULT_ENTRY_FILE_NAMES.to_string()),
                    format: bundle_output.format.unwrap_or_default(),
                    hoist_transitive_imports: bundle_output
                        .hoist_transitive_imports
                        .unwrap_or(true),
                    single_chunk: bundle_output.single_chunk,
                },
            },
            compat: CompatOptions {
                scheme_imports: compat.scheme_imports.unwrap_or(false),
                preamble: compat.preamble.unwrap_or_default(),
            },
        }
    }
}

impl Default for KilnOptions {
    fn default() -> Self {
        ConfigNode::default().fill_defaults(Map::new())
    }
}
