//! Deno presets.
//!
//! Deno resolves Node builtins and npm packages only through explicit
//! `node:` / `npm:` specifiers and has no implicit `process` global, so the
//! `deno-server` preset turns on the scheme-import rewriter and the `process`
//! preamble.

use indexmap::IndexMap;
use kiln_config::{
    BundleNode, BundleOutputNode, CommandsNode, CompatNode, ConfigNode, InjectBinding, OutputFormat,
    Preset, PresetDefinition, ServeStatic,
};

use super::NODE_SERVER;

pub const DENO_DEPLOY_ENTRY: &str = "#internal/kiln/entries/deno-deploy";
pub const DENO_SERVER_ENTRY: &str = "#internal/kiln/entries/deno-server";

const DENO_DEPLOY_COMMAND: &str =
    "cd ./ && deployctl deploy --project=<project_name> server/index.ts";
const DENO_RUN_PERMISSIONS: &str = "deno run --unstable --allow-net --allow-read --allow-env";
const TIMER_GLOBALS: &[&str] = &[
    "setTimeout",
    "clearTimeout",
    "setInterval",
    "clearInterval",
    "setImmediate",
    "clearImmediate",
];

/// Deno Deploy: a single `index.ts` module with every dependency bundled
pub fn deno_deploy() -> PresetDefinition {
    PresetDefinition::new(ConfigNode {
        entry: Some(DENO_DEPLOY_ENTRY.to_string()),
        node: Some(false),
        no_externals: Some(true),
        serve_static: Some(ServeStatic::Deno),
        commands: Some(CommandsNode {
            preview: Some(String::new()),
            deploy: Some(DENO_DEPLOY_COMMAND.to_string()),
        }),
        bundle: Some(BundleNode {
            preserve_entry_signatures: Some(false),
            output: Some(BundleOutputNode {
                entry_file_names: Some("index.ts".to_string()),
                format: Some(OutputFormat::Esm),
                single_chunk: Some("index".to_string()),
                ..Default::default()
            }),
        }),
        ..Default::default()
    })
}

/// Node-compatible server running under Deno
///
/// A function preset: in `dev` mode the preview command watches for changes.
pub fn deno_server() -> Preset {
    Preset::function(|accumulated| {
        let preview = if accumulated.dev == Some(true) {
            format!("{DENO_RUN_PERMISSIONS} --watch ./server/index.mjs")
        } else {
            format!("{DENO_RUN_PERMISSIONS} ./server/index.mjs")
        };

        PresetDefinition::new(ConfigNode {
            entry: Some(DENO_SERVER_ENTRY.to_string()),
            commands: Some(CommandsNode {
                preview: Some(preview),
                ..Default::default()
            }),
            bundle: Some(BundleNode {
                output: Some(BundleOutputNode {
                    hoist_transitive_imports: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            inject: Some(inject_globals()),
            compat: Some(CompatNode {
                scheme_imports: Some(true),
                preamble: Some(IndexMap::from([(
                    "process".to_string(),
                    "node:process".to_string(),
                )])),
            }),
            ..Default::default()
        })
        .extends(NODE_SERVER)
    })
}

/// Node globals the bundler binds to module imports for Deno.
pub fn inject_globals() -> IndexMap<String, InjectBinding> {
    let mut globals = IndexMap::new();
    globals.insert("process".to_string(), InjectBinding::Module("process".to_string()));
    globals.insert("global".to_string(), InjectBinding::Module("global".to_string()));
    globals.insert(
        "Buffer".to_string(),
        InjectBinding::Export("buffer".to_string(), "Buffer".to_string()),
    );
    for timer in TIMER_GLOBALS {
        globals.insert(
            timer.to_string(),
            InjectBinding::Export("timers".to_string(), timer.to_string()),
        );
    }
    globals
}
