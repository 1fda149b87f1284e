//! # kiln-target
//!
//! Built-in deployment presets and the render-chunk transforms that adapt
//! bundled output to a target runtime.
//!
//! - [`presets`]: `node`, `node-server`, `deno-deploy` (alias `deno`) and
//!   `deno-server`, plus [`builtin_registry`]
//! - [`detection`]: picks a preset from the environment and project files
//! - [`ImportRewriter`]: adds `node:` / `npm:` schemes to static imports
//! - [`PreambleInjector`]: imports runtime globals into entry chunks
//! - [`RenderPipeline`]: runs both passes over emitted chunks
//!
//! ```
//! use kiln_target::{Chunk, RenderPipeline, resolve_options};
//! use kiln_config::{ConfigNode, PresetDefinition};
//!
//! let seed = PresetDefinition::new(ConfigNode {
//!     preset: Some("deno-server".into()),
//!     ..Default::default()
//! });
//! let options = resolve_options(seed, std::path::Path::new(".")).unwrap();
//!
//! let pipeline = RenderPipeline::from_options(&options);
//! let mut chunk = Chunk::new("index.mjs", "import fs from 'fs';").entry(true);
//! pipeline.transform_chunk(&mut chunk).unwrap();
//! assert_eq!(chunk.code, "import fs from 'node:fs';");
//! ```

use std::path::Path;

use kiln_config::{ConfigDiscovery, KilnOptions, PresetDefinition, resolve_preset};

pub mod detection;
pub mod editor;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod pipeline;
pub mod preamble;
pub mod presets;
pub mod rewrite;
pub mod scan;
pub mod specifier;

pub use detection::{detect_preset, detect_preset_with};
pub use editor::{SourceEditor, TransformOutput};
pub use error::{Result, TransformError};
pub use pipeline::{Chunk, ChunkMeta, RenderChunkHook, RenderPipeline};
pub use preamble::{NO_REPLACE_MARKER, PreambleInjector};
pub use presets::builtin_registry;
pub use rewrite::{ImportRecord, ImportRewriter, collect_imports};
pub use scan::{StaticImport, find_static_imports};
pub use specifier::{
    ExternalModule, NODE_SCHEME, NPM_SCHEME, SpecifierKind, classify, is_builtin, is_http_import,
    resolve_external,
};

/// Resolve a seed configuration against the built-in presets.
///
/// When the seed names no preset, one is detected from `project_root`.
pub fn resolve_options(
    mut seed: PresetDefinition,
    project_root: &Path,
) -> kiln_config::Result<KilnOptions> {
    if seed.config.preset.is_none() {
        seed.config.preset = Some(detect_preset(project_root).to_string());
    }
    resolve_preset(seed, &builtin_registry())
}

/// Discover the project's configuration and resolve it.
pub fn load_options(project_root: &Path) -> kiln_config::Result<KilnOptions> {
    let seed = ConfigDiscovery::new(project_root).load()?;
    resolve_options(seed, project_root)
}
