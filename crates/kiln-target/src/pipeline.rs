//! Render-chunk transform pipeline.
//!
//! Hooks run in registration order on each chunk. A hook that reports a
//! change replaces the chunk text and appends its map to the chunk's
//! `sourcemap_chain`; a hook that reports nothing leaves the chunk alone.
//! Independent chunks are transformed in parallel.

use std::fmt;

use kiln_config::KilnOptions;
use oxc_sourcemap::SourceMap;
use rayon::prelude::*;
use tracing::debug;

use crate::editor::TransformOutput;
use crate::error::Result;
use crate::preamble::PreambleInjector;
use crate::rewrite::ImportRewriter;

/// What a hook knows about the chunk it is transforming
#[derive(Debug, Clone, Copy)]
pub struct ChunkMeta<'a> {
    pub file_name: &'a str,
    pub is_entry: bool,
    /// Whether the orchestrator wants source maps
    pub sourcemap: bool,
}

impl<'a> ChunkMeta<'a> {
    /// Source name for generated maps, or `None` when maps are disabled.
    pub fn map_source(&self) -> Option<&'a str> {
        self.sourcemap.then_some(self.file_name)
    }
}

/// Late-stage transform of finished chunk text
pub trait RenderChunkHook: Send + Sync {
    fn name(&self) -> &'static str;

    /// Transform `code`. `Ok(None)` means "unchanged".
    fn render_chunk(&self, code: &str, meta: &ChunkMeta<'_>) -> Result<Option<TransformOutput>>;
}

/// One emitted chunk
#[derive(Debug, Clone)]
pub struct Chunk {
    pub file_name: String,
    pub code: String,
    pub is_entry: bool,
    /// Maps appended by each pass that changed the chunk, oldest first
    pub sourcemap_chain: Vec<SourceMap>,
}

impl Chunk {
    pub fn new(file_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            code: code.into(),
            is_entry: false,
            sourcemap_chain: Vec::new(),
        }
    }

    pub fn entry(mut self, is_entry: bool) -> Self {
        self.is_entry = is_entry;
        self
    }
}

/// Ordered set of render-chunk hooks
pub struct RenderPipeline {
    hooks: Vec<Box<dyn RenderChunkHook>>,
    sourcemap: bool,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("hooks", &self.hook_names())
            .field("sourcemap", &self.sourcemap)
            .finish()
    }
}

impl RenderPipeline {
    /// Empty pipeline with source maps enabled.
    pub fn new() -> Self {
        Self {
            hooks: Vec::new(),
            sourcemap: true,
        }
    }

    /// Pipeline for resolved options: the import rewriter when
    /// `compat.scheme_imports` is set, then one injector per
    /// `compat.preamble` entry in map order. Each injector prepends, so the
    /// last entry's import ends up first in the chunk.
    pub fn from_options(options: &KilnOptions) -> Self {
        let mut pipeline = Self::new().sourcemap(options.source_map);
        if options.compat.scheme_imports {
            pipeline = pipeline.with_hook(ImportRewriter::new());
        }
        for (global, module) in &options.compat.preamble {
            pipeline = pipeline.with_hook(PreambleInjector::new(global, module));
        }
        debug!(hooks = ?pipeline.hook_names(), "render pipeline configured");
        pipeline
    }

    pub fn with_hook(mut self, hook: impl RenderChunkHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn sourcemap(mut self, enabled: bool) -> Self {
        self.sourcemap = enabled;
        self
    }

    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook on `chunk`. Returns whether any hook changed it.
    ///
    /// Errors carry the chunk file name and the failing hook.
    pub fn transform_chunk(&self, chunk: &mut Chunk) -> Result<bool> {
        let mut changed = false;

        for hook in &self.hooks {
            let meta = ChunkMeta {
                file_name: &chunk.file_name,
                is_entry: chunk.is_entry,
                sourcemap: self.sourcemap,
            };
            let output = hook
                .render_chunk(&chunk.code, &meta)
                .map_err(|err| err.in_chunk(&chunk.file_name, hook.name()))?;

            if let Some(TransformOutput { code, map }) = output {
                debug!(chunk = %chunk.file_name, hook = hook.name(), "chunk transformed");
                chunk.code = code;
                chunk.sourcemap_chain.extend(map);
                changed = true;
            }
        }

        Ok(changed)
    }

    /// Transform independent chunks in parallel. Returns how many changed.
    pub fn transform_chunks(&self, chunks: &mut [Chunk]) -> Result<usize> {
        let changed = chunks
            .par_iter_mut()
            .map(|chunk| self.transform_chunk(chunk))
            .collect::<Result<Vec<bool>>>()?;
        Ok(changed.into_iter().filter(|changed| *changed).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;

    struct Failing;

    impl RenderChunkHook for Failing {
        fn name(&self) -> &'static str {
            "test:failing"
        }

        fn render_chunk(
            &self,
            code: &str,
            _meta: &ChunkMeta<'_>,
        ) -> Result<Option<TransformOutput>> {
            Err(TransformError::OutOfBounds {
                start: 0,
                end: code.len() + 1,
                len: code.len(),
            })
        }
    }

    #[test]
    fn rewriter_runs_before_injector() {
        let pipeline = RenderPipeline::new()
            .with_hook(ImportRewriter::new())
            .with_hook(PreambleInjector::default());
        assert_eq!(
            pipeline.hook_names(),
            [ImportRewriter::NAME, PreambleInjector::NAME]
        );

        let mut chunk =
            Chunk::new("index.mjs", "import fs from 'fs';\nprocess.exit(0);").entry(true);
        assert!(pipeline.transform_chunk(&mut chunk).unwrap());
        assert_eq!(
            chunk.code,
            "import process from 'node:process';import fs from 'node:fs';\nprocess.exit(0);"
        );
        assert_eq!(chunk.sourcemap_chain.len(), 2);
    }

    #[test]
    fn unchanged_chunks_keep_their_chain_empty() {
        let pipeline = RenderPipeline::new().with_hook(ImportRewriter::new());
        let mut chunk = Chunk::new("a.mjs", "import './b.mjs';");
        assert!(!pipeline.transform_chunk(&mut chunk).unwrap());
        assert!(chunk.sourcemap_chain.is_empty());
        assert_eq!(chunk.code, "import './b.mjs';");
    }

    #[test]
    fn disabled_sourcemaps_skip_map_generation() {
        let pipeline = RenderPipeline::new()
            .sourcemap(false)
            .with_hook(ImportRewriter::new());
        let mut chunk = Chunk::new("a.mjs", "import x from 'left-pad';");
        assert!(pipeline.transform_chunk(&mut chunk).unwrap());
        assert!(chunk.sourcemap_chain.is_empty());
    }

    #[test]
    fn errors_name_the_chunk_and_hook() {
        let pipeline = RenderPipeline::new().with_hook(Failing);
        let mut chunks = vec![Chunk::new("ok.mjs", "x"), Chunk::new("bad.mjs", "y")];

        let err = pipeline.transform_chunks(&mut chunks).unwrap_err();
        match err {
            TransformError::Chunk { chunk, hook, .. } => {
                assert!(chunk == "ok.mjs" || chunk == "bad.mjs");
                assert_eq!(hook, "test:failing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn transform_chunks_counts_changes() {
        let pipeline = RenderPipeline::new().with_hook(ImportRewriter::new());
        let mut chunks: Vec<_> = (0..16)
            .map(|i| {
                let code = if i % 2 == 0 {
                    "import fs from 'fs';"
                } else {
                    "import a from './a.mjs';"
                };
                Chunk::new(format!("chunk-{i}.mjs"), code)
            })
            .collect();

        assert_eq!(pipeline.transform_chunks(&mut chunks).unwrap(), 8);
        assert_eq!(chunks[0].code, "import fs from 'node:fs';");
        assert_eq!(chunks[1].code, "import a from './a.mjs';");
    }
}
