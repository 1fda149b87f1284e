//! Compatibility preamble for entry chunks.
//!
//! Runtimes without Node's implicit globals need `process` (and friends)
//! imported explicitly. The injector prepends `import <global> from
//! '<module>';` to an entry chunk that references the global, with no
//! trailing newline so original line numbers are unchanged.

use tracing::{debug, trace};

use crate::editor::{SourceEditor, TransformOutput};
use crate::error::Result;
use crate::pipeline::{ChunkMeta, RenderChunkHook};
use crate::scan::find_static_imports;
use crate::specifier::{NODE_SCHEME, SpecifierKind, classify};

/// Chunks containing this text are never given a preamble
pub const NO_REPLACE_MARKER: &str = "ROLLUP_NO_REPLACE";

/// Render-chunk pass importing one runtime global into entry chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreambleInjector {
    global: String,
    module: String,
}

impl Default for PreambleInjector {
    fn default() -> Self {
        Self::new("process", "node:process")
    }
}

impl PreambleInjector {
    pub const NAME: &'static str = "kiln:inject-preamble";

    pub fn new(global: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            global: global.into(),
            module: module.into(),
        }
    }

    /// The statement prepended to matching chunks.
    pub fn preamble(&self) -> String {
        format!("import {} from '{}';", self.global, self.module)
    }

    /// Prepend the preamble if every condition holds:
    ///
    /// - the chunk is an entry chunk
    /// - it does not contain [`NO_REPLACE_MARKER`]
    /// - it references the global as a whole word
    /// - no static import of the module already binds the global
    pub fn inject(
        &self,
        code: &str,
        is_entry: bool,
        map_source: Option<&str>,
    ) -> Result<Option<TransformOutput>> {
        if !is_entry {
            return Ok(None);
        }
        if code.contains(NO_REPLACE_MARKER) {
            trace!(global = %self.global, "preamble suppressed by marker");
            return Ok(None);
        }
        if !references_identifier(code, &self.global) {
            return Ok(None);
        }
        if self.already_bound(code) {
            trace!(global = %self.global, "global already imported");
            return Ok(None);
        }

        debug!(global = %self.global, module = %self.module, "injecting preamble");
        let mut editor = SourceEditor::new(code);
        editor.prepend(&self.preamble());
        Ok(editor.into_output(map_source))
    }

    fn already_bound(&self, code: &str) -> bool {
        let module = canonical_module(&self.module);
        find_static_imports(code).iter().any(|import| {
            canonical_module(import.specifier) == module && import.binds(&self.global)
        })
    }
}

impl RenderChunkHook for PreambleInjector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn render_chunk(&self, code: &str, meta: &ChunkMeta<'_>) -> Result<Option<TransformOutput>> {
        self.inject(code, meta.is_entry, meta.map_source())
    }
}

// `process` and `node:process` name the same module.
fn canonical_module(specifier: &str) -> String {
    match classify(specifier) {
        SpecifierKind::PlatformBuiltin(name) => format!("{NODE_SCHEME}{name}"),
        _ => specifier.to_string(),
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Whole-word occurrence of `name` in `code`.
pub(crate) fn references_identifier(code: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    code.match_indices(name).any(|(start, _)| {
        let before = code[..start].chars().next_back();
        let after = code[start + name.len()..].chars().next();
        !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
    })
}
