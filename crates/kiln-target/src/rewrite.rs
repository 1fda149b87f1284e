//! Scheme-prefix rewriting of static imports.
//!
//! Every static import whose specifier names a platform builtin gets the
//! `node:` scheme and every bare package name gets `npm:`. Only the bytes
//! between the quotes change.

use tracing::{debug, trace};

use crate::editor::{SourceEditor, TransformOutput};
use crate::error::Result;
use crate::pipeline::{ChunkMeta, RenderChunkHook};
use crate::scan::{StaticImport, find_static_imports};
use crate::specifier::{SpecifierKind, classify};

/// A static import together with the category of its specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord<'a> {
    pub import: StaticImport<'a>,
    pub kind: SpecifierKind<'a>,
}

impl ImportRecord<'_> {
    /// Replacement specifier, if it differs from the original.
    pub fn replacement(&self) -> Option<String> {
        self.kind
            .rewrite()
            .filter(|rewritten| rewritten != self.import.specifier)
    }
}

/// Scan and classify every static import in `code`.
pub fn collect_imports(code: &str) -> Vec<ImportRecord<'_>> {
    find_static_imports(code)
        .into_iter()
        .map(|import| ImportRecord {
            kind: classify(import.specifier),
            import,
        })
        .collect()
}

/// Render-chunk pass adding `node:` / `npm:` schemes to import specifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportRewriter;

impl ImportRewriter {
    pub const NAME: &'static str = "kiln:scheme-imports";

    pub fn new() -> Self {
        Self
    }

    /// Rewrite `code`, returning `None` if no specifier changed.
    ///
    /// A source map is generated only when `map_source` is given.
    ///
    /// ```
    /// use kiln_target::ImportRewriter;
    ///
    /// let out = ImportRewriter::new()
    ///     .rewrite("import fs from 'fs';", None)
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(out.code, "import fs from 'node:fs';");
    /// ```
    pub fn rewrite(&self, code: &str, map_source: Option<&str>) -> Result<Option<TransformOutput>> {
        let mut editor = SourceEditor::new(code);

        for record in collect_imports(code) {
            if record.kind.is_local_or_resolved() {
                trace!(specifier = record.import.specifier, "local or already resolved");
                continue;
            }
            let Some(replacement) = record.replacement() else {
                trace!(specifier = record.import.specifier, "import left unchanged");
                continue;
            };
            debug!(
                from = record.import.specifier,
                to = %replacement,
                "rewriting import specifier"
            );
            editor.overwrite(record.import.specifier_span.clone(), replacement)?;
        }

        Ok(editor.into_output(map_source))
    }
}

impl RenderChunkHook for ImportRewriter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn render_chunk(&self, code: &str, meta: &ChunkMeta<'_>) -> Result<Option<TransformOutput>> {
        self.rewrite(code, meta.map_source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewritten(code: &str) -> Option<String> {
        ImportRewriter::new()
            .rewrite(code, None)
            .unwrap()
            .map(|out| out.code)
    }

    #[test]
    fn builtins_get_node_scheme() {
        assert_eq!(
            rewritten(r#"import fs from "fs";"#).as_deref(),
            Some(r#"import fs from "node:fs";"#)
        );
    }

    #[test]
    fn bare_packages_get_npm_scheme() {
        assert_eq!(
            rewritten(r#"import x from "left-pad";"#).as_deref(),
            Some(r#"import x from "npm:left-pad";"#)
        );
    }

    #[test]
    fn local_and_resolved_imports_are_untouched() {
        let code = r#"import y from "./local";
import z from "/abs/z.mjs";
import s from "https://deno.land/std/http/server.ts";
import p from "npm:left-pad";
import f from "node:fs";
"#;
        assert_eq!(rewritten(code), None);
    }

    #[test]
    fn quote_style_and_spacing_are_preserved() {
        assert_eq!(
            rewritten("import {a}from'path' ;").as_deref(),
            Some("import {a}from'node:path' ;")
        );
        assert_eq!(
            rewritten("import x from \" crypto \";").as_deref(),
            Some("import x from \" node:crypto \";")
        );
    }

    #[test]
    fn node_prefixed_package_becomes_npm() {
        assert_eq!(
            rewritten("import a from 'node:left-pad';").as_deref(),
            Some("import a from 'npm:left-pad';")
        );
    }

    #[test]
    fn record_replacement_skips_identical_specifiers() {
        let records = collect_imports("import a from 'node:fs';\nimport b from 'fs';");
        assert_eq!(records[0].replacement(), None);
        assert_eq!(records[1].replacement().as_deref(), Some("node:fs"));
        assert_eq!(records[1].kind, SpecifierKind::PlatformBuiltin("fs"));
    }

    #[test]
    fn re_exports_after_import_meta_are_untouched() {
        assert_eq!(
            rewritten("const u = import.meta.url\nexport { x } from 'left-pad'\n"),
            None
        );
        assert_eq!(
            rewritten("/* we import\n things */ export { a } from \"left-pad\";\n"),
            None
        );
    }

    #[test]
    fn rewrite_is_idempotent() {
        let code = "import fs from 'fs';\nimport pad from 'left-pad';\nimport './x.mjs';\n";
        let once = rewritten(code).unwrap();
        assert_eq!(rewritten(&once), None);
    }
}
