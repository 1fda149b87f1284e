//! Span-exact text editing with source maps.
//!
//! [`SourceEditor`] records replacements against the original text instead of
//! mutating it, so the rendered output can be mapped back to the original.
//! The map has a single source (the chunk) with its content embedded, a token
//! at the start of every unchanged segment and every original line inside it,
//! and a token at the start of each replacement. Columns are UTF-16 code
//! units.

use std::ops::Range;

use oxc_sourcemap::{SourceMap, SourceMapBuilder};

use crate::error::{Result, TransformError};

/// Transformed chunk text and the map back to the text it was produced from
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

#[derive(Debug, Clone)]
struct Edit {
    range: Range<usize>,
    content: String,
}

/// Splicing buffer over an original text
#[derive(Debug, Clone)]
pub struct SourceEditor<'a> {
    original: &'a str,
    intro: String,
    // Sorted by start, never overlapping.
    edits: Vec<Edit>,
}

impl<'a> SourceEditor<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            intro: String::new(),
            edits: Vec::new(),
        }
    }

    /// Replace `range` of the original text with `content`.
    ///
    /// The range must be non-empty, inside the text, on character boundaries
    /// and disjoint from every earlier overwrite.
    pub fn overwrite(
        &mut self,
        range: Range<usize>,
        content: impl Into<String>,
    ) -> Result<&mut Self> {
        let Range { start, end } = range;
        let len = self.original.len();

        if start > end || end > len {
            return Err(TransformError::OutOfBounds { start, end, len });
        }
        if start == end {
            return Err(TransformError::EmptyRange { start });
        }
        for offset in [start, end] {
            if !self.original.is_char_boundary(offset) {
                return Err(TransformError::NotCharBoundary { offset });
            }
        }

        let index = self.edits.partition_point(|edit| edit.range.start < start);
        let overlapping = [index.checked_sub(1), Some(index)]
            .into_iter()
            .flatten()
            .filter_map(|i| self.edits.get(i))
            .find(|edit| edit.range.start < end && start < edit.range.end);
        if let Some(existing) = overlapping {
            return Err(TransformError::OverlappingEdit {
                start,
                end,
                existing_start: existing.range.start,
                existing_end: existing.range.end,
            });
        }

        self.edits.insert(
            index,
            Edit {
                range: start..end,
                content: content.into(),
            },
        );
        Ok(self)
    }

    /// Insert `content` before everything else, including earlier prepends.
    pub fn prepend(&mut self, content: &str) -> &mut Self {
        self.intro.insert_str(0, content);
        self
    }

    /// True if the rendered text differs from the original.
    pub fn has_changed(&self) -> bool {
        !self.intro.is_empty()
            || self
                .edits
                .iter()
                .any(|edit| self.original[edit.range.clone()] != edit.content)
    }

    /// Render the edited text.
    pub fn render(&self) -> String {
        let extra: usize = self.edits.iter().map(|edit| edit.content.len()).sum();
        let mut out = String::with_capacity(self.original.len() + self.intro.len() + extra);
        out.push_str(&self.intro);

        let mut cursor = 0;
        for edit in &self.edits {
            out.push_str(&self.original[cursor..edit.range.start]);
            out.push_str(&edit.content);
            cursor = edit.range.end;
        }
        out.push_str(&self.original[cursor..]);
        out
    }

    /// Build the map from the rendered text back to the original.
    ///
    /// `source` names both the generated file and its single source.
    pub fn generate_map(&self, source: &str) -> SourceMap {
        let mut builder = SourceMapBuilder::default();
        builder.set_file(source);
        let source_id = builder.set_source_and_content(source, self.original);

        let mut generated = Position::default();
        let mut original = Position::default();
        generated.advance(&self.intro);

        let mut add_token = |generated: Position, original: Position| {
            builder.add_token(
                generated.line,
                generated.column,
                original.line,
                original.column,
                Some(source_id),
                None,
            );
        };

        let mut cursor = 0;
        for edit in &self.edits {
            map_unchanged(
                &self.original[cursor..edit.range.start],
                &mut generated,
                &mut original,
                &mut add_token,
            );

            if !edit.content.is_empty() {
                add_token(generated, original);
            }
            generated.advance(&edit.content);
            original.advance(&self.original[edit.range.clone()]);
            cursor = edit.range.end;
        }
        map_unchanged(
            &self.original[cursor..],
            &mut generated,
            &mut original,
            &mut add_token,
        );

        builder.into_sourcemap()
    }

    /// Finish editing.
    ///
    /// Returns `None` when nothing changed. A map is generated only when
    /// `map_source` is given.
    pub fn into_output(self, map_source: Option<&str>) -> Option<TransformOutput> {
        if !self.has_changed() {
            return None;
        }
        Some(TransformOutput {
            code: self.render(),
            map: map_source.map(|source| self.generate_map(source)),
        })
    }
}

// Emits a token at the segment start and at every line start inside it.
fn map_unchanged(
    segment: &str,
    generated: &mut Position,
    original: &mut Position,
    add_token: &mut impl FnMut(Position, Position),
) {
    if segment.is_empty() {
        return;
    }

    add_token(*generated, *original);
    for (index, ch) in segment.char_indices() {
        generated.step(ch);
        original.step(ch);
        if ch == '\n' && index + 1 < segment.len() {
            add_token(*generated, *original);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Position {
    line: u32,
    column: u32,
}

impl Position {
    fn step(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += ch.len_utf16() as u32;
        }
    }

    fn advance(&mut self, text: &str) {
        text.chars().for_each(|ch| self.step(ch));
    }
}
