//! Error types for chunk transforms

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors raised while editing a rendered chunk
///
/// Any of these is fatal for the chunk being transformed and is propagated to
/// the orchestrator.
#[derive(Error, Debug, Diagnostic)]
pub enum TransformError {
    /// Edit range reaches past the end of the source
    #[error("edit range {start}..{end} is outside the source ({len} bytes)")]
    #[diagnostic(code(kiln::target::out_of_bounds))]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// Edit offset splits a multi-byte character
    #[error("edit offset {offset} is not on a character boundary")]
    #[diagnostic(
        code(kiln::target::not_char_boundary),
        help("edit offsets are byte offsets and must fall between UTF-8 characters")
    )]
    NotCharBoundary { offset: usize },

    /// Edit intersects an edit that was already recorded
    #[error("edit range {start}..{end} overlaps the earlier edit {existing_start}..{existing_end}")]
    #[diagnostic(code(kiln::target::overlapping_edit))]
    OverlappingEdit {
        start: usize,
        end: usize,
        existing_start: usize,
        existing_end: usize,
    },

    /// Overwrite of a zero-length range
    #[error("cannot overwrite the empty range {start}..{start}")]
    #[diagnostic(
        code(kiln::target::empty_range),
        help("use `prepend` to insert text without replacing any")
    )]
    EmptyRange { start: usize },

    /// A transform hook failed on a specific chunk
    #[error("`{hook}` failed on chunk `{chunk}`: {source}")]
    #[diagnostic(code(kiln::target::chunk))]
    Chunk {
        chunk: String,
        hook: &'static str,
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    pub(crate) fn in_chunk(self, chunk: &str, hook: &'static str) -> Self {
        Self::Chunk {
            chunk: chunk.to_string(),
            hook,
            source: Box::new(self),
        }
    }
}
