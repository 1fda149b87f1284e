//! Static import discovery.
//!
//! A regex fast path over rendered chunk text. Grammar of a match:
//!
//! ```text
//! static-import := boundary "import" head quote ws* specifier ws* quote
//! head          := ws* ("{" | "*") clause "from" ws*
//!                | ws+ ident-char clause "from" ws*
//!                | ws*
//! boundary      := start of line | ";" | "}" | whitespace
//! ident-char    := letter, mark, digit, "_", "$"
//! clause        := zero or more of ident-char, "*", ",", "{", "}", "@", ".",
//!                  space, tab, CR, LF
//! specifier     := non-empty, no newline, no quote of the same kind
//! ```
//!
//! Dynamic `import(...)` and `import.meta` never match, and neither does an
//! identifier that merely starts with `import`. Text inside strings is not
//! excluded; a block comment can only end a clause early since `/` is not
//! clause text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static STATIC_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)(?:^|[\s;}])(?P<stmt>import(?:\s*(?P<braced>[{*][\p{L}\p{M}\w\t\n\r $*,{}@.]*)from\s*|\s+(?P<default>[\p{L}\p{M}\w$][\p{L}\p{M}\w\t\n\r $*,{}@.]*)from\s*|\s*)(?:"\s*(?P<dq>[^"\n]*[^\s"])\s*"|'\s*(?P<sq>[^'\n]*[^\s'])\s*'))"#,
    )
    .expect("static import regex should compile")
});

/// One static import statement found in a chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticImport<'a> {
    /// Full statement text, from `import` to the closing quote
    pub code: &'a str,
    /// Byte range of `code` in the scanned text
    pub span: Range<usize>,
    /// Text between `import` and `from`, if any
    pub clause: Option<&'a str>,
    /// Specifier without quotes or surrounding whitespace
    pub specifier: &'a str,
    /// Byte range of `specifier` in the scanned text
    pub specifier_span: Range<usize>,
    pub quote: char,
}

impl<'a> StaticImport<'a> {
    /// Local names bound by the import clause.
    ///
    /// `import a, { b as c, d } from "m"` binds `a`, `c` and `d`;
    /// `import * as ns from "m"` binds `ns`.
    pub fn local_names(&self) -> Vec<&'a str> {
        let Some(clause) = self.clause else {
            return Vec::new();
        };

        let (outer, named) = match (clause.find('{'), clause.rfind('}')) {
            (Some(open), Some(close)) if open < close => (
                [&clause[..open], &clause[close + 1..]],
                &clause[open + 1..close],
            ),
            _ => ([clause, ""], ""),
        };

        outer
            .into_iter()
            .chain([named])
            .flat_map(|part| part.split(','))
            .filter_map(binding_name)
            .collect()
    }

    /// True when the clause binds `name`.
    pub fn binds(&self, name: &str) -> bool {
        self.local_names().contains(&name)
    }
}

// `x` binds x, `x as y` and `* as y` bind y.
fn binding_name(part: &str) -> Option<&str> {
    part.split_whitespace().last().filter(|name| *name != "*")
}

/// Find every static import statement in `code`, in source order.
pub fn find_static_imports(code: &str) -> Vec<StaticImport<'_>> {
    STATIC_IMPORT_RE
        .captures_iter(code)
        .filter_map(|caps| {
            let stmt = caps.name("stmt")?;
            let (specifier, quote) = match (caps.name("dq"), caps.name("sq")) {
                (Some(m), _) => (m, '"'),
                (None, Some(m)) => (m, '\''),
                (None, None) => return None,
            };
            Some(StaticImport {
                code: stmt.as_str(),
                span: stmt.range(),
                clause: caps
                    .name("braced")
                    .or_else(|| caps.name("default"))
                    .map(|m| m.as_str()),
                specifier: specifier.as_str(),
                specifier_span: specifier.range(),
                quote,
            })
        })
        .collect()
}
