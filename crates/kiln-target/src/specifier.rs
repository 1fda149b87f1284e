//! Module specifier classification.
//!
//! Runtimes such as Deno resolve a bare `fs` or `left-pad` only when the
//! specifier carries an explicit scheme. [`classify`] sorts a specifier into
//! the categories that decide whether and how it gets one.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Scheme prefix of platform builtin modules
pub const NODE_SCHEME: &str = "node:";

/// Scheme prefix of npm packages
pub const NPM_SCHEME: &str = "npm:";

/// Package-manager schemes that already resolve on their own
const PACKAGE_SCHEMES: &[&str] = &[NPM_SCHEME, "jsr:"];

static HTTP_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?:)?//").expect("http import regex should compile"));

/// Node.js `builtinModules`, importable with or without the `node:` prefix.
static BUILTIN_MODULES: phf::Set<&'static str> = phf::phf_set! {
    "_http_agent",
    "_http_client",
    "_http_common",
    "_http_incoming",
    "_http_outgoing",
    "_http_server",
    "_stream_duplex",
    "_stream_passthrough",
    "_stream_readable",
    "_stream_transform",
    "_stream_wrap",
    "_stream_writable",
    "_tls_common",
    "_tls_wrap",
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
};

/// Builtins that only exist behind the `node:` prefix (`test` alone is an npm package).
static PREFIX_ONLY_BUILTINS: phf::Set<&'static str> = phf::phf_set! {
    "sea",
    "sqlite",
    "test",
    "test/reporters",
};

/// Category of a module specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind<'a> {
    /// `./x`, `../x`, `.` or `..`
    Relative,
    /// Filesystem path such as `/x`, `C:\x` or `\\server\share`
    Absolute,
    /// `http://`, `https://` or protocol-relative `//`
    HttpUrl,
    /// Already carries a package-manager scheme (`npm:`, `jsr:`)
    PackageScheme,
    /// Module supplied by the runtime; holds the name without `node:`
    PlatformBuiltin(&'a str),
    /// Third-party package name; holds the name without any `node:` prefix
    Bare(&'a str),
}

impl SpecifierKind<'_> {
    /// The specifier the target runtime expects, if this kind gets a scheme.
    ///
    /// ```
    /// use kiln_target::classify;
    ///
    /// assert_eq!(classify("fs").rewrite().as_deref(), Some("node:fs"));
    /// assert_eq!(classify("left-pad").rewrite().as_deref(), Some("npm:left-pad"));
    /// assert_eq!(classify("./local").rewrite(), None);
    /// ```
    pub fn rewrite(&self) -> Option<String> {
        if self.is_local_or_resolved() {
            return None;
        }
        match self {
            Self::PlatformBuiltin(name) => Some(format!("{NODE_SCHEME}{name}")),
            Self::Bare(name) if !name.is_empty() => Some(format!("{NPM_SCHEME}{name}")),
            _ => None,
        }
    }

    /// True for kinds the rewriter leaves alone.
    pub fn is_local_or_resolved(&self) -> bool {
        matches!(
            self,
            Self::Relative | Self::Absolute | Self::HttpUrl | Self::PackageScheme
        )
    }
}

/// Classify a module specifier. Never fails; anything unrecognized is `Bare`.
pub fn classify(specifier: &str) -> SpecifierKind<'_> {
    if is_relative(specifier) {
        return SpecifierKind::Relative;
    }
    if is_absolute_path(specifier) {
        return SpecifierKind::Absolute;
    }
    if is_http_import(specifier) {
        return SpecifierKind::HttpUrl;
    }
    if PACKAGE_SCHEMES
        .iter()
        .any(|scheme| specifier.starts_with(scheme))
    {
        return SpecifierKind::PackageScheme;
    }

    match specifier.strip_prefix(NODE_SCHEME) {
        Some(name) if is_builtin(name) || PREFIX_ONLY_BUILTINS.contains(name) => {
            SpecifierKind::PlatformBuiltin(name)
        }
        Some(name) => SpecifierKind::Bare(name),
        None if is_builtin(specifier) => SpecifierKind::PlatformBuiltin(specifier),
        None => SpecifierKind::Bare(specifier),
    }
}

/// Membership in the runtime's builtin module list (unprefixed names).
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_MODULES.contains(name)
}

/// `^(https?:)?//`
pub fn is_http_import(specifier: &str) -> bool {
    HTTP_IMPORT_RE.is_match(specifier)
}

fn is_relative(specifier: &str) -> bool {
    matches!(specifier, "." | "..") || specifier.starts_with("./") || specifier.starts_with("../")
}

fn is_absolute_path(specifier: &str) -> bool {
    match specifier.as_bytes() {
        // `//host/x` is a protocol-relative URL, not a path
        [b'/', b'/', ..] => false,
        [b'/', ..] | [b'\\', ..] => true,
        [drive, b':', b'/' | b'\\', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

/// Resolution for an id the bundler must leave external
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalModule {
    pub id: String,
    /// `Some(false)` when importing the module is known to be side-effect free
    pub module_side_effects: Option<bool>,
}

/// Resolve ids that must not be bundled for the scheme-import runtime.
///
/// Builtins resolve to their `node:` form and are side-effect free; remote
/// URLs stay as written. Everything else is left to the bundler (`None`).
pub fn resolve_external(id: &str) -> Option<ExternalModule> {
    match classify(id) {
        SpecifierKind::PlatformBuiltin(name) => Some(ExternalModule {
            id: format!("{NODE_SCHEME}{name}"),
            module_side_effects: Some(false),
        }),
        SpecifierKind::HttpUrl => Some(ExternalModule {
            id: id.to_string(),
            module_side_effects: None,
        }),
        _ => None,
    }
}
