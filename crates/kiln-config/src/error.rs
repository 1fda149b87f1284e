//! Error types for preset resolution and configuration loading.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    // Resolution errors (fatal, abort the build before bundling)
    #[error("unknown preset `{name}`")]
    #[diagnostic(code(kiln::config::unknown_preset))]
    UnknownPreset {
        name: String,
        #[help]
        available: AvailablePresets,
    },

    #[error("preset `extends` chain is cyclic: {}", .chain.join(" -> "))]
    #[diagnostic(
        code(kiln::config::cyclic_extends),
        help("remove one of the `extends` entries so the chain terminates")
    )]
    CyclicExtends { chain: Vec<String> },

    #[error("`{field}` expected {expected} but found {found}")]
    #[diagnostic(
        code(kiln::config::merge_type_mismatch),
        help("an override must keep the shape of the value it replaces")
    )]
    MergeTypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    // Config parsing/loading errors
    #[error("config not found")]
    #[diagnostic(code(kiln::config::not_found))]
    NotFound,

    #[error("invalid config value for `{field}`")]
    #[diagnostic(code(kiln::config::invalid_value))]
    InvalidValue {
        field: String,
        #[help]
        hint: Option<String>,
    },

    #[error("I/O error: {0}")]
    #[diagnostic(code(kiln::config::io))]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, hint: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            field: field.into(),
            hint: Some(hint.to_string()),
        }
    }
}

/// Registry contents reported alongside an unknown preset name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailablePresets(pub Vec<String>);

impl std::fmt::Display for AvailablePresets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no presets are registered");
        }
        write!(f, "available presets: {}", self.0.join(", "))
    }
}

/// Short shape name of a JSON value, used in mismatch diagnostics.
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "a table",
    }
}
