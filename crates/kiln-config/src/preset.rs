//! Preset definitions.
//!
//! A preset is one of three forms: a literal definition, a function of the
//! configuration accumulated so far, or a name looked up in a
//! [`PresetLookup`](crate::PresetLookup). Definitions may extend any number of
//! parent presets; parents are applied left to right before the definition's
//! own fields.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, Result, value_kind};
use crate::node::ConfigNode;

#[derive(Debug, Clone)]
pub enum Preset {
    Literal(PresetDefinition),
    Function(PresetFn),
    Named(String),
}

/// Configuration declared by one preset plus the parents it extends
#[derive(Debug, Clone, Default)]
pub struct PresetDefinition {
    pub extends: Vec<Preset>,
    pub config: ConfigNode,
}

type PresetFnInner = dyn Fn(&ConfigNode) -> PresetDefinition + Send + Sync;

/// Preset computed from the accumulator built so far
#[derive(Clone)]
pub struct PresetFn(Arc<PresetFnInner>);

impl PresetFn {
    pub fn call(&self, accumulated: &ConfigNode) -> PresetDefinition {
        (self.0)(accumulated)
    }
}

impl fmt::Debug for PresetFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PresetFn(..)")
    }
}

impl Preset {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn literal(definition: PresetDefinition) -> Self {
        Self::Literal(definition)
    }

    /// Wrap a function of the accumulated configuration.
    ///
    /// ```
    /// use kiln_config::{ConfigNode, Preset, PresetDefinition};
    ///
    /// let preset = Preset::function(|acc| {
    ///     let minify = !acc.dev.unwrap_or(false);
    ///     PresetDefinition::new(ConfigNode { minify: Some(minify), ..Default::default() })
    /// });
    /// # let _ = preset;
    /// ```
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&ConfigNode) -> PresetDefinition + Send + Sync + 'static,
    {
        Self::Function(PresetFn(Arc::new(f)))
    }

    /// Parse a preset from a config value: a string names a preset, a table is
    /// a literal definition.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Named(name)),
            Value::Object(_) => PresetDefinition::from_value(value).map(Self::Literal),
            other => Err(ConfigError::invalid(
                "extends",
                format!(
                    "expected a preset name or a table, found {}",
                    value_kind(&other)
                ),
            )),
        }
    }

    /// Short name for log events; the name as written for named presets.
    pub fn label(&self) -> &str {
        match self {
            Self::Literal(_) => "<literal>",
            Self::Function(_) => "<function>",
            Self::Named(name) => name,
        }
    }
}

impl From<&str> for Preset {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for Preset {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<PresetDefinition> for Preset {
    fn from(definition: PresetDefinition) -> Self {
        Self::Literal(definition)
    }
}

impl From<ConfigNode> for Preset {
    fn from(config: ConfigNode) -> Self {
        Self::Literal(PresetDefinition::new(config))
    }
}

impl PresetDefinition {
    pub fn new(config: ConfigNode) -> Self {
        Self {
            extends: Vec::new(),
            config,
        }
    }

    /// Append a parent preset.
    pub fn extends(mut self, parent: impl Into<Preset>) -> Self {
        self.extends.push(parent.into());
        self
    }

    /// Parse a definition from a table. The `extends` key may hold a preset
    /// name, an array of names and tables, or a single table; every other key
    /// must be a config field.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::invalid(
                    "preset",
                    format!("expected a table, found {}", value_kind(&other)),
                ));
            }
        };

        let extends = match map.remove("extends") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(Preset::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(single) => vec![Preset::from_value(single)?],
        };

        let config = ConfigNode::from_value(Value::Object(map))?;
        Ok(Self { extends, config })
    }

    /// Parse a definition from TOML text, as written in a preset file.
    ///
    /// ```
    /// use kiln_config::PresetDefinition;
    ///
    /// let def = PresetDefinition::from_toml_str(
    ///     "extends = \"node-server\"\nbase_url = \"/app/\"\n",
    /// )
    /// .unwrap();
    /// assert_eq!(def.extends.len(), 1);
    /// assert_eq!(def.config.base_url.as_deref(), Some("/app/"));
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let value: Value =
            toml::from_str(source).map_err(|e| ConfigError::invalid("preset", e))?;
        Self::from_value(value)
    }
}
