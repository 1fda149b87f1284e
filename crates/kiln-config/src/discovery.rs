//! File-based config discovery
//!
//! Finds the seed configuration for a project and layers `KILN_*` environment
//! variables on top of it.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::preset::PresetDefinition;

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "KILN_";

const CONFIG_FILE: &str = "kiln.toml";
const PACKAGE_JSON_FIELD: &str = "kiln";

/// File-based configuration discovery
///
/// Searches for a Kiln configuration in conventional locations and loads it as
/// the seed preset definition. Nested keys can be overridden from the
/// environment with `__` separators, e.g. `KILN_BUNDLE__OUTPUT__FORMAT=cjs`;
/// `KILN_PRESET` selects the preset.
///
/// # Example
///
/// ```no_run
/// use kiln_config::ConfigDiscovery;
///
/// let seed = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
    env_prefix: String,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix (mostly for tests)
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: kiln.toml
    /// 2. package.json (kiln field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|field| !field.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load the seed configuration
    ///
    /// A missing config file is not an error: the seed is then built from
    /// environment variables alone.
    pub fn load(&self) -> Result<PresetDefinition> {
        let mut figment = Figment::new();

        match self.find() {
            Some(path) if is_package_json(&path) => {
                debug!(path = %path.display(), "loading config from package.json");
                figment = figment.merge(Serialized::defaults(read_package_field(&path)?));
            }
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                figment = figment.merge(Toml::file(path));
            }
            None => debug!(root = %self.root.display(), "no config file found"),
        }

        figment = figment.merge(Env::prefixed(&self.env_prefix).split("__"));

        let value: Value = figment
            .extract()
            .map_err(|e| ConfigError::invalid("config", e))?;
        PresetDefinition::from_value(value)
    }

    /// Load the seed configuration from a config file that must exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load_required(&self) -> Result<PresetDefinition> {
        if self.find().is_none() {
            return Err(ConfigError::NotFound);
        }
        self.load()
    }
}

fn is_package_json(path: &Path) -> bool {
    path.file_name() == Some(std::ffi::OsStr::new("package.json"))
}

fn read_package_field(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;

    let mut parsed: Value = serde_json::from_str(&content)
        .map_err(|e| ConfigError::invalid("package.json", format!("Invalid JSON: {e}")))?;

    match parsed.get_mut(PACKAGE_JSON_FIELD).map(Value::take) {
        Some(Value::Null) | None => Err(ConfigError::InvalidValue {
            field: PACKAGE_JSON_FIELD.to_string(),
            hint: Some("Add a 'kiln' table to your package.json".to_string()),
        }),
        Some(value) => Ok(value),
    }
}

/// Discover and load the seed config from the current directory (convenience function)
pub fn discover() -> Result<PresetDefinition> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
