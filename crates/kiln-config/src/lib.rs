//! # kiln-config
//!
//! Preset resolution for Kiln: partial configuration trees, deterministic
//! merging, preset definitions and registries, and the resolver that turns a
//! preset chain into fully populated [`KilnOptions`].
//!
//! ```
//! use kiln_config::{ConfigNode, PresetDefinition, PresetRegistry, resolve_preset};
//!
//! let registry = PresetRegistry::new().with(
//!     "node-server",
//!     ConfigNode { entry: Some("#internal/server".into()), ..Default::default() },
//! );
//!
//! let seed = PresetDefinition::new(ConfigNode { minify: Some(true), ..Default::default() });
//! let options = resolve_preset(seed, &registry).unwrap();
//!
//! assert_eq!(options.preset, "node-server");
//! assert_eq!(options.entry, "#internal/server");
//! assert!(options.minify);
//! ```

pub mod discovery;
pub mod error;
pub mod merge;
pub mod node;
pub mod options;
pub mod preset;
pub mod registry;
pub mod resolver;

pub use discovery::{ConfigDiscovery, ENV_PREFIX, discover};
pub use error::{AvailablePresets, ConfigError, Result};
pub use merge::{Merge, merge, merge_values};
pub use node::{BundleNode, BundleOutputNode, CommandsNode, CompatNode, ConfigNode, OutputDirsNode};
pub use options::*;
pub use preset::{Preset, PresetDefinition, PresetFn};
pub use registry::{PresetLookup, PresetRegistry, normalize_preset_name};
pub use resolver::{DEFAULT_PRESET, PresetResolver, resolve, resolve_preset};
