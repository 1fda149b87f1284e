//! Preset resolution.
//!
//! Resolution walks a preset's `extends` chain depth-first, left to right.
//! Parents are merged into the accumulator before the preset's own fields, so
//! descendants always win. Named presets are tracked on an active chain; seeing
//! a name that is already on the chain is a cycle.

use tracing::{debug, info};

use crate::error::{AvailablePresets, ConfigError, Result};
use crate::merge::Merge;
use crate::node::ConfigNode;
use crate::options::KilnOptions;
use crate::preset::{Preset, PresetDefinition};
use crate::registry::{PresetLookup, normalize_preset_name};

/// Preset used when the seed configuration names none
pub const DEFAULT_PRESET: &str = "node-server";

/// Resolve `preset` against `registry` into fully populated options.
pub fn resolve<R>(preset: &Preset, registry: &R) -> Result<KilnOptions>
where
    R: PresetLookup + ?Sized,
{
    let mut resolver = PresetResolver::new(registry);
    let mut accumulated = resolver.resolve_node(preset)?;
    if let Preset::Named(name) = preset {
        accumulated.preset = Some(normalize_preset_name(name));
    }
    accumulated.into_options()
}

/// Resolve a seed configuration (user config) into fully populated options.
///
/// The seed acts as the root preset: it extends the preset it names (or
/// [`DEFAULT_PRESET`]) followed by its own `extends` entries, and its fields
/// are merged last so user settings override every preset. The seed also
/// initializes the accumulator, so function presets can branch on user
/// settings such as `dev`. A side effect is map key order: in `alias`,
/// `replace`, `inject` and `compat.preamble`, keys from the seed come first,
/// then keys that only presets declare, in application order.
pub fn resolve_preset<R>(seed: PresetDefinition, registry: &R) -> Result<KilnOptions>
where
    R: PresetLookup + ?Sized,
{
    let preset_name = normalize_preset_name(
        seed.config.preset.as_deref().unwrap_or(DEFAULT_PRESET),
    );

    let mut extends = Vec::with_capacity(seed.extends.len() + 1);
    extends.push(Preset::Named(preset_name.clone()));
    extends.extend(seed.extends);
    let root = Preset::Literal(PresetDefinition {
        extends,
        config: seed.config.clone(),
    });

    let mut resolver = PresetResolver::with_accumulator(registry, seed.config);
    let mut accumulated = resolver.resolve_node(&root)?;
    accumulated.preset = Some(preset_name.clone());

    info!(
        preset = %preset_name,
        chain = %resolver.applied().join(" -> "),
        "resolved preset"
    );
    accumulated.into_options()
}

/// Stateful walker over one preset tree
pub struct PresetResolver<'r, R: PresetLookup + ?Sized> {
    registry: &'r R,
    accumulated: ConfigNode,
    active: Vec<String>,
    applied: Vec<String>,
}

impl<'r, R: PresetLookup + ?Sized> PresetResolver<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self::with_accumulator(registry, ConfigNode::default())
    }

    /// Start from an existing accumulator instead of an empty node.
    pub fn with_accumulator(registry: &'r R, accumulated: ConfigNode) -> Self {
        Self {
            registry,
            accumulated,
            active: Vec::new(),
            applied: Vec::new(),
        }
    }

    /// Named presets applied so far, in application order.
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    /// Apply `preset` and return the accumulated (still partial) node.
    pub fn resolve_node(&mut self, preset: &Preset) -> Result<ConfigNode> {
        self.apply(preset)?;
        Ok(std::mem::take(&mut self.accumulated))
    }

    fn apply(&mut self, preset: &Preset) -> Result<()> {
        debug!(preset = preset.label(), depth = self.active.len(), "applying preset");
        match preset {
            Preset::Literal(definition) => self.apply_definition(definition),
            Preset::Function(function) => {
                let definition = function.call(&self.accumulated);
                self.apply_definition(&definition)
            }
            Preset::Named(name) => self.apply_named(name),
        }
    }

    fn apply_named(&mut self, name: &str) -> Result<()> {
        let key = normalize_preset_name(name);

        if self.active.contains(&key) {
            let mut chain = self.active.clone();
            chain.push(key);
            return Err(ConfigError::CyclicExtends { chain });
        }

        let registry = self.registry;
        let preset = registry
            .lookup(&key)
            .ok_or_else(|| ConfigError::UnknownPreset {
                name: name.to_string(),
                available: AvailablePresets(registry.names()),
            })?;

        self.active.push(key.clone());
        let result = self.apply(preset);
        self.active.pop();
        result?;

        self.applied.push(key);
        Ok(())
    }

    fn apply_definition(&mut self, definition: &PresetDefinition) -> Result<()> {
        for parent in &definition.extends {
            self.apply(parent)?;
        }
        self.accumulated.merge(definition.config.clone())
    }
}
