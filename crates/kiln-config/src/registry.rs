//! Preset lookup tables.
//!
//! Registries are constructed explicitly and passed to the resolver; there is
//! no process-wide registry.

use indexmap::IndexMap;

use crate::preset::Preset;

/// Name → preset lookup consumed by the resolver
pub trait PresetLookup {
    /// Find a preset by its normalized name.
    fn lookup(&self, name: &str) -> Option<&Preset>;

    /// Registered names, for diagnostics.
    fn names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Ordered preset registry keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: IndexMap<String, Preset>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preset, replacing any preset with the same normalized name.
    pub fn register(&mut self, name: &str, preset: impl Into<Preset>) -> &mut Self {
        self.presets
            .insert(normalize_preset_name(name), preset.into());
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: &str, preset: impl Into<Preset>) -> Self {
        self.register(name, preset);
        self
    }

    /// Register `alias` as another name for `target`.
    pub fn alias(&mut self, alias: &str, target: &str) -> &mut Self {
        self.register(alias, Preset::named(target))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(&normalize_preset_name(name))
    }
}

impl PresetLookup for PresetRegistry {
    fn lookup(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }
}

/// Canonical preset name: lowercase words joined by `-`.
///
/// `denoServer`, `deno_server`, `Deno Server` and `deno-server` all normalize
/// to `deno-server`.
pub fn normalize_preset_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | ' ' | '.') {
            if !normalized.is_empty() && !normalized.ends_with('-') {
                normalized.push('-');
            }
        } else {
            let boundary = ch.is_uppercase()
                && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            if boundary && !normalized.ends_with('-') {
                normalized.push('-');
            }
            normalized.extend(ch.to_lowercase());
        }
        prev = Some(ch);
    }

    while normalized.ends_with('-') {
        normalized.pop();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ConfigNode;

    #[test]
    fn normalize_handles_common_spellings() {
        assert_eq!(normalize_preset_name("deno-server"), "deno-server");
        assert_eq!(normalize_preset_name("denoServer"), "deno-server");
        assert_eq!(normalize_preset_name("deno_server"), "deno-server");
        assert_eq!(normalize_preset_name("DenoServer"), "deno-server");
        assert_eq!(normalize_preset_name("  DENO  "), "deno");
        assert_eq!(normalize_preset_name("node--server-"), "node-server");
        assert_eq!(normalize_preset_name("aws-lambda2Edge"), "aws-lambda2-edge");
    }

    #[test]
    fn register_normalizes_names() {
        let registry = PresetRegistry::new().with("nodeServer", ConfigNode::default());
        assert!(registry.contains("node-server"));
        assert!(registry.contains("node_server"));
        assert!(registry.lookup("node-server").is_some());
        assert_eq!(registry.names(), vec!["node-server".to_string()]);
    }

    #[test]
    fn alias_registers_a_named_preset() {
        let mut registry = PresetRegistry::new();
        registry.register("deno-deploy", ConfigNode::default());
        registry.alias("deno", "deno-deploy");

        assert_eq!(registry.len(), 2);
        assert!(matches!(
            registry.lookup("deno"),
            Some(Preset::Named(target)) if target == "deno-deploy"
        ));
    }
}
