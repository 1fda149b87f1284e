//! Built-in deployment presets.

pub mod deno;
pub mod node;

use kiln_config::PresetRegistry;

pub use deno::{deno_deploy, deno_server, inject_globals};
pub use node::{node, node_server};

pub const NODE: &str = "node";
pub const NODE_SERVER: &str = "node-server";
pub const DENO_DEPLOY: &str = "deno-deploy";
pub const DENO_SERVER: &str = "deno-server";

/// Short name for [`DENO_DEPLOY`]
pub const DENO: &str = "deno";

/// Registry holding every built-in preset.
///
/// Callers may register their own presets on top, replacing built-ins with
/// the same name.
pub fn builtin_registry() -> PresetRegistry {
    let mut registry = PresetRegistry::new();
    registry
        .register(NODE, node())
        .register(NODE_SERVER, node_server())
        .register(DENO_DEPLOY, deno_deploy())
        .register(DENO_SERVER, deno_server())
        .alias(DENO, DENO_DEPLOY);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::PresetLookup;

    #[test]
    fn registry_lists_builtins_in_order() {
        let registry = builtin_registry();
        assert_eq!(
            registry.names(),
            ["node", "node-server", "deno-deploy", "deno-server", "deno"]
        );
    }
}
