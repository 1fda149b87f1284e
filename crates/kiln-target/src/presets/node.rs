//! Node.js presets.

use kiln_config::{CommandsNode, ConfigNode, PresetDefinition, ServeStatic};

use super::NODE;

pub const NODE_ENTRY: &str = "#internal/kiln/entries/node";
pub const NODE_SERVER_ENTRY: &str = "#internal/kiln/entries/node-server";

/// Plain Node.js module exporting a request handler
pub fn node() -> PresetDefinition {
    PresetDefinition::new(ConfigNode {
        entry: Some(NODE_ENTRY.to_string()),
        node: Some(true),
        ..Default::default()
    })
}

/// Standalone Node.js HTTP server that also serves static assets
pub fn node_server() -> PresetDefinition {
    PresetDefinition::new(ConfigNode {
        entry: Some(NODE_SERVER_ENTRY.to_string()),
        serve_static: Some(ServeStatic::Enabled),
        commands: Some(CommandsNode {
            preview: Some("node ./server/index.mjs".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    })
    .extends(NODE)
}
