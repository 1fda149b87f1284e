//! Preset resolution: extends ordering, functions, cycles, unknown names.

use kiln_config::{
    CommandsNode, ConfigError, ConfigNode, DEFAULT_PRESET, Preset, PresetDefinition, PresetRegistry,
    ServeStatic, resolve, resolve_preset,
};
use serde_json::json;

fn node(f: impl FnOnce(&mut ConfigNode)) -> ConfigNode {
    let mut node = ConfigNode::default();
    f(&mut node);
    node
}

#[test]
fn descendant_fields_win_over_ancestors() {
    let registry = PresetRegistry::new()
        .with("a", node(|n| n.entry = Some("a.mjs".into())))
        .with(
            "x",
            PresetDefinition::new(node(|n| n.entry = Some("x.mjs".into()))).extends("a"),
        );

    let options = resolve(&Preset::named("x"), &registry).unwrap();
    assert_eq!(options.entry, "x.mjs");
}

#[test]
fn ancestor_fields_fill_what_descendants_leave_out() {
    let registry = PresetRegistry::new()
        .with(
            "a",
            node(|n| {
                n.entry = Some("a.mjs".into());
                n.minify = Some(true);
            }),
        )
        .with(
            "x",
            PresetDefinition::new(node(|n| n.entry = Some("x.mjs".into()))).extends("a"),
        );

    let options = resolve(&Preset::named("x"), &registry).unwrap();
    assert!(options.minify);
}

#[test]
fn extends_are_applied_left_to_right() {
    let registry = PresetRegistry::new()
        .with("first", node(|n| n.base_url = Some("/first/".into())))
        .with("second", node(|n| n.base_url = Some("/second/".into())))
        .with(
            "both",
            PresetDefinition::new(ConfigNode::default())
                .extends("first")
                .extends("second"),
        );

    let options = resolve(&Preset::named("both"), &registry).unwrap();
    assert_eq!(options.base_url, "/second/");
}

#[test]
fn mutual_extends_is_a_cycle() {
    let registry = PresetRegistry::new()
        .with("a", PresetDefinition::new(ConfigNode::default()).extends("b"))
        .with("b", PresetDefinition::new(ConfigNode::default()).extends("a"));

    let err = resolve(&Preset::named("a"), &registry).unwrap_err();
    match err {
        ConfigError::CyclicExtends { chain } => assert_eq!(chain, ["a", "b", "a"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn cycle_message_shows_the_chain() {
    let registry = PresetRegistry::new()
        .with("a", PresetDefinition::new(ConfigNode::default()).extends("b"))
        .with("b", PresetDefinition::new(ConfigNode::default()).extends("a"));

    let err = resolve(&Preset::named("a"), &registry).unwrap_err();
    assert_eq!(
        err.to_string(),
        "preset `extends` chain is cyclic: a -> b -> a"
    );
}

#[test]
fn unknown_preset_lists_available_names() {
    let registry = PresetRegistry::new()
        .with("node", ConfigNode::default())
        .with("x", PresetDefinition::new(ConfigNode::default()).extends("missing"));

    let err = resolve(&Preset::named("x"), &registry).unwrap_err();
    match err {
        ConfigError::UnknownPreset { name, available } => {
            assert_eq!(name, "missing");
            assert_eq!(available.0, vec!["node".to_string(), "x".to_string()]);
            assert_eq!(available.to_string(), "available presets: node, x");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn function_presets_branch_on_the_accumulator() {
    let registry = PresetRegistry::new()
        .with("dev-base", node(|n| n.dev = Some(true)))
        .with(
            "conditional",
            Preset::function(|acc| {
                let preview = if acc.dev == Some(true) {
                    "run --watch"
                } else {
                    "run"
                };
                PresetDefinition::new(node(|n| {
                    n.commands = Some(CommandsNode {
                        preview: Some(preview.into()),
                        ..Default::default()
                    })
                }))
            }),
        )
        .with(
            "dev-app",
            PresetDefinition::new(ConfigNode::default())
                .extends("dev-base")
                .extends("conditional"),
        );

    let dev = resolve(&Preset::named("dev-app"), &registry).unwrap();
    assert_eq!(dev.commands.preview, "run --watch");

    let prod = resolve(&Preset::named("conditional"), &registry).unwrap();
    assert_eq!(prod.commands.preview, "run");
}

#[test]
fn function_presets_may_extend_named_presets() {
    let registry = PresetRegistry::new()
        .with("node", node(|n| n.node = Some(true)))
        .with(
            "fn",
            Preset::function(|_| {
                PresetDefinition::new(node(|n| n.timing = Some(true))).extends("node")
            }),
        );

    let options = resolve(&Preset::named("fn"), &registry).unwrap();
    assert!(options.node);
    assert!(options.timing);
}

#[test]
fn nested_literal_presets_resolve_in_place() {
    let registry = PresetRegistry::new().with("base", node(|n| n.timing = Some(true)));
    let nested = PresetDefinition::new(node(|n| n.minify = Some(true))).extends("base");
    let root = Preset::literal(PresetDefinition::new(ConfigNode::default()).extends(nested));

    let options = resolve(&root, &registry).unwrap();
    assert!(options.timing);
    assert!(options.minify);
}

#[test]
fn seed_overrides_the_named_preset() {
    let registry = PresetRegistry::new().with(
        "node-server",
        node(|n| {
            n.serve_static = Some(ServeStatic::Enabled);
            n.entry = Some("#internal/node-server".into());
        }),
    );

    let seed = PresetDefinition::new(node(|n| n.serve_static = Some(ServeStatic::Disabled)));
    let options = resolve_preset(seed, &registry).unwrap();

    assert_eq!(options.preset, DEFAULT_PRESET);
    assert_eq!(options.serve_static, ServeStatic::Disabled);
    assert_eq!(options.entry, "#internal/node-server");
}

#[test]
fn seed_preset_name_is_normalized() {
    let registry = PresetRegistry::new().with("deno-server", node(|n| n.node = Some(false)));
    let seed = PresetDefinition::new(node(|n| n.preset = Some("denoServer".into())));

    let options = resolve_preset(seed, &registry).unwrap();
    assert_eq!(options.preset, "deno-server");
    assert!(!options.node);
}

#[test]
fn seed_extends_apply_after_the_named_preset() {
    let registry = PresetRegistry::new()
        .with("node-server", node(|n| n.base_url = Some("/".into())))
        .with("prefixed", node(|n| n.base_url = Some("/app/".into())));

    let seed = PresetDefinition::from_value(json!({ "extends": "prefixed" })).unwrap();
    let options = resolve_preset(seed, &registry).unwrap();
    assert_eq!(options.base_url, "/app/");
}

#[test]
fn function_presets_see_seed_settings() {
    let registry = PresetRegistry::new().with(
        "node-server",
        Preset::function(|acc| {
            PresetDefinition::new(node(|n| n.minify = Some(acc.dev != Some(true))))
        }),
    );

    let seed = PresetDefinition::new(node(|n| n.dev = Some(true)));
    let options = resolve_preset(seed, &registry).unwrap();
    assert!(!options.minify);
}

#[test]
fn seed_naming_unknown_preset_fails() {
    let registry = PresetRegistry::new();
    let seed = PresetDefinition::new(node(|n| n.preset = Some("vercel".into())));

    let err = resolve_preset(seed, &registry).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownPreset { name, .. } if name == "vercel"));
}

#[test]
fn non_table_runtime_config_is_a_type_mismatch() {
    let registry = PresetRegistry::new().with("bad", node(|n| n.runtime_config = Some(json!(3))));

    let err = resolve(&Preset::named("bad"), &registry).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MergeTypeMismatch { ref field, expected: "a table", found: "a number" }
            if field == "runtime_config"
    ));
}

#[test]
fn seed_map_keys_come_before_preset_keys() {
    let mut preamble = indexmap::IndexMap::new();
    preamble.insert("process".to_string(), "node:process".to_string());
    preamble.insert("Buffer".to_string(), "node:buffer".to_string());
    let registry = PresetRegistry::new().with(
        DEFAULT_PRESET,
        node(|n| {
            n.compat = Some(kiln_config::CompatNode {
                preamble: Some(preamble),
                ..Default::default()
            })
        }),
    );

    let mut seed_preamble = indexmap::IndexMap::new();
    seed_preamble.insert("Buffer".to_string(), "buffer".to_string());
    let seed = PresetDefinition::new(node(|n| {
        n.compat = Some(kiln_config::CompatNode {
            preamble: Some(seed_preamble),
            ..Default::default()
        })
    }));

    let options = resolve_preset(seed, &registry).unwrap();
    let entries: Vec<_> = options
        .compat
        .preamble
        .iter()
        .map(|(global, module)| (global.as_str(), module.as_str()))
        .collect();
    assert_eq!(entries, [("Buffer", "buffer"), ("process", "node:process")]);
}
