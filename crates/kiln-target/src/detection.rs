//! Auto-detection of the deployment preset from the environment and project files.

use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

use crate::presets::{DENO_DEPLOY, DENO_SERVER, NODE_SERVER};

/// Set by Deno Deploy on every deployment
pub const DENO_DEPLOYMENT_ID: &str = "DENO_DEPLOYMENT_ID";

/// Detect the preset for a project
///
/// Checks, in order:
/// - `DENO_DEPLOYMENT_ID` in the environment → `deno-deploy`
/// - `deno.json` or `deno.jsonc` → `deno-server`
/// - Otherwise → `node-server` (default)
pub fn detect_preset(project_root: &Path) -> &'static str {
    detect_preset_with(project_root, |key| std::env::var_os(key))
}

/// [`detect_preset`] with an explicit environment lookup.
pub fn detect_preset_with<F>(project_root: &Path, env: F) -> &'static str
where
    F: Fn(&str) -> Option<OsString>,
{
    let preset = if env(DENO_DEPLOYMENT_ID).is_some_and(|id| !id.is_empty()) {
        DENO_DEPLOY
    } else if ["deno.json", "deno.jsonc"]
        .iter()
        .any(|file| project_root.join(file).exists())
    {
        DENO_SERVER
    } else {
        NODE_SERVER
    };

    debug!(preset, root = %project_root.display(), "detected preset");
    preset
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    #[test]
    fn defaults_to_node_server() {
        let dir = TempDir::new().unwrap();
        assert_eq!(detect_preset_with(dir.path(), no_env), NODE_SERVER);
    }

    #[test]
    fn deno_config_selects_deno_server() {
        for file in ["deno.json", "deno.jsonc"] {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join(file), "{}").unwrap();
            assert_eq!(detect_preset_with(dir.path(), no_env), DENO_SERVER);
        }
    }

    #[test]
    fn deployment_id_wins_over_project_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("deno.json"), "{}").unwrap();

        let env = |key: &str| (key == DENO_DEPLOYMENT_ID).then(|| OsString::from("abc123"));
        assert_eq!(detect_preset_with(dir.path(), env), DENO_DEPLOY);
    }

    #[test]
    fn empty_deployment_id_is_ignored() {
        let dir = TempDir::new().unwrap();
        let env = |_: &str| Some(OsString::new());
        assert_eq!(detect_preset_with(dir.path(), env), NODE_SERVER);
    }
}
