use serde::{Deserialize, Serialize};

/// Module format of emitted server chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ES modules (default)
    #[default]
    Esm,
    /// CommonJS
    Cjs,
}

/// How the built server serves files from the public directory
///
/// Written as `false`, `true`, `"node"` or `"deno"` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ServeStaticRepr", into = "ServeStaticRepr")]
pub enum ServeStatic {
    /// Static files are served by the platform, not the server (default)
    #[default]
    Disabled,
    /// Served by the server using the runtime's default file APIs
    Enabled,
    /// Served with Node.js file APIs
    Node,
    /// Served with Deno file APIs
    Deno,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ServeStaticRepr {
    Flag(bool),
    Runtime(String),
}

impl TryFrom<ServeStaticRepr> for ServeStatic {
    type Error = String;

    fn try_from(repr: ServeStaticRepr) -> Result<Self, Self::Error> {
        match repr {
            ServeStaticRepr::Flag(false) => Ok(Self::Disabled),
            ServeStaticRepr::Flag(true) => Ok(Self::Enabled),
            ServeStaticRepr::Runtime(name) => match name.as_str() {
                "node" => Ok(Self::Node),
                "deno" => Ok(Self::Deno),
                other => Err(format!(
                    "unknown serve_static runtime `{other}` (expected true, false, \"node\" or \"deno\")"
                )),
            },
        }
    }
}

impl From<ServeStatic> for ServeStaticRepr {
    fn from(value: ServeStatic) -> Self {
        match value {
            ServeStatic::Disabled => Self::Flag(false),
            ServeStatic::Enabled => Self::Flag(true),
            ServeStatic::Node => Self::Runtime("node".to_string()),
            ServeStatic::Deno => Self::Runtime("deno".to_string()),
        }
    }
}

/// Import bound to a free global by the bundler's inject step
///
/// `"buffer"` imports the module's default export, `["timers", "setTimeout"]`
/// imports a named export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InjectBinding {
    Module(String),
    Export(String, String),
}

impl InjectBinding {
    pub fn module(&self) -> &str {
        match self {
            Self::Module(module) | Self::Export(module, _) => module,
        }
    }
}
