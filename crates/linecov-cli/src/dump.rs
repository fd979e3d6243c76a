//! Program dumps and hit traces
//!
//! A dump is the compiled state of a program at one point in time:
//!
//! ```json
//! {
//!   "scripts":   [{ "filename": "/app/index.php", "instructions": [...] }],
//!   "functions": [{ "name": "greet", "filename": "/app/index.php", "instructions": [...] }],
//!   "classes":   [{ "name": "Greeter", "methods": [...] }]
//! }
//! ```
//!
//! A hit trace is the statement stream the host would have reported, as
//! `[{ "file": "/app/index.php", "line": 3 }, ...]`.

use crate::error::{CliError, CliResult};
use linecov::{BytecodeBody, Registry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Compiled program: top-level scripts plus the function and class registries
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProgramDump {
    /// Top-level bodies, one per compiled file
    #[serde(default)]
    pub scripts: Vec<BytecodeBody>,
    /// Functions and classes visible to the symbol walk
    #[serde(flatten)]
    pub registry: Registry,
}

impl ProgramDump {
    /// Parse a dump from JSON text
    pub fn from_json(text: &str) -> CliResult<Self> {
        let dump: Self = serde_json::from_str(text)?;
        if dump.scripts.is_empty() && dump.registry.bodies().next().is_none() {
            return Err(CliError::invalid_input("dump holds no bodies"));
        }
        Ok(dump)
    }

    /// Every body: scripts first, then registry bodies
    pub fn bodies(&self) -> impl Iterator<Item = &BytecodeBody> {
        self.scripts.iter().chain(self.registry.bodies())
    }
}

/// One executed statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Source file
    pub file: String,
    /// Line number
    pub line: u32,
}

/// Load a dump from disk
pub fn load_dump(path: &Path) -> CliResult<ProgramDump> {
    let text = std::fs::read_to_string(path)?;
    ProgramDump::from_json(&text).map_err(|e| match e {
        CliError::Json(e) => CliError::invalid_input(format!("{}: {e}", path.display())),
        other => other,
    })
}

/// Load a hit trace from disk
pub fn load_hits(path: &Path) -> CliResult<Vec<HitEvent>> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::invalid_input(format!("{}: {e}", path.display())))
}
