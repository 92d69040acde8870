//! # Client Settings
//!
//! User-facing configuration delivered through
//! `workspace/didChangeConfiguration`. The payload is expected to carry the
//! settings under [`SETTINGS_SECTION`]:
//!
//! ```json
//! { "kaggleJsonSchemaLinter": { "enable": true, "maxDiagnostics": 50 } }
//! ```
//!
//! Missing fields take their defaults.

use kmeta_core::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration section the server reads from the client.
pub const SETTINGS_SECTION: &str = "kaggleJsonSchemaLinter";

/// Language-server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Publish diagnostics at all. When off, every document gets `[]`.
    pub enable: bool,
    /// Upper bound on diagnostics published per document.
    pub max_diagnostics: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable: true,
            max_diagnostics: None,
        }
    }
}

impl Settings {
    /// Extract settings from a `didChangeConfiguration` `settings` value.
    ///
    /// Returns `Ok(None)` when the payload has no [`SETTINGS_SECTION`]; some
    /// clients send `null` here and expect the server to keep what it has.
    pub fn from_payload(settings: &Value) -> Result<Option<Self>, serde_json::Error> {
        match settings.get(SETTINGS_SECTION) {
            Some(Value::Null) | None => Ok(None),
            Some(section) => Settings::deserialize(section).map(Some),
        }
    }

    /// The list to publish for a document with the given diagnostics.
    pub fn apply(&self, mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        if !self.enable {
            return Vec::new();
        }
        if let Some(max) = self.max_diagnostics {
            diagnostics.truncate(max);
        }
        diagnostics
    }
}
