#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::{Error, Result};

/// Severity a [`TracingSink`](crate::diagnostics::TracingSink) uses for
/// unrecognized-child diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiagnosticLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

/// Settings for the default tracing-backed diagnostic sink.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiagnosticsConfig {
    pub unrecognized_level: DiagnosticLevel,
    /// Emit one `trace` event per placed fiber (clone or create).
    pub trace_placements: bool,
}

#[cfg(feature = "serde")]
impl DiagnosticsConfig {
    /// Parse from JSON; absent fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }
}
