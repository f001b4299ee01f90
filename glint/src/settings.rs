//! Code mining settings, loaded from `minings.toml`.
//!
//! Hosts load the file once at composition time and pass the settings to
//! [`crate::CodeMiningManager::new`]. Tests construct the struct directly or
//! rely on [`Default`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Host-facing configuration for the mining subsystem.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeMiningSettings {
    /// Master switch. When false, `run()` cancels in-flight work and renders
    /// nothing, so toggling minings off clears pending cycles.
    pub enabled: bool,

    /// Separator the host paints between consecutive contributed minings of
    /// one annotation.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Suggested delay between a document change and the host's next
    /// [`run`](crate::CodeMiningManager::run) call, in milliseconds. The
    /// manager itself never sleeps; debouncing is the host's loop's job.
    #[serde(default = "default_update_debounce_ms")]
    pub update_debounce_ms: u64,
}

impl Default for CodeMiningSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            separator: default_separator(),
            update_debounce_ms: default_update_debounce_ms(),
        }
    }
}

fn default_separator() -> String {
    " | ".to_string()
}

fn default_update_debounce_ms() -> u64 {
    250
}

impl CodeMiningSettings {
    /// Read and deserialize a TOML settings file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: CodeMiningSettings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let settings = CodeMiningSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.separator, " | ");
        assert_eq!(settings.update_debounce_ms, 250);
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "enabled = false").expect("write");

        let settings = CodeMiningSettings::load(file.path()).expect("load");
        assert!(!settings.enabled);
        assert_eq!(settings.separator, " | ");
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "separator = \" - \"\nno_such_field = 1").expect("write");

        assert!(CodeMiningSettings::load(file.path()).is_err());
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(CodeMiningSettings::load(Path::new("/nonexistent/minings.toml")).is_err());
    }
}
