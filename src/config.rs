//! Engine settings: scan options plus extra grammar definitions loaded from disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "zlex.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Maximum number of simultaneously open regions; `None` is unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl ScanOptions {
    pub fn allows_region_at(&self, open_regions: usize) -> bool {
        self.max_depth.map_or(true, |max| open_regions < max)
    }
}

/// A JSON grammar definition bound to file extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarSource {
    pub path: PathBuf,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanOptions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grammars: Vec<GrammarSource>,
}

impl Settings {
    /// Relative grammar paths are resolved against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        for source in &mut self.grammars {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
        self
    }
}

pub fn load_settings(path: &Path) -> std::io::Result<Settings> {
    let data = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&data)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(match path.parent() {
        Some(base) => settings.resolve_paths(base),
        None => settings,
    })
}

/// Write default settings to `path` unless a file already exists there.
pub fn ensure_settings_file(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content =
            serde_json::to_string_pretty(&Settings::default()).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
