// Application settings
// Loaded from ~/.config/alignchart/settings.json

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Storage
    #[serde(rename = "store.path")]
    pub store_path: Option<PathBuf>,  // None = data dir default

    // Grid
    #[serde(rename = "grid.renumberOnDelete")]
    pub renumber_on_delete: bool,

    // Export
    #[serde(rename = "export.background")]
    pub export_background: String,

    #[serde(rename = "export.allowCrossOrigin")]
    pub export_allow_cross_origin: bool,

    #[serde(rename = "export.directory")]
    pub export_directory: Option<PathBuf>,  // None = current directory

    // Upload
    #[serde(rename = "upload.maxBytes")]
    pub upload_max_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: None,
            renumber_on_delete: false,
            export_background: "#ffffff".to_string(),
            export_allow_cross_origin: true,
            export_directory: None,
            upload_max_bytes: 5 * 1024 * 1024,
        }
    }
}

const DEFAULT_FILE: &str = r##"{
    // Chart storage (SQLite). null = platform data directory
    "store.path": null,

    // Move images and captions along with their row/column on delete.
    // false keeps them on their old positions (only the deleted index is cleared).
    "grid.renumberOnDelete": false,

    // Export
    "export.background": "#ffffff",
    "export.allowCrossOrigin": true,
    "export.directory": null,

    // Largest image accepted from the device, in bytes
    "upload.maxBytes": 5242880
}
"##;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("alignchart")
            .join("settings.json")
    }

    /// Default location of the chart store
    pub fn default_store_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("alignchart")
            .join("chart.db")
    }

    /// Store path after applying the default
    pub fn effective_store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(Self::default_store_path)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }
        Self::load_from(&path)
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                warn!("Error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring lines that start with `//`
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Error creating config directory: {}", e);
                return;
            }
        }
        if let Err(e) = fs::write(path, DEFAULT_FILE) {
            warn!("Error writing default settings.json: {}", e);
        }
    }
}
