use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default data bytes per transfer frame. Fits a 185-byte ATT MTU with room
/// for the opcode, the sequence byte and the ATT header.
pub const DEFAULT_CHUNK_SIZE: usize = 180;

/// Application configuration stored as TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Last speaker Bluetooth address.
    pub device_address: Option<String>,
    /// Last speaker name.
    pub device_name: Option<String>,
    /// Data bytes per OTA or sound upload frame.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Print decoded frames as JSON instead of text.
    #[serde(default)]
    pub json_output: bool,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device_address: None,
            device_name: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Config file path: ~/.config/myspeaker/config.toml
    pub fn path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("myspeaker");
        config_dir.join("config.toml")
    }

    /// Load config from disk, or return defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<Self>(&contents) {
                    Ok(config) => return config.sanitized(),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }
        Self::default()
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        tracing::info!("Config saved to {}", path.display());
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        if self.chunk_size == 0 {
            tracing::warn!("chunk_size of 0 in config, using {}", DEFAULT_CHUNK_SIZE);
            self.chunk_size = DEFAULT_CHUNK_SIZE;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("myspeaker-test-{}-{}", std::process::id(), name))
            .join("config.toml")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load_from(&temp_path("missing"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.chunk_size, 180);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let config = AppConfig {
            device_address: Some("AA:BB:CC:DD:EE:FF".into()),
            device_name: Some("Den".into()),
            chunk_size: 244,
            json_output: true,
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_and_bad_files() {
        let path = temp_path("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        std::fs::write(&path, "device_name = \"Den\"\nchunk_size = 0\n").unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config.device_name.as_deref(), Some("Den"));
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(!config.json_output);

        std::fs::write(&path, "chunk_size = \"big\"").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
