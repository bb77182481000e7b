use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::domain::frame_source::CameraConfig;
use crate::input::domain::expression_mapper::Thresholds;
use crate::input::domain::provider_config::{ModelConfig, ProviderConfig};
use crate::shared::constants::{APP_DIR_NAME, CAMERA_HEIGHT, CAMERA_WIDTH, DEFAULT_FPS};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistent tuning, stored as JSON in the user's config directory.
///
/// Every field has a default, so partial files written by older versions
/// still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps: u32,
    pub camera_index: u32,
    /// Backend-specific device string, overrides `camera_index`.
    pub camera_device: Option<String>,
    pub model_path: Option<PathBuf>,
    pub model_url: Option<String>,
    pub frame_skip: u32,
    pub mirror: bool,
    pub threaded_inference: bool,
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            camera_index: 0,
            camera_device: None,
            model_path: None,
            model_url: None,
            frame_skip: 0,
            mirror: false,
            threaded_inference: false,
            thresholds: Thresholds::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing files yield defaults silently; unreadable ones are logged.
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Ignoring settings at {}: {e}", path.display());
                return Self::default();
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed settings at {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(write_err)
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            camera: CameraConfig {
                index: self.camera_index,
                device: self.camera_device.clone(),
                width: CAMERA_WIDTH,
                height: CAMERA_HEIGHT,
                fps: self.fps,
            },
            model: ModelConfig {
                path: self.model_path.clone(),
                url: self.model_url.clone(),
            },
            thresholds: self.thresholds.clone(),
            frame_skip: self.frame_skip,
            mirror: self.mirror,
            threaded_inference: self.threaded_inference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_from(&tmp.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_remaining_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{ "frame_skip": 2, "thresholds": { "blink": 0.7 } }"#).unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.frame_skip, 2);
        assert_relative_eq!(settings.thresholds.blink, 0.7);
        assert_relative_eq!(settings.thresholds.mouth, Thresholds::default().mouth);
        assert_eq!(settings.fps, DEFAULT_FPS);
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.camera_device = Some("/dev/video2".to_string());
        settings.thresholds.tilt_degrees = 22.0;

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_provider_config_carries_tuning() {
        let mut settings = Settings::default();
        settings.camera_index = 3;
        settings.frame_skip = 1;
        settings.threaded_inference = true;

        let config = settings.provider_config();

        assert_eq!(config.camera.index, 3);
        assert_eq!(config.camera.width, CAMERA_WIDTH);
        assert_eq!(config.frame_skip, 1);
        assert!(config.threaded_inference);
    }
}
