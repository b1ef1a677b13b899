//! Settings management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub script: ScriptSettings,
    pub audio: AudioSettings,
    pub assets: AssetSettings,
    pub logging: LogSettings,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Sketch Playground".to_string(),
            width: 600,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// QuickJS heap cap in megabytes; 0 disables the cap.
    pub memory_limit_mb: usize,
    pub max_stack_kb: usize,
    /// Seconds per frame; wall clock when unset.
    pub fixed_timestep: Option<f32>,
    /// Seed for `random()` and `noise()`; time-seeded when unset.
    pub random_seed: Option<u64>,
    pub max_diagnostics: usize,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            memory_limit_mb: 256,
            max_stack_kb: 1024,
            fixed_timestep: None,
            random_seed: None,
            max_diagnostics: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub master_volume: f32,
    /// Longest sound a script may synthesise, in seconds.
    pub max_sound_seconds: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            master_volume: 1.0,
            max_sound_seconds: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub root: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [window]
            width = 800

            [script]
            fixed_timestep = 0.02
            random_seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(settings.window.width, 800);
        assert_eq!(settings.window.height, 600);
        assert_eq!(settings.script.fixed_timestep, Some(0.02));
        assert_eq!(settings.script.random_seed, Some(9));
        assert_eq!(settings.script.max_diagnostics, 256);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sketch.toml");
        std::fs::write(&path, "[audio]\nmaster_volume = 0.5\nmax_sound_seconds = 5.0\n").unwrap();
        let audio = Settings::load(&path).unwrap().audio;
        assert_eq!(audio.master_volume, 0.5);
        assert_eq!(audio.max_sound_seconds, 5.0);
    }

    #[test]
    fn bad_types_are_parse_errors() {
        let err = Settings::from_toml_str("[window]\nwidth = \"wide\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
