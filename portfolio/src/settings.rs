use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AudioSettings {
    pub start_muted: bool,
    pub music_volume: f32,
    pub sfx_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            start_muted: false,
            music_volume: 1.0,
            sfx_volume: 1.0,
        }
    }
}

impl AudioSettings {
    pub fn clamp(mut self) -> Self {
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VideoSettings {
    pub vsync: bool,
    /// Fraction of the window resolution the scene is painted at.
    pub render_scale: f32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            render_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub video: VideoSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            audio: AudioSettings::default(),
            video: VideoSettings::default(),
        }
    }
}

impl PlayerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.audio = self.audio.clamp();
        self.video.render_scale = self.video.render_scale.clamp(0.25, 1.0);
        self
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("PORTFOLIO_SETTINGS_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self::new(base.join("portfolio").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load(&self) -> PlayerSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return PlayerSettings::default();
        };
        match serde_json::from_slice::<PlayerSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                log::warn!("ignoring corrupt settings file {}: {err}", self.path.display());
                PlayerSettings::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_expected_fields() {
        let settings = PlayerSettings {
            version: 99,
            audio: AudioSettings {
                start_muted: true,
                music_volume: 3.0,
                sfx_volume: -2.0,
            },
            video: VideoSettings {
                vsync: false,
                render_scale: 4.0,
            },
        }
        .sanitized();

        assert_eq!(settings.version, 1);
        assert_eq!(settings.audio.music_volume, 1.0);
        assert_eq!(settings.audio.sfx_volume, 0.0);
        assert_eq!(settings.video.render_scale, 1.0);
        assert!(settings.audio.start_muted);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: PlayerSettings =
            serde_json::from_str(r#"{"audio":{"start_muted":true,"music_volume":0.5,"sfx_volume":0.5}}"#)
                .expect("settings JSON should parse");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.video, VideoSettings::default());
        assert!(parsed.audio.start_muted);
    }

    #[test]
    fn store_reads_saved_file_and_sanitizes_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"audio":{"start_muted":true,"music_volume":2.0,"sfx_volume":0.5}}"#,
        )
        .expect("write");
        let store = SettingsStore::new(&path);
        let settings = store.load();
        assert!(settings.audio.start_muted);
        assert_eq!(settings.audio.music_volume, 1.0);
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SettingsStore::new(dir.path().join("nested/settings.json"));
        assert_eq!(store.load(), PlayerSettings::default());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");
        assert_eq!(SettingsStore::new(path).load(), PlayerSettings::default());
    }
}
