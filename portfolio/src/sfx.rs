use std::collections::HashSet;
use std::path::Path;

use engine::audio::{AudioBackend, ClipSettings};

use crate::settings::AudioSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    BackgroundMusic,
    /// Default UI sound: modals, enter, audio toggle.
    Projects,
    /// Bounce sound.
    Pokemon,
    Chair,
    Jump,
}

impl SoundId {
    pub const ALL: [SoundId; 5] = [
        SoundId::BackgroundMusic,
        SoundId::Projects,
        SoundId::Pokemon,
        SoundId::Chair,
        SoundId::Jump,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SoundId::BackgroundMusic => "backgroundMusic",
            SoundId::Projects => "projectsSFX",
            SoundId::Pokemon => "pokemonSFX",
            SoundId::Chair => "Chair",
            SoundId::Jump => "jumpSFX",
        }
    }

    /// File name under the assets `sfx/` directory.
    pub fn file(self) -> &'static str {
        match self {
            SoundId::BackgroundMusic => "massobeats_chamomile.ogg",
            SoundId::Projects => "projects.ogg",
            SoundId::Pokemon => "pokemon.ogg",
            SoundId::Chair => "chair.ogg",
            SoundId::Jump => "jumpsfx.ogg",
        }
    }

    pub fn base_volume(self) -> f32 {
        match self {
            SoundId::BackgroundMusic => 0.3,
            SoundId::Projects | SoundId::Pokemon | SoundId::Chair => 0.5,
            SoundId::Jump => 1.0,
        }
    }

    pub fn is_music(self) -> bool {
        self == SoundId::BackgroundMusic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Stopped,
    Playing,
    Paused,
}

/// Named clips behind one mute switch.
pub struct SoundRegistry<B: AudioBackend> {
    backend: B,
    loaded: HashSet<SoundId>,
    muted: bool,
    music: MusicState,
    /// Music has been started by the page at least once and not explicitly stopped.
    music_enabled: bool,
}

impl<B: AudioBackend> SoundRegistry<B> {
    /// Loads every clip from `<assets>/sfx/`. Clips that fail to load stay silent.
    pub fn load(mut backend: B, assets: &Path, audio: AudioSettings) -> Self {
        let mut loaded = HashSet::new();
        for id in SoundId::ALL {
            let gain = if id.is_music() {
                audio.music_volume
            } else {
                audio.sfx_volume
            };
            let volume = id.base_volume() * gain.clamp(0.0, 1.0);
            let settings = if id.is_music() {
                ClipSettings::looping(volume)
            } else {
                ClipSettings::one_shot(volume)
            };
            let path = assets.join("sfx").join(id.file());
            match backend.load(id.name(), &path, settings) {
                Ok(()) => {
                    loaded.insert(id);
                }
                Err(err) => log::warn!("sound {} unavailable: {err}", id.name()),
            }
        }
        Self {
            backend,
            loaded,
            muted: audio.start_muted,
            music: MusicState::Stopped,
            music_enabled: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn music_state(&self) -> MusicState {
        self.music
    }

    /// Plays `id` unless muted. One-shots restart; music continues or resumes.
    pub fn play(&mut self, id: SoundId) {
        if self.muted {
            return;
        }
        if !self.loaded.contains(&id) {
            log::debug!("sound {} not loaded; skipping", id.name());
            return;
        }
        if id.is_music() {
            self.music_enabled = true;
            match self.music {
                MusicState::Playing => {}
                MusicState::Paused => {
                    self.backend.resume(id.name());
                    self.music = MusicState::Playing;
                }
                MusicState::Stopped => {
                    self.backend.play(id.name());
                    self.music = MusicState::Playing;
                }
            }
        } else {
            self.backend.play(id.name());
        }
    }

    /// Stops regardless of mute.
    pub fn stop(&mut self, id: SoundId) {
        if !self.loaded.contains(&id) {
            return;
        }
        self.backend.stop(id.name());
        if id.is_music() {
            self.music = MusicState::Stopped;
            self.music_enabled = false;
        }
    }

    /// Marks background music as wanted and starts it now unless muted.
    pub fn enable_music(&mut self) {
        self.music_enabled = true;
        self.play(SoundId::BackgroundMusic);
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if muted {
            if self.music == MusicState::Playing {
                self.backend.pause(SoundId::BackgroundMusic.name());
                self.music = MusicState::Paused;
            }
        } else if self.music_enabled {
            self.play(SoundId::BackgroundMusic);
        }
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }
}
