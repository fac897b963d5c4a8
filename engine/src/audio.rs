//! Audio backend seam plus a tiny procedural loop synth.
//!
//! Game code talks to [`AudioBackend`]; the headful binary provides a real device backend and
//! tests use [`AudioLog`].

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSettings {
    /// 0..=1.
    pub volume: f32,
    pub looping: bool,
}

impl ClipSettings {
    pub fn one_shot(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            looping: false,
        }
    }

    pub fn looping(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            looping: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to read clip {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode clip {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("no audio output device: {0}")]
    Device(String),
}

/// Playback of named clips.
///
/// `play` restarts one-shots from the beginning. For looping clips it starts playback if stopped
/// and resumes if paused; a loop that is already running keeps going.
pub trait AudioBackend {
    fn load(&mut self, id: &str, path: &Path, settings: ClipSettings) -> Result<(), AudioError>;
    fn play(&mut self, id: &str);
    fn stop(&mut self, id: &str);
    fn pause(&mut self, id: &str);
    fn resume(&mut self, id: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Load(String),
    Play(String),
    Stop(String),
    Pause(String),
    Resume(String),
}

/// Records every backend call in order.
#[derive(Debug, Default, Clone)]
pub struct AudioLog {
    pub calls: Vec<AudioCall>,
    /// Clip ids whose `load` should fail, to exercise missing-asset paths.
    pub missing: Vec<String>,
}

impl AudioLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing(mut self, id: &str) -> Self {
        self.missing.push(id.to_string());
        self
    }

    pub fn plays(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Play(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl AudioBackend for AudioLog {
    fn load(&mut self, id: &str, path: &Path, _settings: ClipSettings) -> Result<(), AudioError> {
        if self.missing.iter().any(|m| m == id) {
            return Err(AudioError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        self.calls.push(AudioCall::Load(id.to_string()));
        Ok(())
    }

    fn play(&mut self, id: &str) {
        self.calls.push(AudioCall::Play(id.to_string()));
    }

    fn stop(&mut self, id: &str) {
        self.calls.push(AudioCall::Stop(id.to_string()));
    }

    fn pause(&mut self, id: &str) {
        self.calls.push(AudioCall::Pause(id.to_string()));
    }

    fn resume(&mut self, id: &str) {
        self.calls.push(AudioCall::Resume(id.to_string()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Saw,
}

fn waveform_sample(wave: Waveform, phase: f32) -> f32 {
    match wave {
        Waveform::Sine => phase.sin(),
        Waveform::Triangle => (2.0 / std::f32::consts::PI) * phase.sin().asin(),
        Waveform::Square => {
            if phase.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Saw => 2.0 * (phase / TAU) - 1.0,
    }
}

fn envelope(in_step: f32, attack: f32, release: f32) -> f32 {
    if attack > 0.0 && in_step < attack {
        return in_step / attack;
    }
    if release > 0.0 && in_step > (1.0 - release) {
        return ((1.0 - in_step) / release).max(0.0);
    }
    1.0
}

/// One voice of a [`LoopSynth`]: a repeating list of notes (None = rest).
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    notes_hz: Vec<Option<f32>>,
    step_beats: f32,
    waveform: Waveform,
    gain: f32,
    phase: f32,
}

impl Voice {
    pub fn new(notes_hz: impl Into<Vec<Option<f32>>>, step_beats: f32) -> Self {
        let mut notes_hz = notes_hz.into();
        if notes_hz.is_empty() {
            notes_hz.push(None);
        }
        Self {
            notes_hz,
            step_beats: step_beats.max(0.0625),
            waveform: Waveform::Sine,
            gain: 0.2,
            phase: 0.0,
        }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.max(0.0);
        self
    }

    fn next_sample(&mut self, beat: f64, sample_rate: u32) -> f32 {
        let step_pos = beat as f32 / self.step_beats;
        let index = (step_pos.floor() as usize) % self.notes_hz.len();
        let Some(freq_hz) = self.notes_hz[index] else {
            return 0.0;
        };
        self.phase = (self.phase + TAU * freq_hz / sample_rate as f32) % TAU;
        waveform_sample(self.waveform, self.phase) * self.gain * envelope(step_pos.fract(), 0.05, 0.15)
    }
}

/// Endless mono music loop driven by a sample clock.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSynth {
    sample_rate: u32,
    bpm: f32,
    sample_clock: u64,
    voices: Vec<Voice>,
}

impl LoopSynth {
    pub fn new(sample_rate: u32, bpm: f32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            bpm: bpm.max(1.0),
            sample_clock: 0,
            voices: Vec::new(),
        }
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voices.push(voice);
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn beat_position(&self) -> f64 {
        self.sample_clock as f64 * self.bpm as f64 / (self.sample_rate as f64 * 60.0)
    }

    pub fn next_mono_sample(&mut self) -> f32 {
        let beat = self.beat_position();
        let sample_rate = self.sample_rate;
        let sum: f32 = self
            .voices
            .iter_mut()
            .map(|v| v.next_sample(beat, sample_rate))
            .sum();
        self.sample_clock = self.sample_clock.wrapping_add(1);
        // Soft-limit to avoid clipping.
        sum.tanh() * 0.9
    }
}

/// A mellow room loop used when no music file ships with the assets.
pub fn ambient_room_loop(sample_rate: u32) -> LoopSynth {
    const C4: f32 = 261.63;
    const E4: f32 = 329.63;
    const G4: f32 = 392.0;
    const A3: f32 = 220.0;
    const F3: f32 = 174.61;
    LoopSynth::new(sample_rate, 84.0)
        .with_voice(
            Voice::new(
                vec![Some(C4), Some(E4), Some(G4), None, Some(A3 * 2.0), Some(G4), Some(E4), None],
                0.5,
            )
            .with_waveform(Waveform::Triangle)
            .with_gain(0.18),
        )
        .with_voice(
            Voice::new(vec![Some(C4 / 2.0), Some(A3 / 2.0), Some(F3 / 2.0), Some(G4 / 4.0)], 2.0)
                .with_gain(0.22),
        )
}
