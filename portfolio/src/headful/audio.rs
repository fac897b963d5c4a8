//! Device audio through rodio: one sink per clip, decoded from bytes kept in memory.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use engine::audio::{AudioBackend, AudioError, ClipSettings, LoopSynth, ambient_room_loop};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

const SYNTH_SAMPLE_RATE: u32 = 44_100;

/// Procedural loop standing in for a missing music file.
struct SynthSource {
    synth: LoopSynth,
}

impl Iterator for SynthSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        Some(self.synth.next_mono_sample())
    }
}

impl Source for SynthSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.synth.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

enum ClipData {
    Encoded(Arc<[u8]>),
    Synth,
}

struct Clip {
    data: ClipData,
    settings: ClipSettings,
    sink: Option<Sink>,
}

pub struct RodioAudio {
    // Dropping the stream silences every sink.
    output: Option<(OutputStream, OutputStreamHandle)>,
    clips: HashMap<String, Clip>,
}

impl RodioAudio {
    /// Opens the default output device. Without one, every call is a silent no-op.
    pub fn open() -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(err) => {
                log::warn!("{}", AudioError::Device(err.to_string()));
                None
            }
        };
        Self {
            output,
            clips: HashMap::new(),
        }
    }

    fn start(&self, clip: &Clip) -> Option<Sink> {
        let (_, handle) = self.output.as_ref()?;
        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(err) => {
                log::warn!("audio sink unavailable: {err}");
                return None;
            }
        };
        sink.set_volume(clip.settings.volume);
        match &clip.data {
            ClipData::Synth => sink.append(SynthSource {
                synth: ambient_room_loop(SYNTH_SAMPLE_RATE),
            }),
            ClipData::Encoded(bytes) => {
                let cursor = Cursor::new(Arc::clone(bytes));
                let decoded = if clip.settings.looping {
                    Decoder::new_looped(cursor).map(|d| sink.append(d))
                } else {
                    Decoder::new(cursor).map(|d| sink.append(d))
                };
                if let Err(err) = decoded {
                    log::warn!("clip failed to decode at play time: {err}");
                    return None;
                }
            }
        }
        Some(sink)
    }
}

impl AudioBackend for RodioAudio {
    fn load(&mut self, id: &str, path: &Path, settings: ClipSettings) -> Result<(), AudioError> {
        let data = match fs::read(path) {
            Ok(bytes) => {
                let bytes: Arc<[u8]> = bytes.into();
                Decoder::new(Cursor::new(Arc::clone(&bytes))).map_err(|err| AudioError::Decode {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })?;
                ClipData::Encoded(bytes)
            }
            Err(err) if settings.looping => {
                log::info!("{} unreadable ({err}); using the built-in loop", path.display());
                ClipData::Synth
            }
            Err(source) => {
                return Err(AudioError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.clips.insert(
            id.to_string(),
            Clip {
                data,
                settings,
                sink: None,
            },
        );
        Ok(())
    }

    fn play(&mut self, id: &str) {
        let Some(clip) = self.clips.get(id) else {
            return;
        };
        if clip.settings.looping {
            if let Some(sink) = &clip.sink {
                sink.play();
                return;
            }
        }
        let sink = self.start(clip);
        if let Some(clip) = self.clips.get_mut(id) {
            // Replacing the old sink drops it, which stops a one-shot mid-play.
            clip.sink = sink;
        }
    }

    fn stop(&mut self, id: &str) {
        if let Some(sink) = self.clips.get_mut(id).and_then(|c| c.sink.take()) {
            sink.stop();
        }
    }

    fn pause(&mut self, id: &str) {
        if let Some(sink) = self.clips.get(id).and_then(|c| c.sink.as_ref()) {
            sink.pause();
        }
    }

    fn resume(&mut self, id: &str) {
        if let Some(sink) = self.clips.get(id).and_then(|c| c.sink.as_ref()) {
            sink.play();
        }
    }
}
