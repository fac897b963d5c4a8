use std::time::Duration;

pub const LOADING_PHRASES: [&str; 4] = ["Now Loading", "Now Loading.", "Now Loading..", "Now Loading..."];
pub const PHRASE_INTERVAL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Loading,
    /// Assets are in; the enter button is showing.
    Ready,
    /// Overlay dismissed; the scene reacts to clicks.
    Entered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    AssetsLoaded,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEffect {
    None,
    /// Play the UI sound and start background music.
    StartAudio,
}

impl Lifecycle {
    /// Pure transition; audio and overlay changes are reported as effects.
    pub fn handle(self, event: LifecycleEvent) -> (Lifecycle, LifecycleEffect) {
        match (self, event) {
            (Lifecycle::Loading, LifecycleEvent::AssetsLoaded) => (Lifecycle::Ready, LifecycleEffect::None),
            (Lifecycle::Ready, LifecycleEvent::Enter) => (Lifecycle::Entered, LifecycleEffect::StartAudio),
            (state, _) => (state, LifecycleEffect::None),
        }
    }

    pub fn accepts_scene_clicks(self) -> bool {
        self == Lifecycle::Entered
    }
}

/// Cycles the loading status text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingTicker {
    elapsed: Duration,
}

impl LoadingTicker {
    pub fn advance(&mut self, dt: Duration) {
        let period = PHRASE_INTERVAL * LOADING_PHRASES.len() as u32;
        // Only the phase matters.
        let nanos = (self.elapsed + dt).as_nanos() % period.as_nanos();
        self.elapsed = Duration::from_nanos(nanos as u64);
    }

    pub fn phrase(&self) -> &'static str {
        let index = (self.elapsed.as_millis() / PHRASE_INTERVAL.as_millis()) as usize;
        LOADING_PHRASES[index % LOADING_PHRASES.len()]
    }
}
