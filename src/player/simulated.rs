use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::trace;
use url::Url;

use super::traits::{EndOfMediaObserver, PlaybackEngine, TimeObserver, WindowGeometry};
use super::types::{InterfaceOrientation, PlaybackTime};

/// Command recorded by `SimulatedEngine`
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(Url),
    Play,
    Pause,
    Seek(Duration),
}

#[derive(Default)]
struct EngineState {
    calls: Vec<EngineCall>,
    playing: bool,
    position: Duration,
    duration: Option<Duration>,
    time_observers: Vec<TimeObserver>,
    end_observers: Vec<EndOfMediaObserver>,
}

/// In-memory engine that keeps a clock instead of decoding anything.
///
/// Time only moves when `advance` is called, which keeps tests and the demo
/// deterministic.
#[derive(Default)]
pub struct SimulatedEngine {
    state: Mutex<EngineState>,
}

impl SimulatedEngine {
    pub fn new(duration: Option<Duration>) -> Self {
        let engine = Self::default();
        engine.lock().duration = duration;
        engine
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    pub fn seeks(&self) -> Vec<Duration> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Seek(position) => Some(*position),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    pub fn set_position(&self, position: Duration) {
        self.lock().position = position;
    }

    /// Move the clock forward while playing, notifying observers like a
    /// real engine would. Reaching the end fires the end-of-media observers.
    pub fn advance(&self, elapsed: Duration) {
        let mut state = self.lock();
        if !state.playing {
            return;
        }

        let mut position = state.position + elapsed;
        let mut reached_end = false;
        if let Some(duration) = state.duration
            && position >= duration
        {
            position = duration;
            reached_end = true;
        }
        state.position = position;

        let time = PlaybackTime {
            position,
            duration: state.duration,
        };
        for observer in &state.time_observers {
            observer(time);
        }

        if reached_end {
            state.playing = false;
            for observer in &state.end_observers {
                observer();
            }
        }
    }
}

#[async_trait]
impl PlaybackEngine for SimulatedEngine {
    async fn load_media(&self, url: &Url) -> Result<()> {
        trace!("Simulated engine loading {}", url);
        let mut state = self.lock();
        state.calls.push(EngineCall::Load(url.clone()));
        state.position = Duration::ZERO;
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(EngineCall::Play);
        state.playing = true;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(EngineCall::Pause);
        state.playing = false;
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(EngineCall::Seek(position));
        state.position = match state.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
        Ok(())
    }

    async fn position(&self) -> Option<Duration> {
        Some(self.lock().position)
    }

    async fn duration(&self) -> Option<Duration> {
        self.lock().duration
    }

    fn register_periodic_time_observer(&self, _interval: Duration, observer: TimeObserver) {
        self.lock().time_observers.push(observer);
    }

    fn register_end_of_media_observer(&self, observer: EndOfMediaObserver) {
        self.lock().end_observers.push(observer);
    }
}

/// Window that remembers the orientations it was asked for
#[derive(Default)]
pub struct RecordingWindow {
    requests: Mutex<Vec<InterfaceOrientation>>,
}

impl RecordingWindow {
    pub fn requests(&self) -> Vec<InterfaceOrientation> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl WindowGeometry for RecordingWindow {
    fn request_orientation(&self, orientation: InterfaceOrientation) {
        trace!("Window asked to rotate to {:?}", orientation);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(orientation);
        }
    }
}
