use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::types::{InterfaceOrientation, PlaybackTime};

pub type TimeObserver = Box<dyn Fn(PlaybackTime) + Send + Sync>;
pub type EndOfMediaObserver = Box<dyn Fn() + Send + Sync>;

/// Native playback engine wrapped by the player component.
///
/// Implementations own decoding and rendering. Commands are expected to
/// succeed or silently no-op; errors returned here are only logged.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    async fn load_media(&self, url: &Url) -> Result<()>;
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn seek(&self, position: Duration) -> Result<()>;
    async fn position(&self) -> Option<Duration>;
    async fn duration(&self) -> Option<Duration>;
    fn register_periodic_time_observer(&self, interval: Duration, observer: TimeObserver);
    fn register_end_of_media_observer(&self, observer: EndOfMediaObserver);
}

/// Host window system able to rotate the interface on request
pub trait WindowGeometry: Send + Sync {
    fn request_orientation(&self, orientation: InterfaceOrientation);
}
