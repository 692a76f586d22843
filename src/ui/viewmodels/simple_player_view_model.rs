use super::{Property, PropertySubscriber, ViewModel};
use crate::models::PlayerSource;
use crate::player::{PlaybackEngine, SourceResolver};
use crate::utils::VideoPlayerError;
use std::sync::Arc;
use tracing::{debug, error, warn};
use url::Url;

/// Bare playback surface without controls, gestures or orientation handling.
/// Playback starts as soon as the view model is initialized.
pub struct SimplePlayerViewModel {
    engine: Arc<dyn PlaybackEngine>,
    source_url: Option<Url>,
    video_error: Property<Option<VideoPlayerError>>,
    is_playing: Property<bool>,
}

impl SimplePlayerViewModel {
    pub fn new(
        source: &PlayerSource,
        resolver: &dyn SourceResolver,
        engine: Arc<dyn PlaybackEngine>,
    ) -> Self {
        let (source_url, video_error) = match resolver.resolve(source) {
            Ok(url) => (Some(url), None),
            Err(e) => {
                error!("Cannot play {}: {}", source.describe(), e);
                (None, Some(e))
            }
        };

        Self {
            engine,
            source_url,
            video_error: Property::new(video_error, "video_error"),
            is_playing: Property::new(false, "is_playing"),
        }
    }

    pub fn source_url(&self) -> Option<&Url> {
        self.source_url.as_ref()
    }

    pub fn video_error(&self) -> &Property<Option<VideoPlayerError>> {
        &self.video_error
    }

    pub fn is_playing(&self) -> &Property<bool> {
        &self.is_playing
    }
}

#[async_trait::async_trait]
impl ViewModel for SimplePlayerViewModel {
    async fn initialize(&mut self) {
        let Some(url) = self.source_url.clone() else {
            return;
        };

        debug!("Loading {} without controls", url);
        if let Err(e) = self.engine.load_media(&url).await {
            warn!("Engine failed to load {}: {}", url, e);
            return;
        }
        match self.engine.play().await {
            Ok(()) => {
                self.is_playing.set(true).await;
            }
            Err(e) => warn!("Engine failed to play: {}", e),
        }
    }

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "video_error" => Some(self.video_error.subscribe()),
            "is_playing" => Some(self.is_playing.subscribe()),
            _ => None,
        }
    }

    fn dispose(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{AssetSourceResolver, DirectoryAssetBundle, EngineCall, SimulatedEngine};
    use std::time::Duration;

    fn resolver(dir: &tempfile::TempDir) -> AssetSourceResolver {
        AssetSourceResolver::new(
            Arc::new(DirectoryAssetBundle::new(dir.path().join("assets"))),
            dir.path().join("cache"),
        )
    }

    #[tokio::test]
    async fn test_external_source_starts_playing() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(SimulatedEngine::new(Some(Duration::from_secs(30))));
        let source = PlayerSource::external("https://example.com/clip.mp4");

        let mut vm = SimplePlayerViewModel::new(&source, &resolver(&dir), engine.clone());
        vm.initialize().await;

        let url = Url::parse("https://example.com/clip.mp4").unwrap();
        assert_eq!(engine.calls(), vec![EngineCall::Load(url), EngineCall::Play]);
        assert!(vm.is_playing().get().await);
        assert_eq!(vm.video_error().get().await, None);
    }

    #[tokio::test]
    async fn test_missing_asset_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(SimulatedEngine::new(None));
        let source = PlayerSource::local("missing", "mp4");

        let mut vm = SimplePlayerViewModel::new(&source, &resolver(&dir), engine.clone());
        vm.initialize().await;

        assert!(engine.calls().is_empty());
        assert!(matches!(
            vm.video_error().get().await,
            Some(VideoPlayerError::SourceNotFound(_))
        ));
        assert!(vm.subscribe_to_property("progress").is_none());
    }
}
