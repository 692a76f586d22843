use reel_player::config::PlayerConfig;
use reel_player::models::{PlayerModel, PlayerSource};
use reel_player::player::{
    AssetSourceResolver, DirectoryAssetBundle, PlaybackTime, RecordingWindow, SimulatedEngine,
};
use reel_player::services::{MemoryPreferenceStore, PreferenceStore};
use reel_player::ui::viewmodels::{PlayerDependencies, PlayerViewModel, ViewModel};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const MEDIA_URL: &str = "https://example.com/media/clip.mp4";

pub fn model_for(source: PlayerSource) -> PlayerModel {
    PlayerModel {
        source,
        video_title: "Test clip".to_string(),
        video_id: "clip-1".to_string(),
        channel_name: "Test channel".to_string(),
        channel_id: "channel-1".to_string(),
        auto_play_next: false,
        thumbnail_url: "https://example.com/thumbs/clip.jpg".to_string(),
        more_videos_urls: Vec::new(),
    }
}

pub fn tick(position_secs: f64, duration_secs: f64) -> PlaybackTime {
    PlaybackTime {
        position: Duration::from_secs_f64(position_secs),
        duration: Some(Duration::from_secs_f64(duration_secs)),
    }
}

pub struct TestContext {
    pub engine: Arc<SimulatedEngine>,
    pub window: Arc<RecordingWindow>,
    pub player: PlayerViewModel,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Initialized player on a 100 second remote clip
    pub async fn new() -> Self {
        Self::build(
            PlayerSource::external(MEDIA_URL),
            PlayerConfig::default(),
            Arc::new(MemoryPreferenceStore::new()),
        )
        .await
    }

    pub async fn with_config(config: PlayerConfig) -> Self {
        Self::build(
            PlayerSource::external(MEDIA_URL),
            config,
            Arc::new(MemoryPreferenceStore::new()),
        )
        .await
    }

    pub async fn with_preferences(preferences: Arc<dyn PreferenceStore>) -> Self {
        Self::build(
            PlayerSource::external(MEDIA_URL),
            PlayerConfig::default(),
            preferences,
        )
        .await
    }

    pub async fn with_source(source: PlayerSource) -> Self {
        Self::build(
            source,
            PlayerConfig::default(),
            Arc::new(MemoryPreferenceStore::new()),
        )
        .await
    }

    async fn build(
        source: PlayerSource,
        config: PlayerConfig,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let resolver = AssetSourceResolver::new(
            Arc::new(DirectoryAssetBundle::new(temp_dir.path().join("assets"))),
            temp_dir.path().join("cache"),
        );
        let engine = Arc::new(SimulatedEngine::new(Some(Duration::from_secs(100))));
        let window = Arc::new(RecordingWindow::default());

        let mut player = PlayerViewModel::new(
            model_for(source),
            &config,
            PlayerDependencies {
                engine: engine.clone(),
                resolver: Arc::new(resolver),
                preferences,
                window: window.clone(),
            },
        );
        player.initialize().await;

        Self {
            engine,
            window,
            player,
            _temp_dir: temp_dir,
        }
    }

    /// Start playback and forget the engine calls made so far
    pub async fn start_playing(&mut self) {
        self.player
            .handle()
            .toggle_play_pause()
            .expect("player is running");
        self.settle().await;
        self.engine.clear_calls();
    }

    pub async fn settle(&mut self) -> usize {
        self.player.process_pending().await
    }

    pub fn last_seek_secs(&self) -> Option<f64> {
        self.engine.seeks().last().map(Duration::as_secs_f64)
    }
}
