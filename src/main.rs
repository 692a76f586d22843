use anyhow::Result;
use reel_player::config::Config;
use reel_player::models::{PlayerModel, PlayerSource};
use reel_player::player::{
    AssetSourceResolver, DeviceOrientation, DirectoryAssetBundle, RecordingWindow,
    SimulatedEngine,
};
use reel_player::services::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use reel_player::ui::player::SeekDirection;
use reel_player::ui::viewmodels::{PlayerDependencies, PlayerViewModel, ViewModel};
use reel_player::utils::format_time;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEMO_URL: &str = "https://example.com/videos/big-buck-bunny.mp4";
const DEMO_DURATION: Duration = Duration::from_secs(90);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reel_player=debug")),
        )
        .init();

    info!("Starting Reel player demo");

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {:#}", e);
        Config::default()
    });

    let preferences: Arc<dyn PreferenceStore> = match config
        .storage
        .preferences_file()
        .and_then(FilePreferenceStore::open)
    {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Preferences will not be persisted: {:#}", e);
            Arc::new(MemoryPreferenceStore::new())
        }
    };

    let resolver = AssetSourceResolver::new(
        Arc::new(DirectoryAssetBundle::new(config.storage.assets_directory())),
        config.storage.cache_directory()?,
    );

    let source = match std::env::args().nth(1) {
        Some(arg) if arg.contains("://") => PlayerSource::external(arg),
        Some(arg) => match arg.rsplit_once('.') {
            Some((name, extension)) => PlayerSource::local(name, extension),
            None => PlayerSource::local(arg, "mp4"),
        },
        None => PlayerSource::external(DEMO_URL),
    };

    let model = PlayerModel {
        source,
        video_title: "Big Buck Bunny".to_string(),
        video_id: "demo".to_string(),
        channel_name: "Blender".to_string(),
        channel_id: "blender".to_string(),
        auto_play_next: true,
        thumbnail_url: "https://example.com/thumbs/demo.jpg".to_string(),
        more_videos_urls: vec!["https://example.com/thumbs/next.jpg".to_string()],
    };

    let engine = Arc::new(SimulatedEngine::new(Some(DEMO_DURATION)));
    let window = Arc::new(RecordingWindow::default());
    let mut player = PlayerViewModel::new(
        model,
        &config.player,
        PlayerDependencies {
            engine: engine.clone(),
            resolver: Arc::new(resolver),
            preferences,
            window: window.clone(),
        },
    );

    if let Some(error) = player.video_error() {
        warn!("{} ({})", error.user_message(), error);
        return Ok(());
    }

    player.initialize().await;
    let handle = player.handle();

    handle.toggle_play_pause()?;
    player.process_pending().await;
    for _ in 0..3 {
        engine.advance(Duration::from_secs(10));
        player.process_pending().await;
        log_snapshot(&player);
    }

    handle.double_tap_seek(SeekDirection::Forward)?;
    player.process_pending().await;
    info!("Seek indicator: {}", player.seek_indicator_label());
    log_snapshot(&player);

    handle.drag_started()?;
    handle.drag_seek(-0.25)?;
    handle.commit_seek()?;
    player.process_pending().await;
    tokio::time::sleep(config.player.drag_grace() + Duration::from_millis(50)).await;
    player.process_pending().await;
    log_snapshot(&player);

    handle.device_rotated(DeviceOrientation::LandscapeLeft)?;
    handle.device_rotated(DeviceOrientation::FaceUp)?;
    handle.toggle_forced_fullscreen()?;
    player.process_pending().await;
    info!("Window orientation requests: {:?}", window.requests());
    log_snapshot(&player);

    engine.advance(DEMO_DURATION);
    player.process_pending().await;
    log_snapshot(&player);

    handle.shutdown()?;
    player.process_pending().await;
    player.dispose();

    info!("Demo finished");
    Ok(())
}

fn log_snapshot(player: &PlayerViewModel) {
    let snapshot = player.snapshot();
    info!(
        "{} / {} progress={:.2} playing={} finished={} controls={} intent={:?} landscape={}",
        format_time(snapshot.time.current_seconds),
        format_time(snapshot.time.total_seconds),
        snapshot.progress.fraction,
        snapshot.is_playing,
        snapshot.is_finished_playing,
        snapshot.is_showing_controls,
        snapshot.seek_intent,
        snapshot.is_landscape,
    );
}
