use super::{Property, PropertySubscriber, ViewModel};
use crate::config::PlayerConfig;
use crate::models::PlayerModel;
use crate::player::{PlaybackEngine, SourceResolver, WindowGeometry};
use crate::player::{DeviceOrientation, PlaybackTime};
use crate::services::PreferenceStore;
use crate::ui::player::{
    OrientationFullscreenController, PlaybackProgress, PlayerInput, ProgressController,
    SeekDirection, SeekGestureController, SeekIntent, TickOutcome, TimeDisplay, TimerKind,
    TimerScheduler, TimerSlot, VisibilityTimeoutController,
};
use crate::utils::{VideoPlayerError, sanitize_seconds, seconds_to_duration};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};
use url::Url;

/// Collaborators a player needs from its host
#[derive(Clone)]
pub struct PlayerDependencies {
    pub engine: Arc<dyn PlaybackEngine>,
    pub resolver: Arc<dyn SourceResolver>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub window: Arc<dyn WindowGeometry>,
}

/// Cheap, cloneable way to send gestures and platform events to a player
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    sender: mpsc::UnboundedSender<PlayerInput>,
}

impl PlayerHandle {
    pub fn send(&self, input: PlayerInput) -> Result<()> {
        self.sender
            .send(input)
            .map_err(|_| anyhow::anyhow!("Player view model disconnected"))
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(PlayerInput::TogglePlayPause)
    }

    pub fn drag_started(&self) -> Result<()> {
        self.send(PlayerInput::DragStarted)
    }

    /// `delta` is the drag translation as a share of the scrub bar width
    pub fn drag_seek(&self, delta: f64) -> Result<()> {
        self.send(PlayerInput::DragChanged(delta))
    }

    pub fn commit_seek(&self) -> Result<()> {
        self.send(PlayerInput::DragEnded)
    }

    pub fn double_tap_seek(&self, direction: SeekDirection) -> Result<()> {
        self.send(PlayerInput::DoubleTap(direction))
    }

    pub fn toggle_controls_visibility(&self) -> Result<()> {
        self.send(PlayerInput::ToggleControls)
    }

    pub fn toggle_forced_fullscreen(&self) -> Result<()> {
        self.send(PlayerInput::ToggleForcedFullscreen)
    }

    pub fn set_auto_play(&self, enabled: bool) -> Result<()> {
        self.send(PlayerInput::SetAutoPlay(enabled))
    }

    pub fn device_rotated(&self, orientation: DeviceOrientation) -> Result<()> {
        self.send(PlayerInput::DeviceRotated(orientation))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(PlayerInput::Shutdown)
    }
}

/// Read-only projection of the player state at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub video_error: Option<VideoPlayerError>,
    pub progress: PlaybackProgress,
    pub time: TimeDisplay,
    pub is_playing: bool,
    pub is_finished_playing: bool,
    pub is_showing_controls: bool,
    pub seek_intent: SeekIntent,
    /// Whether the double-tap zones should be installed
    pub seek_zones_active: bool,
    pub is_landscape: bool,
    pub forced_fullscreen: bool,
    /// Radians the controls overlay is rotated by
    pub controls_rotation: f64,
    pub auto_play_next: bool,
}

/// Observable fields handed to the presentation layer
#[derive(Debug, Clone)]
pub struct PlayerProperties {
    pub video_error: Property<Option<VideoPlayerError>>,
    pub progress: Property<PlaybackProgress>,
    pub time: Property<TimeDisplay>,
    pub is_playing: Property<bool>,
    pub is_finished_playing: Property<bool>,
    pub is_showing_controls: Property<bool>,
    pub seek_intent: Property<SeekIntent>,
    pub is_landscape: Property<bool>,
    pub auto_play_next: Property<bool>,
    pub model: Property<PlayerModel>,
}

impl PlayerProperties {
    fn new(
        video_error: Option<VideoPlayerError>,
        is_landscape: bool,
        model: &PlayerModel,
    ) -> Self {
        Self {
            video_error: Property::new(video_error, "video_error"),
            progress: Property::new(PlaybackProgress::default(), "progress"),
            time: Property::new(TimeDisplay::default(), "time"),
            is_playing: Property::new(false, "is_playing"),
            is_finished_playing: Property::new(false, "is_finished_playing"),
            is_showing_controls: Property::new(false, "is_showing_controls"),
            seek_intent: Property::new(SeekIntent::Idle, "seek_intent"),
            is_landscape: Property::new(is_landscape, "is_landscape"),
            auto_play_next: Property::new(model.auto_play_next, "auto_play_next"),
            model: Property::new(model.clone(), "model"),
        }
    }
}

/// Composes the player controllers behind a single command entry point.
///
/// All mutation goes through `handle`, one `PlayerInput` at a time. Timer
/// firings and engine callbacks arrive through the same inbox, so they are
/// serialized with the user's gestures.
pub struct PlayerViewModel {
    engine: Arc<dyn PlaybackEngine>,
    config: PlayerConfig,
    model: PlayerModel,
    source_url: Option<Url>,
    video_error: Option<VideoPlayerError>,
    is_playing: bool,
    is_finished_playing: bool,
    progress: ProgressController,
    seek_gesture: SeekGestureController,
    visibility: VisibilityTimeoutController,
    orientation: OrientationFullscreenController,
    properties: PlayerProperties,
    handle: PlayerHandle,
    inbox: mpsc::UnboundedReceiver<PlayerInput>,
}

impl PlayerViewModel {
    pub fn new(model: PlayerModel, config: &PlayerConfig, deps: PlayerDependencies) -> Self {
        let (sender, inbox) = mpsc::unbounded_channel();
        let scheduler = TimerScheduler::new(sender.clone());

        let (model, source_url, video_error) = match deps.resolver.resolve(&model.source) {
            Ok(url) => {
                debug!("Resolved {} to {}", model.source.describe(), url);
                (model, Some(url), None)
            }
            Err(e) => {
                error!("Cannot play {}: {}", model.source.describe(), e);
                (PlayerModel::empty(), None, Some(e))
            }
        };

        let orientation = OrientationFullscreenController::new(deps.preferences, deps.window);
        let properties = PlayerProperties::new(
            video_error.clone(),
            orientation.is_landscape(),
            &model,
        );

        Self {
            engine: deps.engine,
            model,
            source_url,
            video_error,
            is_playing: false,
            is_finished_playing: false,
            progress: ProgressController::new(
                config.drag_grace(),
                TimerSlot::new(TimerKind::FinishDrag, scheduler.clone()),
            ),
            seek_gesture: SeekGestureController::new(
                config.seek_step_secs,
                config.seek_indicator_timeout(),
                TimerSlot::new(TimerKind::DismissSeekIntent, scheduler.clone()),
            ),
            visibility: VisibilityTimeoutController::new(
                config.controls_timeout(),
                TimerSlot::new(TimerKind::HideControls, scheduler),
            ),
            orientation,
            properties,
            handle: PlayerHandle { sender },
            inbox,
            config: config.clone(),
        }
    }

    pub fn handle(&self) -> PlayerHandle {
        self.handle.clone()
    }

    pub fn properties(&self) -> PlayerProperties {
        self.properties.clone()
    }

    pub fn model(&self) -> &PlayerModel {
        &self.model
    }

    pub fn source_url(&self) -> Option<&Url> {
        self.source_url.as_ref()
    }

    pub fn video_error(&self) -> Option<&VideoPlayerError> {
        self.video_error.as_ref()
    }

    /// Label for the double-tap indicator
    pub fn seek_indicator_label(&self) -> String {
        self.seek_gesture.indicator_label()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let orientation = self.orientation.state();
        PlayerSnapshot {
            video_error: self.video_error.clone(),
            progress: self.progress.progress(),
            time: self.progress.time(),
            is_playing: self.is_playing,
            is_finished_playing: self.is_finished_playing,
            is_showing_controls: self.visibility.is_visible(),
            seek_intent: self.seek_gesture.intent(),
            seek_zones_active: self.is_playing && self.video_error.is_none(),
            is_landscape: orientation.is_landscape,
            forced_fullscreen: orientation.forced_fullscreen,
            controls_rotation: orientation.device_orientation.rotation_angle(),
            auto_play_next: self.model.auto_play_next,
        }
    }

    /// Process one input and publish the resulting state
    pub async fn handle_input(&mut self, input: PlayerInput) {
        if self.video_error.is_some() && input != PlayerInput::Shutdown {
            trace!("Player is in error state, ignoring {:?}", input);
            return;
        }

        match input {
            PlayerInput::TogglePlayPause => self.toggle_play_pause().await,
            PlayerInput::DragStarted => {
                self.progress.drag_start();
                self.visibility.hold();
            }
            PlayerInput::DragChanged(delta) => {
                self.progress.drag_changed(delta);
                self.visibility.hold();
            }
            PlayerInput::DragEnded => self.commit_seek().await,
            PlayerInput::DoubleTap(direction) => self.double_tap_seek(direction).await,
            PlayerInput::ToggleControls => self.visibility.toggle(),
            PlayerInput::ToggleForcedFullscreen => {
                self.orientation.force_screen_mode();
            }
            PlayerInput::SetAutoPlay(enabled) => {
                debug!("Auto-play next set to {}", enabled);
                self.model.auto_play_next = enabled;
            }
            PlayerInput::DeviceRotated(orientation) => {
                self.orientation.on_device_rotated(orientation);
            }
            PlayerInput::EngineTick(time) => {
                self.apply_time(time.current_seconds(), time.total_seconds())
                    .await;
            }
            PlayerInput::EndOfMedia => self.on_end_of_media().await,
            PlayerInput::TimerFired { kind, generation } => match kind {
                TimerKind::HideControls => self.visibility.on_timeout(generation),
                TimerKind::DismissSeekIntent => self.seek_gesture.on_dismiss_elapsed(generation),
                TimerKind::FinishDrag => self.progress.on_grace_elapsed(generation),
            },
            PlayerInput::Shutdown => self.cancel_timers(),
        }

        self.publish().await;
    }

    /// Handle everything already waiting in the inbox without blocking.
    /// Returns how many inputs were processed.
    pub async fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(input) = self.inbox.try_recv() {
            self.handle_input(input).await;
            processed += 1;
        }
        processed
    }

    /// Run the event loop until `PlayerInput::Shutdown`
    pub async fn run(mut self) {
        debug!("Player event loop started");
        while let Some(input) = self.inbox.recv().await {
            let stop = input == PlayerInput::Shutdown;
            self.handle_input(input).await;
            if stop {
                break;
            }
        }
        debug!("Player event loop stopped");
    }

    async fn toggle_play_pause(&mut self) {
        if self.is_finished_playing {
            debug!("Replaying from the start");
            self.is_finished_playing = false;
            self.engine_seek(0.0).await;
            let total = self.progress.time().total_seconds;
            self.progress.jump_to(0.0, total);
        }

        if self.is_playing {
            if let Err(e) = self.engine.pause().await {
                warn!("Engine failed to pause: {}", e);
            }
        } else if let Err(e) = self.engine.play().await {
            warn!("Engine failed to play: {}", e);
        }
        self.is_playing = !self.is_playing;
        self.visibility.show();
    }

    async fn commit_seek(&mut self) {
        let total = self.duration_seconds().await;
        if let Some(target) = self.progress.drag_end(total) {
            self.engine_seek(target).await;
        }
        self.visibility.touch();
    }

    async fn double_tap_seek(&mut self, direction: SeekDirection) {
        let current = self.position_seconds().await;
        let total = self.duration_seconds().await;

        let target = self.seek_gesture.double_tap(direction, current, total);
        self.engine_seek(target).await;
        self.apply_time(target, total).await;
        self.visibility.touch();
    }

    /// Shared by engine ticks and double taps
    async fn apply_time(&mut self, current_seconds: f64, total_seconds: f64) {
        if self.progress.on_engine_tick(current_seconds, total_seconds) == TickOutcome::Finished
            && !self.is_finished_playing
        {
            self.mark_finished().await;
        }
    }

    async fn on_end_of_media(&mut self) {
        if !self.config.loop_on_end {
            if !self.is_finished_playing {
                self.mark_finished().await;
            }
            return;
        }

        info!("Reached end of media, looping");
        self.engine_seek(0.0).await;
        let total = self.progress.time().total_seconds;
        self.progress.jump_to(0.0, total);
        self.is_finished_playing = false;
        self.is_playing = true;
        if let Err(e) = self.engine.play().await {
            warn!("Engine failed to resume after looping: {}", e);
        }
    }

    async fn mark_finished(&mut self) {
        debug!("Playback finished");
        self.is_finished_playing = true;
        self.is_playing = false;
        if let Err(e) = self.engine.pause().await {
            warn!("Engine failed to pause at end of media: {}", e);
        }
    }

    async fn engine_seek(&self, seconds: f64) {
        if let Err(e) = self.engine.seek(seconds_to_duration(seconds)).await {
            warn!("Engine failed to seek to {:.1}s: {}", seconds, e);
        }
    }

    async fn position_seconds(&self) -> f64 {
        match self.engine.position().await {
            Some(position) => position.as_secs_f64(),
            None => self.progress.time().current_seconds,
        }
    }

    async fn duration_seconds(&self) -> f64 {
        match self.engine.duration().await {
            Some(duration) => sanitize_seconds(duration.as_secs_f64()),
            None => self.progress.time().total_seconds,
        }
    }

    fn cancel_timers(&mut self) {
        self.progress.cancel_timers();
        self.seek_gesture.cancel_timers();
        self.visibility.cancel_timers();
    }

    async fn publish(&self) {
        let snapshot = self.snapshot();
        let properties = &self.properties;
        properties.video_error.set(snapshot.video_error).await;
        properties.progress.set(snapshot.progress).await;
        properties.time.set(snapshot.time).await;
        properties.is_playing.set(snapshot.is_playing).await;
        properties
            .is_finished_playing
            .set(snapshot.is_finished_playing)
            .await;
        properties
            .is_showing_controls
            .set(snapshot.is_showing_controls)
            .await;
        properties.seek_intent.set(snapshot.seek_intent).await;
        properties.is_landscape.set(snapshot.is_landscape).await;
        properties.auto_play_next.set(snapshot.auto_play_next).await;
        properties.model.set(self.model.clone()).await;
    }
}

#[async_trait::async_trait]
impl ViewModel for PlayerViewModel {
    async fn initialize(&mut self) {
        let Some(url) = self.source_url.clone() else {
            warn!("Not initializing player without a playable source");
            return;
        };

        if let Err(e) = self.engine.load_media(&url).await {
            warn!("Engine failed to load {}: {}", url, e);
        }

        let ticks = self.handle.clone();
        self.engine.register_periodic_time_observer(
            self.config.time_observer_interval(),
            Box::new(move |time: PlaybackTime| {
                let _ = ticks.send(PlayerInput::EngineTick(time));
            }),
        );
        let ends = self.handle.clone();
        self.engine.register_end_of_media_observer(Box::new(move || {
            let _ = ends.send(PlayerInput::EndOfMedia);
        }));

        info!("Player ready for {}", self.model.video_title);
        self.publish().await;
    }

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        let properties = &self.properties;
        match property_name {
            "video_error" => Some(properties.video_error.subscribe()),
            "progress" => Some(properties.progress.subscribe()),
            "time" => Some(properties.time.subscribe()),
            "is_playing" => Some(properties.is_playing.subscribe()),
            "is_finished_playing" => Some(properties.is_finished_playing.subscribe()),
            "is_showing_controls" => Some(properties.is_showing_controls.subscribe()),
            "seek_intent" => Some(properties.seek_intent.subscribe()),
            "is_landscape" => Some(properties.is_landscape.subscribe()),
            "auto_play_next" => Some(properties.auto_play_next.subscribe()),
            "model" => Some(properties.model.subscribe()),
            _ => None,
        }
    }

    fn dispose(&mut self) {
        self.cancel_timers();
    }
}
