// Toolkit-independent core of the player component.
// A presentation layer drives `PlayerViewModel` through `PlayerHandle` and
// renders its snapshots; engines and platforms plug in through the traits
// in `player`.

pub mod config;
pub mod constants;
pub mod models;
pub mod player;
pub mod services;
pub mod ui;
pub mod utils;

pub use config::{Config, PlayerConfig, StorageConfig};
pub use models::{PlayerModel, PlayerSource};
pub use ui::player::{PlayerInput, SeekDirection, SeekIntent};
pub use ui::viewmodels::{
    PlayerDependencies, PlayerHandle, PlayerSnapshot, PlayerViewModel, SimplePlayerViewModel,
    ViewModel,
};
pub use utils::VideoPlayerError;
