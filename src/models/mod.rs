pub mod video;

pub use video::{PlayerModel, PlayerSource};
