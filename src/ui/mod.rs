pub mod player;
pub mod viewmodels;
