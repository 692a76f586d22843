pub mod player_view_model;
pub mod property;
pub mod simple_player_view_model;

pub use player_view_model::{
    PlayerDependencies, PlayerHandle, PlayerProperties, PlayerSnapshot, PlayerViewModel,
};
pub use property::{Property, PropertySubscriber};
pub use simple_player_view_model::SimplePlayerViewModel;

#[async_trait::async_trait]
pub trait ViewModel: Send {
    async fn initialize(&mut self);

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber>;

    fn dispose(&mut self);
}
