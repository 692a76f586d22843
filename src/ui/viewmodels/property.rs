use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Change notifications for one `Property`.
///
/// Not `Clone`: call `Property::subscribe` again for another listener.
pub struct PropertySubscriber {
    receiver: broadcast::Receiver<()>,
}

impl PropertySubscriber {
    /// Wait for the next change. `false` once the property is gone.
    pub async fn wait_for_change(&mut self) -> bool {
        match self.receiver.recv().await {
            Ok(()) => true,
            // Missed some notifications; any of them means "changed"
            Err(broadcast::error::RecvError::Lagged(_)) => true,
            Err(broadcast::error::RecvError::Closed) => false,
        }
    }

    /// Drain pending notifications, reporting whether there were any
    pub fn try_recv(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.receiver.try_recv() {
                Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => changed = true,
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return changed,
            }
        }
    }
}

/// Observable value published by a view model.
///
/// Writers live inside the view model; clones handed to the presentation
/// layer are only read and subscribed to.
pub struct Property<T: Clone + PartialEq + Send + Sync> {
    value: Arc<RwLock<T>>,
    sender: broadcast::Sender<()>,
    name: String,
}

impl<T: Clone + PartialEq + Send + Sync> Property<T> {
    pub fn new(initial_value: T, name: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            value: Arc::new(RwLock::new(initial_value)),
            sender,
            name: name.into(),
        }
    }

    pub async fn get(&self) -> T {
        self.value.read().await.clone()
    }

    /// Store the value and notify subscribers if it differs from the
    /// current one. Returns whether anything changed.
    pub(crate) async fn set(&self, new_value: T) -> bool {
        {
            let mut value = self.value.write().await;
            if *value == new_value {
                return false;
            }
            *value = new_value;
        }
        let _ = self.sender.send(());
        true
    }

    pub fn subscribe(&self) -> PropertySubscriber {
        PropertySubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Clone + PartialEq + Send + Sync + Debug> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Property({})", self.name)
    }
}

impl<T: Clone + PartialEq + Send + Sync> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            sender: self.sender.clone(),
            name: self.name.clone(),
        }
    }
}
