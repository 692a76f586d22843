pub mod simulated;
pub mod source;
pub mod traits;
pub mod types;

pub use simulated::{EngineCall, RecordingWindow, SimulatedEngine};
pub use source::{AssetBundle, AssetSourceResolver, DirectoryAssetBundle, SourceResolver};
pub use traits::{EndOfMediaObserver, PlaybackEngine, TimeObserver, WindowGeometry};
pub use types::{DeviceOrientation, InterfaceOrientation, PlaybackTime};
