//! Common types shared by the engine seam and the controllers
use std::f64::consts::{FRAC_PI_2, PI};
use std::time::Duration;

/// Raw physical orientation reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
    #[default]
    Unknown,
}

/// Orientation the host window can be asked to adopt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceOrientation {
    Portrait,
    LandscapeRight,
}

impl DeviceOrientation {
    /// Portrait or landscape; flat and unknown readings say nothing about layout
    pub fn is_valid_interface_orientation(&self) -> bool {
        matches!(
            self,
            Self::Portrait | Self::PortraitUpsideDown | Self::LandscapeLeft | Self::LandscapeRight
        )
    }

    pub fn is_landscape(&self) -> bool {
        matches!(self, Self::LandscapeLeft | Self::LandscapeRight)
    }

    pub fn is_portrait(&self) -> bool {
        matches!(self, Self::Portrait | Self::PortraitUpsideDown)
    }

    /// Angle in radians the controls overlay is rotated by
    pub fn rotation_angle(&self) -> f64 {
        match self {
            Self::Portrait => 0.0,
            Self::PortraitUpsideDown => PI,
            Self::LandscapeLeft => FRAC_PI_2,
            Self::LandscapeRight => -FRAC_PI_2,
            _ => 0.0,
        }
    }
}

impl From<InterfaceOrientation> for DeviceOrientation {
    fn from(orientation: InterfaceOrientation) -> Self {
        match orientation {
            InterfaceOrientation::Portrait => DeviceOrientation::Portrait,
            InterfaceOrientation::LandscapeRight => DeviceOrientation::LandscapeRight,
        }
    }
}

/// Payload of the periodic time observer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTime {
    pub position: Duration,
    /// `None` while the engine does not know the length yet
    pub duration: Option<Duration>,
}

impl PlaybackTime {
    pub fn current_seconds(&self) -> f64 {
        self.position.as_secs_f64()
    }

    pub fn total_seconds(&self) -> f64 {
        self.duration.map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }
}
