//! Speaker settings as value types, shared by commands and notifications.

pub mod control;
pub mod eq;
pub mod led;
pub mod state;
pub mod status;

pub use control::{ControlByte, ControlFlags};
pub use eq::EqSettings;
pub use led::{LedState, Rgb};
pub use state::SpeakerState;
pub use status::FullStatus;
