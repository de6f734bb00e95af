//! Static lookup tables shared by the encoder, decoder and CLI.

pub mod colors;
pub mod eq_presets;
pub mod led_effects;
pub mod sounds;

pub use colors::{color_by_name, COLOR_PRESETS};
pub use eq_presets::{firmware_preset, preset_by_id, preset_by_name, EqPreset};
pub use led_effects::{GradientType, LedEffect};
pub use sounds::{AudioCodec, SoundType};
