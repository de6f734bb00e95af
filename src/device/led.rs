use serde::Serialize;

use crate::catalog::{GradientType, LedEffect};

/// Brightness and speed are sent as 0-100; the speaker expands to 0-255 itself.
pub const PERCENT_MAX: u8 = 100;

/// Clamp a caller-supplied value into the 0-100 wire range.
pub fn clamp_percent(value: i32) -> u8 {
    value.clamp(0, i32::from(PERCENT_MAX)) as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// LED configuration, 10 bytes on the wire:
/// `[effect, brightness, speed, r1, g1, b1, r2, g2, b2, gradient]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedState {
    pub effect_id: u8,
    pub brightness: u8,
    pub speed: u8,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub gradient_id: u8,
}

impl LedState {
    pub const WIRE_LEN: usize = 10;

    /// Build from caller integers; brightness and speed are clamped to 0-100.
    pub fn new(
        effect_id: u8,
        brightness: i32,
        speed: i32,
        primary: Rgb,
        secondary: Rgb,
        gradient_id: u8,
    ) -> Self {
        Self {
            effect_id,
            brightness: clamp_percent(brightness),
            speed: clamp_percent(speed),
            primary,
            secondary,
            gradient_id,
        }
    }

    pub fn effect(&self) -> LedEffect {
        LedEffect::from_id(self.effect_id)
    }

    pub fn gradient(&self) -> GradientType {
        GradientType::from_id(self.gradient_id)
    }

    /// Wire bytes with brightness and speed clamped to 0-100.
    pub fn to_bytes(&self) -> [u8; Self::WIRE_LEN] {
        [
            self.effect_id,
            self.brightness.min(PERCENT_MAX),
            self.speed.min(PERCENT_MAX),
            self.primary.r,
            self.primary.g,
            self.primary.b,
            self.secondary.r,
            self.secondary.g,
            self.secondary.b,
            self.gradient_id,
        ]
    }

    /// Read the 10-byte layout, clamping brightness and speed again in case
    /// the firmware sent something out of range.
    pub fn from_bytes(b: &[u8; Self::WIRE_LEN]) -> Self {
        Self {
            effect_id: b[0],
            brightness: b[1].min(PERCENT_MAX),
            speed: b[2].min(PERCENT_MAX),
            primary: Rgb::new(b[3], b[4], b[5]),
            secondary: Rgb::new(b[6], b[7], b[8]),
            gradient_id: b[9],
        }
    }
}

impl Default for LedState {
    fn default() -> Self {
        Self {
            effect_id: LedEffect::SpectrumBars.id(),
            brightness: 50,
            speed: 50,
            primary: Rgb::default(),
            secondary: Rgb::default(),
            gradient_id: GradientType::None.id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(150), 100);
        assert_eq!(clamp_percent(-5), 0);
        assert_eq!(clamp_percent(42), 42);
        assert_eq!(clamp_percent(i32::MAX), 100);
    }

    #[test]
    fn test_layout() {
        let led = LedState {
            effect_id: 21,
            brightness: 80,
            speed: 30,
            primary: Rgb::new(1, 2, 3),
            secondary: Rgb::new(4, 5, 6),
            gradient_id: 3,
        };
        let bytes = led.to_bytes();
        assert_eq!(bytes, [21, 80, 30, 1, 2, 3, 4, 5, 6, 3]);
        assert_eq!(LedState::from_bytes(&bytes), led);
        assert_eq!(led.effect(), LedEffect::Ambient);
        assert_eq!(led.gradient(), GradientType::Radial);
    }

    #[test]
    fn test_new_clamps_caller_values() {
        let led = LedState::new(3, -20, 250, Rgb::new(9, 8, 7), Rgb::default(), 1);
        assert_eq!(led.brightness, 0);
        assert_eq!(led.speed, 100);
        assert_eq!(led.to_bytes(), [3, 0, 100, 9, 8, 7, 0, 0, 0, 1]);
        assert_eq!(LedState::new(0, 42, 7, Rgb::default(), Rgb::default(), 0).brightness, 42);
    }

    #[test]
    fn test_from_bytes_clamps() {
        let led = LedState::from_bytes(&[0, 0xFF, 101, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(led.brightness, 100);
        assert_eq!(led.speed, 100);
    }
}
