use serde::Serialize;

use crate::catalog::firmware_preset;

/// Bass, mid and treble levels in dB.
///
/// The wire carries any signed byte; the app keeps levels within
/// [`EqSettings::LIMIT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct EqSettings {
    pub bass: i8,
    pub mid: i8,
    pub treble: i8,
}

impl EqSettings {
    pub const WIRE_LEN: usize = 3;
    pub const LIMIT: i8 = 12;

    pub fn new(bass: i8, mid: i8, treble: i8) -> Self {
        Self { bass, mid, treble }
    }

    /// Narrow caller integers to signed bytes by truncation, as the wire does.
    pub fn from_ints(bass: i32, mid: i32, treble: i32) -> Self {
        Self::new(bass as i8, mid as i8, treble as i8)
    }

    /// Levels of a firmware preset, if the index exists.
    pub fn from_preset(id: u8) -> Option<Self> {
        firmware_preset(id).map(|(_, [b, m, t])| Self::new(b, m, t))
    }

    pub fn to_bytes(&self) -> [u8; Self::WIRE_LEN] {
        [self.bass as u8, self.mid as u8, self.treble as u8]
    }

    pub fn from_bytes(b: &[u8; Self::WIRE_LEN]) -> Self {
        Self::new(b[0] as i8, b[1] as i8, b[2] as i8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncating_narrowing() {
        assert_eq!(EqSettings::from_ints(6, 2, 0), EqSettings::new(6, 2, 0));
        // 0x1FF truncates to 0xFF = -1
        assert_eq!(EqSettings::from_ints(0x1FF, -3, 128).bass, -1);
        assert_eq!(EqSettings::from_ints(0x1FF, -3, 128).treble, -128);
    }

    #[test]
    fn test_bytes() {
        let eq = EqSettings::new(-2, 4, 2);
        assert_eq!(eq.to_bytes(), [0xFE, 0x04, 0x02]);
        assert_eq!(EqSettings::from_bytes(&eq.to_bytes()), eq);
    }

    #[test]
    fn test_from_preset() {
        assert_eq!(EqSettings::from_preset(9), Some(EqSettings::new(6, 0, 2)));
        assert_eq!(EqSettings::from_preset(99), None);
    }
}
