use serde::Serialize;

use super::{ControlByte, EqSettings, LedState};

/// Longest string a 1-byte length prefix can describe.
pub const MAX_STRING_LEN: usize = 255;

/// Snapshot sent in reply to `REQUEST_STATUS`.
///
/// Wire layout:
/// ```text
/// [bass, mid, treble] [control] [led: 10 bytes] [sound_status]
/// [name_len] [name...] [fw_len] [fw...]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FullStatus {
    pub eq: EqSettings,
    pub control: ControlByte,
    pub led: LedState,
    pub sound_status: u8,
    pub device_name: String,
    pub firmware_version: String,
}

impl FullStatus {
    /// Fixed part plus the two length bytes.
    pub const MIN_LEN: usize = EqSettings::WIRE_LEN + 1 + LedState::WIRE_LEN + 1 + 1;

    /// Encode the payload the way the speaker firmware lays it out.
    /// Strings longer than 255 bytes are cut at the last char boundary.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            Self::MIN_LEN + 1 + self.device_name.len() + self.firmware_version.len(),
        );
        out.extend_from_slice(&self.eq.to_bytes());
        out.push(self.control.bits());
        out.extend_from_slice(&self.led.to_bytes());
        out.push(self.sound_status);
        push_prefixed(&mut out, &self.device_name);
        push_prefixed(&mut out, &self.firmware_version);
        out
    }
}

fn push_prefixed(out: &mut Vec<u8>, s: &str) {
    let mut end = s.len().min(MAX_STRING_LEN);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    out.push(end as u8);
    out.extend_from_slice(&s.as_bytes()[..end]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_len() {
        assert_eq!(FullStatus::MIN_LEN, 16);
    }

    #[test]
    fn test_payload_layout() {
        let status = FullStatus {
            eq: EqSettings::new(1, -1, 0),
            control: ControlByte(0x05),
            led: LedState::default(),
            sound_status: 0x02,
            device_name: "Box".into(),
            firmware_version: "1.2".into(),
        };
        let p = status.to_payload();
        assert_eq!(&p[..4], &[0x01, 0xFF, 0x00, 0x05]);
        assert_eq!(p[14], 0x02);
        assert_eq!(&p[15..19], &[3, b'B', b'o', b'x']);
        assert_eq!(&p[19..], &[3, b'1', b'.', b'2']);
    }

    #[test]
    fn test_empty_strings_give_minimum_payload() {
        let p = FullStatus::default().to_payload();
        assert_eq!(p.len(), FullStatus::MIN_LEN + 1);
    }

    #[test]
    fn test_long_name_is_cut() {
        let status = FullStatus {
            device_name: "x".repeat(300),
            ..Default::default()
        };
        let p = status.to_payload();
        assert_eq!(p[15], 255);
        assert_eq!(p.len(), 16 + 255 + 1);
    }

    #[test]
    fn test_long_name_keeps_whole_chars() {
        // 'é' is two bytes and would straddle byte 255
        let status = FullStatus {
            device_name: format!("{}é", "a".repeat(254)),
            firmware_version: "2.0".into(),
            ..Default::default()
        };
        let p = status.to_payload();
        assert_eq!(p[15], 254);
        let decoded = crate::protocol::decoder::parse_full_status(&p).unwrap();
        assert_eq!(decoded.device_name, "a".repeat(254));
        assert_eq!(decoded.firmware_version, "2.0");
    }
}
