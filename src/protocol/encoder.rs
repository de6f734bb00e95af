//! Phone -> speaker command frames.
//!
//! Every builder is total: out-of-range numbers are clamped or truncated and
//! long names are cut, so encoding never fails.

use super::opcodes::*;
use crate::catalog::SoundType;
use crate::device::led::clamp_percent;
use crate::device::{ControlByte, EqSettings, LedState};

/// Longest device name the speaker stores, in UTF-8 bytes.
pub const MAX_NAME_LEN: usize = 32;

/// A command intent. [`Command::encode`] turns it into exactly one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetEq(EqSettings),
    SetEqPreset(u8),
    SetControl(ControlByte),
    SetName(String),
    SetLed(LedState),
    SetLedEffect(u8),
    SetLedBrightness(i32),
    SoundMute(bool),
    SoundDelete(SoundType),
    SoundUploadStart { sound: SoundType, size: u32 },
    SoundUploadData { seq: u8, data: Vec<u8> },
    SoundUploadEnd,
    OtaBegin { size: u32 },
    OtaData { seq: u8, data: Vec<u8> },
    OtaEnd,
    OtaAbort,
    RequestStatus,
    Ping,
}

impl Command {
    pub fn opcode(&self) -> u8 {
        match self {
            Self::SetEq(_) => CMD_SET_EQ,
            Self::SetEqPreset(_) => CMD_SET_EQ_PRESET,
            Self::SetControl(_) => CMD_SET_CONTROL,
            Self::SetName(_) => CMD_SET_NAME,
            Self::SetLed(_) => CMD_SET_LED,
            Self::SetLedEffect(_) => CMD_SET_LED_EFFECT,
            Self::SetLedBrightness(_) => CMD_SET_LED_BRIGHT,
            Self::SoundMute(_) => CMD_SOUND_MUTE,
            Self::SoundDelete(_) => CMD_SOUND_DELETE,
            Self::SoundUploadStart { .. } => CMD_SOUND_UP_START,
            Self::SoundUploadData { .. } => CMD_SOUND_UP_DATA,
            Self::SoundUploadEnd => CMD_SOUND_UP_END,
            Self::OtaBegin { .. } => CMD_OTA_BEGIN,
            Self::OtaData { .. } => CMD_OTA_DATA,
            Self::OtaEnd => CMD_OTA_END,
            Self::OtaAbort => CMD_OTA_ABORT,
            Self::RequestStatus => CMD_REQUEST_STATUS,
            Self::Ping => CMD_PING,
        }
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::SetEq(eq) => build_set_eq(eq.bass.into(), eq.mid.into(), eq.treble.into()),
            Self::SetEqPreset(id) => build_set_eq_preset(*id),
            Self::SetControl(c) => build_set_control(*c),
            Self::SetName(name) => build_set_name(name),
            Self::SetLed(led) => build_set_led(led),
            Self::SetLedEffect(id) => build_set_led_effect(*id),
            Self::SetLedBrightness(b) => build_set_led_brightness(*b),
            Self::SoundMute(muted) => build_sound_mute(*muted),
            Self::SoundDelete(sound) => build_sound_delete(*sound),
            Self::SoundUploadStart { sound, size } => build_sound_upload_start(*sound, *size),
            Self::SoundUploadData { seq, data } => build_sound_upload_data(*seq, data),
            Self::SoundUploadEnd => build_sound_upload_end(),
            Self::OtaBegin { size } => build_ota_begin(*size),
            Self::OtaData { seq, data } => build_ota_data(*seq, data),
            Self::OtaEnd => build_ota_end(),
            Self::OtaAbort => build_ota_abort(),
            Self::RequestStatus => build_request_status(),
            Self::Ping => build_ping(),
        }
    }
}

// --- Settings ---

/// Levels are narrowed to signed bytes by truncation, no range check.
pub fn build_set_eq(bass: i32, mid: i32, treble: i32) -> Vec<u8> {
    let eq = EqSettings::from_ints(bass, mid, treble);
    let mut out = vec![CMD_SET_EQ];
    out.extend_from_slice(&eq.to_bytes());
    out
}

pub fn build_set_eq_preset(preset_id: u8) -> Vec<u8> {
    vec![CMD_SET_EQ_PRESET, preset_id]
}

pub fn build_set_control(control: ControlByte) -> Vec<u8> {
    vec![CMD_SET_CONTROL, control.bits()]
}

/// The name is cut to at most [`MAX_NAME_LEN`] bytes, backing off to the
/// previous character boundary so the speaker never stores half a character.
pub fn build_set_name(name: &str) -> Vec<u8> {
    let mut end = name.len().min(MAX_NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = Vec::with_capacity(1 + end);
    out.push(CMD_SET_NAME);
    out.extend_from_slice(&name.as_bytes()[..end]);
    out
}

/// Brightness and speed go out as 0-100; never rescale them to 0-255.
pub fn build_set_led(led: &LedState) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + LedState::WIRE_LEN);
    out.push(CMD_SET_LED);
    out.extend_from_slice(&led.to_bytes());
    out
}

pub fn build_set_led_effect(effect_id: u8) -> Vec<u8> {
    vec![CMD_SET_LED_EFFECT, effect_id]
}

pub fn build_set_led_brightness(brightness: i32) -> Vec<u8> {
    vec![CMD_SET_LED_BRIGHT, clamp_percent(brightness)]
}

// --- Custom sounds ---

pub fn build_sound_mute(muted: bool) -> Vec<u8> {
    vec![CMD_SOUND_MUTE, u8::from(muted)]
}

pub fn build_sound_delete(sound: SoundType) -> Vec<u8> {
    vec![CMD_SOUND_DELETE, sound.id()]
}

/// Size is 3 bytes little-endian; anything above 16 MiB is truncated.
pub fn build_sound_upload_start(sound: SoundType, size: u32) -> Vec<u8> {
    let le = size.to_le_bytes();
    vec![CMD_SOUND_UP_START, sound.id(), le[0], le[1], le[2]]
}

pub fn build_sound_upload_data(seq: u8, data: &[u8]) -> Vec<u8> {
    sequenced(CMD_SOUND_UP_DATA, seq, data)
}

pub fn build_sound_upload_end() -> Vec<u8> {
    vec![CMD_SOUND_UP_END]
}

// --- Firmware update ---

/// Size is 4 bytes little-endian.
pub fn build_ota_begin(size: u32) -> Vec<u8> {
    let mut out = vec![CMD_OTA_BEGIN];
    out.extend_from_slice(&size.to_le_bytes());
    out
}

pub fn build_ota_data(seq: u8, data: &[u8]) -> Vec<u8> {
    sequenced(CMD_OTA_DATA, seq, data)
}

pub fn build_ota_end() -> Vec<u8> {
    vec![CMD_OTA_END]
}

pub fn build_ota_abort() -> Vec<u8> {
    vec![CMD_OTA_ABORT]
}

// --- Misc ---

pub fn build_request_status() -> Vec<u8> {
    vec![CMD_REQUEST_STATUS]
}

pub fn build_ping() -> Vec<u8> {
    vec![CMD_PING]
}

/// `[opcode, seq, data...]`. Chunk size is the caller's problem.
fn sequenced(opcode: u8, seq: u8, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + data.len());
    out.push(opcode);
    out.push(seq);
    out.extend_from_slice(data);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{ControlFlags, Rgb};

    #[test]
    fn test_set_eq() {
        assert_eq!(build_set_eq(6, 2, 0), vec![0x01, 0x06, 0x02, 0x00]);
        assert_eq!(build_set_eq(-12, 0, 12), vec![0x01, 0xF4, 0x00, 0x0C]);
        // Truncation, not clamping
        assert_eq!(build_set_eq(300, 0, 0), vec![0x01, 0x2C, 0x00, 0x00]);
    }

    #[test]
    fn test_led_brightness_clamped() {
        assert_eq!(build_set_led_brightness(150), vec![0x07, 0x64]);
        assert_eq!(build_set_led_brightness(-20), vec![0x07, 0x00]);
        assert_eq!(build_set_led_brightness(55), vec![0x07, 55]);
    }

    #[test]
    fn test_set_led() {
        let led = LedState {
            effect_id: 21,
            brightness: 200,
            speed: 101,
            primary: Rgb::new(0xFF, 0x10, 0x00),
            secondary: Rgb::new(0x00, 0x20, 0xFF),
            gradient_id: 2,
        };
        assert_eq!(
            build_set_led(&led),
            vec![0x05, 21, 100, 100, 0xFF, 0x10, 0x00, 0x00, 0x20, 0xFF, 2]
        );
    }

    #[test]
    fn test_set_control() {
        let c = ControlFlags {
            channel_flip: true,
            tws_master: true,
            ..Default::default()
        }
        .build();
        assert_eq!(build_set_control(c), vec![0x03, 0x0C]);
    }

    #[test]
    fn test_set_name_truncates() {
        assert_eq!(build_set_name("Kitchen"), b"\x04Kitchen".to_vec());
        assert_eq!(build_set_name(""), vec![0x04]);

        let long = "a".repeat(40);
        let frame = build_set_name(&long);
        assert_eq!(frame.len(), 1 + MAX_NAME_LEN);
    }

    #[test]
    fn test_set_name_respects_char_boundary() {
        // 31 ASCII bytes + a 2-byte character straddles the limit
        let name = format!("{}é", "a".repeat(31));
        let frame = build_set_name(&name);
        assert_eq!(frame.len(), 1 + 31);
        assert!(std::str::from_utf8(&frame[1..]).is_ok());
    }

    #[test]
    fn test_sound_frames() {
        assert_eq!(build_sound_mute(true), vec![0x10, 0x01]);
        assert_eq!(build_sound_mute(false), vec![0x10, 0x00]);
        assert_eq!(build_sound_delete(SoundType::Connected), vec![0x11, 0x02]);
        assert_eq!(
            build_sound_upload_start(SoundType::Pairing, 0x0012_3456),
            vec![0x12, 0x01, 0x56, 0x34, 0x12]
        );
        // Fourth byte is dropped
        assert_eq!(
            build_sound_upload_start(SoundType::Startup, 0xAB12_3456),
            vec![0x12, 0x00, 0x56, 0x34, 0x12]
        );
        assert_eq!(build_sound_upload_data(7, &[1, 2, 3]), vec![0x13, 7, 1, 2, 3]);
        assert_eq!(build_sound_upload_end(), vec![0x14]);
    }

    #[test]
    fn test_ota_frames() {
        assert_eq!(
            build_ota_begin(0x0102_0304),
            vec![0x20, 0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(build_ota_data(255, &[0xAA]), vec![0x21, 0xFF, 0xAA]);
        assert_eq!(build_ota_data(0, &[]), vec![0x21, 0x00]);
        assert_eq!(build_ota_end(), vec![0x22]);
        assert_eq!(build_ota_abort(), vec![0x23]);
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(build_request_status(), vec![0xF0]);
        assert_eq!(build_ping(), vec![0xFF]);
    }

    #[test]
    fn test_command_matches_builders() {
        let cases = vec![
            (Command::SetEq(EqSettings::new(6, 2, 0)), build_set_eq(6, 2, 0)),
            (Command::SetEqPreset(4), build_set_eq_preset(4)),
            (Command::SetName("Den".into()), build_set_name("Den")),
            (Command::SetLedEffect(9), build_set_led_effect(9)),
            (Command::SetLedBrightness(150), build_set_led_brightness(150)),
            (
                Command::OtaData {
                    seq: 3,
                    data: vec![9, 9],
                },
                build_ota_data(3, &[9, 9]),
            ),
            (Command::Ping, build_ping()),
        ];
        for (cmd, expected) in cases {
            let bytes = cmd.encode();
            assert_eq!(bytes, expected);
            assert_eq!(bytes[0], cmd.opcode());
        }
    }
}
