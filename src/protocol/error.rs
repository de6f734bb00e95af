use thiserror::Error;

use super::opcodes::*;

/// Reasons a notification could not be decoded.
///
/// Malformed input is data, not a bug: every variant is returned to the
/// caller, who decides whether to log, drop or retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No bytes at all, so there is no opcode to dispatch on.
    #[error("empty frame")]
    Empty,

    /// Payload shorter than the opcode's minimum length.
    #[error("payload too short for opcode 0x{opcode:02X}: expected at least {expected} bytes, got {actual}")]
    TooShort {
        opcode: u8,
        expected: usize,
        actual: usize,
    },

    /// A length-prefixed field would read past the end of the buffer.
    #[error("{field} overflows payload: {declared} bytes declared at offset {offset}, {available} available")]
    FieldOverflow {
        field: &'static str,
        offset: usize,
        declared: usize,
        available: usize,
    },

    /// A single-byte field holds a value with no meaning on this opcode.
    #[error("invalid {field}: 0x{value:02X}")]
    InvalidValue { field: &'static str, value: u8 },

    /// Opcode is not part of the namespace being decoded.
    #[error("unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),
}

/// Error code reported by the speaker in `ACK_ERROR`, `OTA_FAILED` and
/// `SOUND_FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum DeviceError {
    None,
    InvalidCmd,
    InvalidParam,
    Busy,
    OtaInitFail,
    OtaWriteFail,
    OtaVerifyFail,
    SoundInitFail,
    SoundWriteFail,
    Unknown(u8),
}

impl From<u8> for DeviceError {
    fn from(code: u8) -> Self {
        match code {
            ERR_NONE => Self::None,
            ERR_INVALID_CMD => Self::InvalidCmd,
            ERR_INVALID_PARAM => Self::InvalidParam,
            ERR_BUSY => Self::Busy,
            ERR_OTA_INIT_FAIL => Self::OtaInitFail,
            ERR_OTA_WRITE_FAIL => Self::OtaWriteFail,
            ERR_OTA_VERIFY_FAIL => Self::OtaVerifyFail,
            ERR_SOUND_INIT_FAIL => Self::SoundInitFail,
            ERR_SOUND_WRITE_FAIL => Self::SoundWriteFail,
            other => Self::Unknown(other),
        }
    }
}

impl From<DeviceError> for u8 {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::None => ERR_NONE,
            DeviceError::InvalidCmd => ERR_INVALID_CMD,
            DeviceError::InvalidParam => ERR_INVALID_PARAM,
            DeviceError::Busy => ERR_BUSY,
            DeviceError::OtaInitFail => ERR_OTA_INIT_FAIL,
            DeviceError::OtaWriteFail => ERR_OTA_WRITE_FAIL,
            DeviceError::OtaVerifyFail => ERR_OTA_VERIFY_FAIL,
            DeviceError::SoundInitFail => ERR_SOUND_INIT_FAIL,
            DeviceError::SoundWriteFail => ERR_SOUND_WRITE_FAIL,
            DeviceError::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "no error"),
            Self::InvalidCmd => write!(f, "invalid command"),
            Self::InvalidParam => write!(f, "invalid parameter"),
            Self::Busy => write!(f, "busy"),
            Self::OtaInitFail => write!(f, "OTA init failed"),
            Self::OtaWriteFail => write!(f, "OTA write failed"),
            Self::OtaVerifyFail => write!(f, "OTA verify failed"),
            Self::SoundInitFail => write!(f, "sound init failed"),
            Self::SoundWriteFail => write!(f, "sound write failed"),
            Self::Unknown(code) => write!(f, "unknown error (0x{:02X})", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_codes() {
        assert_eq!(DeviceError::from(0x03), DeviceError::Busy);
        assert_eq!(DeviceError::from(0x12), DeviceError::OtaVerifyFail);
        assert_eq!(DeviceError::from(0x7E), DeviceError::Unknown(0x7E));
        assert_eq!(u8::from(DeviceError::SoundWriteFail), 0x21);
        assert_eq!(u8::from(DeviceError::Unknown(0x7E)), 0x7E);
    }

    #[test]
    fn test_messages() {
        let err = DecodeError::TooShort {
            opcode: 0x05,
            expected: 10,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "payload too short for opcode 0x05: expected at least 10 bytes, got 4"
        );
        assert_eq!(DecodeError::UnknownOpcode(0xAB).to_string(), "unknown opcode: 0xAB");
    }
}
