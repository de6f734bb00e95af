//! Speaker -> phone notification decoding.
//!
//! Decoding is total over every input length: short or malformed payloads
//! come back as [`DecodeError`], never as a panic or an out-of-bounds read.

use serde::Serialize;

use super::error::{DecodeError, DeviceError};
use super::message::Message;
use super::opcodes::*;
use crate::device::{ControlByte, EqSettings, FullStatus, LedState};

/// A decoded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Response {
    StatusEq(EqSettings),
    StatusControl(ControlByte),
    StatusName(String),
    StatusFirmware(String),
    StatusLed(LedState),
    StatusSound(u8),
    AckOk { command: u8 },
    AckError { command: u8, error: DeviceError },
    OtaProgress(u8),
    OtaReady,
    OtaComplete,
    OtaFailed(DeviceError),
    SoundProgress(u8),
    SoundReady,
    SoundComplete,
    SoundFailed(DeviceError),
    FullStatus(FullStatus),
    Pong,
}

impl Response {
    pub fn opcode(&self) -> u8 {
        match self {
            Self::StatusEq(_) => RESP_STATUS_EQ,
            Self::StatusControl(_) => RESP_STATUS_CONTROL,
            Self::StatusName(_) => RESP_STATUS_NAME,
            Self::StatusFirmware(_) => RESP_STATUS_FW,
            Self::StatusLed(_) => RESP_STATUS_LED,
            Self::StatusSound(_) => RESP_STATUS_SOUND,
            Self::AckOk { .. } => RESP_ACK_OK,
            Self::AckError { .. } => RESP_ACK_ERROR,
            Self::OtaProgress(_) => RESP_OTA_PROGRESS,
            Self::OtaReady => RESP_OTA_READY,
            Self::OtaComplete => RESP_OTA_COMPLETE,
            Self::OtaFailed(_) => RESP_OTA_FAILED,
            Self::SoundProgress(_) => RESP_SOUND_PROGRESS,
            Self::SoundReady => RESP_SOUND_READY,
            Self::SoundComplete => RESP_SOUND_COMPLETE,
            Self::SoundFailed(_) => RESP_SOUND_FAILED,
            Self::FullStatus(_) => RESP_FULL_STATUS,
            Self::Pong => RESP_PONG,
        }
    }

    /// Serialize the way the speaker firmware would send it.
    pub fn encode(&self) -> Vec<u8> {
        let payload = match self {
            Self::StatusEq(eq) => eq.to_bytes().to_vec(),
            Self::StatusControl(c) => vec![c.bits()],
            Self::StatusName(s) | Self::StatusFirmware(s) => s.as_bytes().to_vec(),
            Self::StatusLed(led) => led.to_bytes().to_vec(),
            Self::StatusSound(s) => vec![*s],
            Self::AckOk { command } => vec![*command],
            Self::AckError { command, error } => vec![*command, u8::from(*error)],
            Self::OtaProgress(p) | Self::SoundProgress(p) => vec![*p],
            Self::OtaFailed(e) | Self::SoundFailed(e) => vec![u8::from(*e)],
            Self::FullStatus(status) => status.to_payload(),
            Self::OtaReady
            | Self::OtaComplete
            | Self::SoundReady
            | Self::SoundComplete
            | Self::Pong => Vec::new(),
        };
        Message::new(self.opcode(), payload).to_bytes()
    }
}

/// Decode a whole notification, `[opcode][payload...]`.
pub fn decode_frame(data: &[u8]) -> Result<Response, DecodeError> {
    let (&opcode, payload) = data.split_first().ok_or(DecodeError::Empty)?;
    decode(opcode, payload)
}

/// Decode a payload whose opcode has already been split off.
pub fn decode(opcode: u8, payload: &[u8]) -> Result<Response, DecodeError> {
    let mut r = PayloadReader::new(opcode, payload);
    let response = match opcode {
        RESP_STATUS_EQ => Response::StatusEq(parse_status_eq(payload)?),
        RESP_STATUS_CONTROL => Response::StatusControl(ControlByte(r.u8()?)),
        RESP_STATUS_NAME => Response::StatusName(String::from_utf8_lossy(payload).into_owned()),
        RESP_STATUS_FW => Response::StatusFirmware(String::from_utf8_lossy(payload).into_owned()),
        RESP_STATUS_LED => Response::StatusLed(parse_status_led(payload)?),
        RESP_STATUS_SOUND => Response::StatusSound(r.u8()?),
        RESP_ACK_OK => Response::AckOk { command: r.u8()? },
        RESP_ACK_ERROR => {
            let [command, code] = r.array::<2>()?;
            Response::AckError {
                command,
                error: DeviceError::from(code),
            }
        }
        RESP_OTA_PROGRESS => Response::OtaProgress(r.u8()?),
        RESP_OTA_READY => Response::OtaReady,
        RESP_OTA_COMPLETE => Response::OtaComplete,
        RESP_OTA_FAILED => Response::OtaFailed(DeviceError::from(r.u8()?)),
        RESP_SOUND_PROGRESS => Response::SoundProgress(r.u8()?),
        RESP_SOUND_READY => Response::SoundReady,
        RESP_SOUND_COMPLETE => Response::SoundComplete,
        RESP_SOUND_FAILED => Response::SoundFailed(DeviceError::from(r.u8()?)),
        RESP_FULL_STATUS => Response::FullStatus(parse_full_status(payload)?),
        RESP_PONG => Response::Pong,
        other => return Err(DecodeError::UnknownOpcode(other)),
    };
    Ok(response)
}

impl TryFrom<&Message> for Response {
    type Error = DecodeError;

    fn try_from(msg: &Message) -> Result<Self, Self::Error> {
        decode(msg.opcode, &msg.payload)
    }
}

/// `[bass, mid, treble]`, each a signed byte.
pub fn parse_status_eq(data: &[u8]) -> Result<EqSettings, DecodeError> {
    let mut r = PayloadReader::new(RESP_STATUS_EQ, data);
    Ok(EqSettings::from_bytes(&r.array()?))
}

/// 10-byte LED record. Brightness and speed are clamped to 0-100.
pub fn parse_status_led(data: &[u8]) -> Result<LedState, DecodeError> {
    let mut r = PayloadReader::new(RESP_STATUS_LED, data);
    Ok(LedState::from_bytes(&r.array()?))
}

/// Full status dump.
///
/// Format: `[eq: 3][control][led: 10][sound][name_len][name...][fw_len][fw...]`.
/// Both length prefixes are checked against the remaining bytes before the
/// string is sliced. A payload that ends right after the name carries an
/// empty firmware version.
pub fn parse_full_status(data: &[u8]) -> Result<FullStatus, DecodeError> {
    if data.len() < FullStatus::MIN_LEN {
        return Err(DecodeError::TooShort {
            opcode: RESP_FULL_STATUS,
            expected: FullStatus::MIN_LEN,
            actual: data.len(),
        });
    }

    let mut r = PayloadReader::new(RESP_FULL_STATUS, data);
    let eq = EqSettings::from_bytes(&r.array()?);
    let control = ControlByte(r.u8()?);
    let led = LedState::from_bytes(&r.array()?);
    let sound_status = r.u8()?;
    let device_name = r.prefixed_string("device name")?;
    let firmware_version = if r.is_empty() {
        String::new()
    } else {
        r.prefixed_string("firmware version")?
    };

    Ok(FullStatus {
        eq,
        control,
        led,
        sound_status,
        device_name,
        firmware_version,
    })
}

/// Bounds-checked left-to-right cursor over a payload.
struct PayloadReader<'a> {
    opcode: u8,
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    fn new(opcode: u8, data: &'a [u8]) -> Self {
        Self {
            opcode,
            data,
            pos: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(DecodeError::TooShort {
                opcode: self.opcode,
                expected: end,
                actual: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// `[len][bytes...]` decoded as lossy UTF-8.
    fn prefixed_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.u8()? as usize;
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(DecodeError::FieldOverflow {
                field,
                offset: self.pos,
                declared: len,
                available,
            });
        }
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
