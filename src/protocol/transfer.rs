//! Chunked bulk transfers: firmware update (OTA) and custom sound upload.
//!
//! Framing is `Begin(size) -> Data(seq, bytes)* -> End | Abort`. Sequence
//! numbers start at 0 for every transfer and wrap at 256. Progress tracking,
//! reassembly and duplicate detection belong to whoever drives the transfer.

use serde::Serialize;

use super::decoder::Response;
use super::encoder::*;
use super::error::{DecodeError, DeviceError};
use super::opcodes::*;
use crate::catalog::SoundType;

/// Largest size the 3-byte sound length field can carry.
pub const MAX_SOUND_SIZE: u32 = 0x00FF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferKind {
    Ota,
    Sound(SoundType),
}

/// One frame of a transfer, without the opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferFrame {
    Begin { size: u32 },
    Data { seq: u8, data: Vec<u8> },
    End,
    Abort,
}

impl TransferKind {
    /// Largest total size the begin frame can express.
    pub fn max_size(self) -> u32 {
        match self {
            Self::Ota => u32::MAX,
            Self::Sound(_) => MAX_SOUND_SIZE,
        }
    }

    pub fn begin(self, size: u32) -> Vec<u8> {
        match self {
            Self::Ota => build_ota_begin(size),
            Self::Sound(sound) => build_sound_upload_start(sound, size),
        }
    }

    pub fn data(self, seq: u8, chunk: &[u8]) -> Vec<u8> {
        match self {
            Self::Ota => build_ota_data(seq, chunk),
            Self::Sound(_) => build_sound_upload_data(seq, chunk),
        }
    }

    pub fn end(self) -> Vec<u8> {
        match self {
            Self::Ota => build_ota_end(),
            Self::Sound(_) => build_sound_upload_end(),
        }
    }

    /// Sound uploads have no abort opcode.
    pub fn abort(self) -> Option<Vec<u8>> {
        match self {
            Self::Ota => Some(build_ota_abort()),
            Self::Sound(_) => None,
        }
    }

    /// Encode any frame; `None` only for a sound abort.
    pub fn encode(self, frame: &TransferFrame) -> Option<Vec<u8>> {
        match frame {
            TransferFrame::Begin { size } => Some(self.begin(*size)),
            TransferFrame::Data { seq, data } => Some(self.data(*seq, data)),
            TransferFrame::End => Some(self.end()),
            TransferFrame::Abort => self.abort(),
        }
    }
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ota => write!(f, "firmware"),
            Self::Sound(sound) => write!(f, "{} sound", sound.as_str()),
        }
    }
}

/// Number of data frames needed for `len` bytes.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size.max(1))
}

/// Slice `data` into data frames of at most `chunk_size` payload bytes each
/// (the sequence byte is extra). A `chunk_size` of 0 is treated as 1.
pub fn chunk_frames(
    kind: TransferKind,
    data: &[u8],
    chunk_size: usize,
) -> impl Iterator<Item = Vec<u8>> + '_ {
    data.chunks(chunk_size.max(1))
        .enumerate()
        .map(move |(i, chunk)| kind.data(i as u8, chunk))
}

/// Transfer a command frame belongs to, as seen from the speaker side.
///
/// Only the begin frame of a sound upload names the slot; data and end
/// frames carry `Sound(None)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Ota,
    Sound(Option<SoundType>),
}

impl From<TransferKind> for Channel {
    fn from(kind: TransferKind) -> Self {
        match kind {
            TransferKind::Ota => Self::Ota,
            TransferKind::Sound(sound) => Self::Sound(Some(sound)),
        }
    }
}

/// Decode a transfer command frame.
pub fn parse_transfer_frame(bytes: &[u8]) -> Result<(Channel, TransferFrame), DecodeError> {
    let (&opcode, payload) = bytes.split_first().ok_or(DecodeError::Empty)?;
    let too_short = |expected: usize| DecodeError::TooShort {
        opcode,
        expected,
        actual: payload.len(),
    };

    match opcode {
        CMD_OTA_BEGIN => {
            let size: [u8; 4] = payload
                .get(..4)
                .and_then(|s| s.try_into().ok())
                .ok_or_else(|| too_short(4))?;
            Ok((
                Channel::Ota,
                TransferFrame::Begin {
                    size: u32::from_le_bytes(size),
                },
            ))
        }
        CMD_SOUND_UP_START => {
            if payload.len() < 4 {
                return Err(too_short(4));
            }
            let sound = SoundType::from_id(payload[0]).ok_or(DecodeError::InvalidValue {
                field: "sound type",
                value: payload[0],
            })?;
            let size = u32::from_le_bytes([payload[1], payload[2], payload[3], 0]);
            Ok((Channel::Sound(Some(sound)), TransferFrame::Begin { size }))
        }
        CMD_OTA_DATA | CMD_SOUND_UP_DATA => {
            let (&seq, data) = payload.split_first().ok_or_else(|| too_short(1))?;
            let channel = if opcode == CMD_OTA_DATA {
                Channel::Ota
            } else {
                Channel::Sound(None)
            };
            let frame = TransferFrame::Data {
                seq,
                data: data.to_vec(),
            };
            Ok((channel, frame))
        }
        CMD_OTA_END => Ok((Channel::Ota, TransferFrame::End)),
        CMD_OTA_ABORT => Ok((Channel::Ota, TransferFrame::Abort)),
        CMD_SOUND_UP_END => Ok((Channel::Sound(None), TransferFrame::End)),
        other => Err(DecodeError::UnknownOpcode(other)),
    }
}

/// Transfer-related notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferEvent {
    /// Speaker is ready for the next frame.
    Ready,
    Progress(u8),
    Complete,
    Failed(DeviceError),
}

impl TransferEvent {
    /// Map a response to an event for `kind`; responses of the other
    /// transfer kind and non-transfer responses give `None`.
    pub fn from_response(kind: TransferKind, response: &Response) -> Option<Self> {
        match (kind, response) {
            (TransferKind::Ota, Response::OtaReady) => Some(Self::Ready),
            (TransferKind::Ota, Response::OtaProgress(p)) => Some(Self::Progress(*p)),
            (TransferKind::Ota, Response::OtaComplete) => Some(Self::Complete),
            (TransferKind::Ota, Response::OtaFailed(e)) => Some(Self::Failed(*e)),
            (TransferKind::Sound(_), Response::SoundReady) => Some(Self::Ready),
            (TransferKind::Sound(_), Response::SoundProgress(p)) => Some(Self::Progress(*p)),
            (TransferKind::Sound(_), Response::SoundComplete) => Some(Self::Complete),
            (TransferKind::Sound(_), Response::SoundFailed(e)) => Some(Self::Failed(*e)),
            _ => None,
        }
    }
}
