use tracing::{debug, info, warn};

use super::transport::{ChannelTransport, Transport};
use crate::catalog::SoundType;
use crate::device::{ControlByte, EqSettings, FullStatus, LedState};
use crate::protocol::encoder::MAX_NAME_LEN;
use crate::protocol::message::hex;
use crate::protocol::opcodes::*;
use crate::protocol::transfer::{parse_transfer_frame, Channel, TransferFrame};
use crate::protocol::{DeviceError, Response};

/// Upper bound on the buffer reserved from a begin frame's declared size.
const MAX_PREALLOC: usize = 64 * 1024;

/// A finished upload as received by the [`VirtualSpeaker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedUpload {
    pub channel: Channel,
    pub data: Vec<u8>,
}

#[derive(Debug)]
struct ActiveUpload {
    channel: Channel,
    size: usize,
    next_seq: u8,
    data: Vec<u8>,
}

/// Software stand-in for the speaker firmware.
///
/// Applies settings commands to its own [`FullStatus`], acknowledges them,
/// answers status requests and pings, and accepts chunked uploads.
#[derive(Debug)]
pub struct VirtualSpeaker {
    pub status: FullStatus,
    pub uploads: Vec<ReceivedUpload>,
    reject_transfers: Option<DeviceError>,
    active: Option<ActiveUpload>,
}

impl VirtualSpeaker {
    pub fn new(status: FullStatus) -> Self {
        Self {
            status,
            uploads: Vec::new(),
            reject_transfers: None,
            active: None,
        }
    }

    /// Fail every transfer at its begin frame with `error`.
    pub fn rejecting_transfers(mut self, error: DeviceError) -> Self {
        self.reject_transfers = Some(error);
        self
    }

    /// Serve commands until the phone end goes away, then hand back the
    /// final state for inspection.
    pub async fn run(mut self, mut transport: ChannelTransport) -> Self {
        while let Some(frame) = transport.next_notification().await {
            for reply in self.handle(&frame) {
                if transport.write(reply.encode()).await.is_err() {
                    return self;
                }
            }
        }
        info!("Virtual speaker stopped");
        self
    }

    /// Replies for one command frame.
    pub fn handle(&mut self, frame: &[u8]) -> Vec<Response> {
        let Some((&opcode, payload)) = frame.split_first() else {
            return Vec::new();
        };
        debug!("Virtual speaker RX: {}", hex::encode(frame));

        let ack = Response::AckOk { command: opcode };
        let invalid = Response::AckError {
            command: opcode,
            error: DeviceError::InvalidParam,
        };

        match opcode {
            CMD_SET_EQ => match payload.get(..3) {
                Some(&[b, m, t]) => {
                    self.status.eq = EqSettings::from_bytes(&[b, m, t]);
                    vec![ack, Response::StatusEq(self.status.eq)]
                }
                _ => vec![invalid],
            },
            CMD_SET_EQ_PRESET => match payload.first().and_then(|&id| EqSettings::from_preset(id)) {
                Some(eq) => {
                    self.status.eq = eq;
                    vec![ack, Response::StatusEq(eq)]
                }
                None => vec![invalid],
            },
            CMD_SET_CONTROL => match payload.first() {
                Some(&c) => {
                    self.status.control = ControlByte(c);
                    vec![ack, Response::StatusControl(self.status.control)]
                }
                None => vec![invalid],
            },
            CMD_SET_NAME => {
                if payload.is_empty() || payload.len() > MAX_NAME_LEN {
                    return vec![invalid];
                }
                self.status.device_name = String::from_utf8_lossy(payload).into_owned();
                vec![ack, Response::StatusName(self.status.device_name.clone())]
            }
            CMD_SET_LED => match payload.get(..LedState::WIRE_LEN) {
                Some(bytes) => {
                    let mut led = [0u8; LedState::WIRE_LEN];
                    led.copy_from_slice(bytes);
                    self.status.led = LedState::from_bytes(&led);
                    vec![ack, Response::StatusLed(self.status.led)]
                }
                None => vec![invalid],
            },
            CMD_SET_LED_EFFECT => match payload.first() {
                Some(&id) => {
                    self.status.led.effect_id = id;
                    vec![ack, Response::StatusLed(self.status.led)]
                }
                None => vec![invalid],
            },
            CMD_SET_LED_BRIGHT => match payload.first() {
                Some(&b) => {
                    self.status.led.brightness = b.min(100);
                    vec![ack, Response::StatusLed(self.status.led)]
                }
                None => vec![invalid],
            },
            CMD_SOUND_MUTE => match payload.first() {
                Some(&m) => {
                    self.status.control = self.status.control.with(ControlByte::MUTE, m != 0);
                    vec![ack, Response::StatusControl(self.status.control)]
                }
                None => vec![invalid],
            },
            CMD_SOUND_DELETE => match payload.first().and_then(|&id| SoundType::from_id(id)) {
                Some(sound) => {
                    self.uploads
                        .retain(|u| u.channel != Channel::Sound(Some(sound)));
                    vec![ack]
                }
                None => vec![invalid],
            },
            CMD_REQUEST_STATUS => vec![Response::FullStatus(self.status.clone())],
            CMD_PING => vec![Response::Pong],
            _ if is_command(opcode) => self.handle_transfer(frame),
            _ => vec![Response::AckError {
                command: opcode,
                error: DeviceError::InvalidCmd,
            }],
        }
    }

    fn handle_transfer(&mut self, frame: &[u8]) -> Vec<Response> {
        let opcode = frame[0];
        let (channel, transfer) = match parse_transfer_frame(frame) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Virtual speaker: bad transfer frame: {}", e);
                return vec![Response::AckError {
                    command: opcode,
                    error: DeviceError::InvalidParam,
                }];
            }
        };
        let is_ota = channel == Channel::Ota;
        let (ready, complete) = if is_ota {
            (Response::OtaReady, Response::OtaComplete)
        } else {
            (Response::SoundReady, Response::SoundComplete)
        };
        let progress = |p: u8| {
            if is_ota {
                Response::OtaProgress(p)
            } else {
                Response::SoundProgress(p)
            }
        };
        let failed = |e: DeviceError| {
            if is_ota {
                Response::OtaFailed(e)
            } else {
                Response::SoundFailed(e)
            }
        };
        let write_fail = if is_ota {
            DeviceError::OtaWriteFail
        } else {
            DeviceError::SoundWriteFail
        };
        let same_stream = |active: &ActiveUpload| {
            matches!(
                (active.channel, channel),
                (Channel::Ota, Channel::Ota) | (Channel::Sound(_), Channel::Sound(_))
            )
        };

        match transfer {
            TransferFrame::Begin { size } => {
                if let Some(error) = self.reject_transfers {
                    return vec![failed(error)];
                }
                if self.active.is_some() {
                    return vec![failed(DeviceError::Busy)];
                }
                self.active = Some(ActiveUpload {
                    channel,
                    size: size as usize,
                    next_seq: 0,
                    data: Vec::with_capacity((size as usize).min(MAX_PREALLOC)),
                });
                vec![ready]
            }
            TransferFrame::Data { seq, data } => {
                let Some(active) = self.active.as_mut().filter(|a| same_stream(&**a)) else {
                    return vec![failed(write_fail)];
                };
                if seq != active.next_seq || active.data.len() + data.len() > active.size {
                    self.active = None;
                    return vec![failed(write_fail)];
                }
                active.data.extend_from_slice(&data);
                active.next_seq = active.next_seq.wrapping_add(1);
                let percent = if active.size == 0 {
                    100
                } else {
                    (active.data.len() * 100 / active.size) as u8
                };
                vec![progress(percent), ready]
            }
            TransferFrame::End => match self.active.take() {
                Some(active) if same_stream(&active) && active.data.len() == active.size => {
                    self.uploads.push(ReceivedUpload {
                        channel: active.channel,
                        data: active.data,
                    });
                    vec![complete]
                }
                _ => {
                    let verify = if is_ota {
                        DeviceError::OtaVerifyFail
                    } else {
                        DeviceError::SoundWriteFail
                    };
                    vec![failed(verify)]
                }
            },
            TransferFrame::Abort => {
                self.active = None;
                vec![Response::AckOk { command: opcode }]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encoder::*;
    use crate::protocol::TransferKind;

    fn speaker() -> VirtualSpeaker {
        VirtualSpeaker::new(FullStatus {
            device_name: "Virtual".into(),
            firmware_version: "0.0.1".into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_settings_are_applied() {
        let mut s = speaker();
        let replies = s.handle(&build_set_eq(3, -3, 0));
        assert_eq!(replies[0], Response::AckOk { command: CMD_SET_EQ });
        assert_eq!(s.status.eq, EqSettings::new(3, -3, 0));

        s.handle(&build_set_name("Attic"));
        assert_eq!(s.status.device_name, "Attic");

        s.handle(&build_sound_mute(true));
        assert!(s.status.control.muted());

        s.handle(&build_set_eq_preset(1));
        assert_eq!(s.status.eq, EqSettings::new(6, 2, 0));
    }

    #[test]
    fn test_invalid_params() {
        let mut s = speaker();
        assert_eq!(
            s.handle(&[CMD_SET_EQ, 1]),
            vec![Response::AckError {
                command: CMD_SET_EQ,
                error: DeviceError::InvalidParam,
            }]
        );
        assert_eq!(
            s.handle(&[0x42]),
            vec![Response::AckError {
                command: 0x42,
                error: DeviceError::InvalidCmd,
            }]
        );
        assert!(s.handle(&[]).is_empty());
    }

    #[test]
    fn test_out_of_order_chunk_fails() {
        let mut s = speaker();
        let kind = TransferKind::Ota;
        assert_eq!(s.handle(&kind.begin(4)), vec![Response::OtaReady]);
        assert_eq!(
            s.handle(&kind.data(1, &[0, 1])),
            vec![Response::OtaFailed(DeviceError::OtaWriteFail)]
        );
    }

    #[test]
    fn test_short_upload_fails_verify() {
        let mut s = speaker();
        let kind = TransferKind::Sound(SoundType::Pairing);
        s.handle(&kind.begin(4));
        s.handle(&kind.data(0, &[0, 1]));
        assert_eq!(
            s.handle(&kind.end()),
            vec![Response::SoundFailed(DeviceError::SoundWriteFail)]
        );
        assert!(s.uploads.is_empty());
    }

    #[test]
    fn test_abort_clears_upload() {
        let mut s = speaker();
        s.handle(&build_ota_begin(10));
        s.handle(&build_ota_abort());
        // A new transfer can start right away
        assert_eq!(s.handle(&build_ota_begin(10)), vec![Response::OtaReady]);
    }

    #[test]
    fn test_huge_declared_size_is_not_reserved() {
        let mut s = speaker();
        assert_eq!(s.handle(&[CMD_OTA_BEGIN, 0xFF, 0xFF, 0xFF, 0xFF]), vec![Response::OtaReady]);
        let active = s.active.as_ref().unwrap();
        assert_eq!(active.size, u32::MAX as usize);
        assert!(active.data.capacity() <= MAX_PREALLOC);
        assert_eq!(
            s.handle(&build_ota_data(0, &[1, 2, 3])),
            vec![Response::OtaProgress(0), Response::OtaReady]
        );
    }
}
