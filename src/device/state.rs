use serde::Serialize;

use super::{ControlByte, EqSettings, FullStatus, LedState};
use crate::protocol::{DeviceError, Response};

/// Last-known speaker settings, assembled from notifications.
///
/// Fields stay `None` until the speaker has reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpeakerState {
    pub eq: Option<EqSettings>,
    pub control: Option<ControlByte>,
    pub led: Option<LedState>,
    pub sound_status: Option<u8>,
    pub device_name: Option<String>,
    pub firmware_version: Option<String>,
    pub ota_progress: Option<u8>,
    pub sound_progress: Option<u8>,
    pub last_error: Option<(u8, DeviceError)>,
}

impl SpeakerState {
    /// Fold a notification into the snapshot. Returns true if anything changed.
    pub fn apply(&mut self, response: &Response) -> bool {
        let before = self.clone();
        match response {
            Response::StatusEq(eq) => self.eq = Some(*eq),
            Response::StatusControl(c) => self.control = Some(*c),
            Response::StatusName(name) => self.device_name = Some(name.clone()),
            Response::StatusFirmware(fw) => self.firmware_version = Some(fw.clone()),
            Response::StatusLed(led) => self.led = Some(*led),
            Response::StatusSound(s) => self.sound_status = Some(*s),
            Response::AckError { command, error } => self.last_error = Some((*command, *error)),
            Response::OtaProgress(p) => self.ota_progress = Some(*p),
            Response::OtaComplete => self.ota_progress = Some(100),
            Response::SoundProgress(p) => self.sound_progress = Some(*p),
            Response::SoundComplete => self.sound_progress = Some(100),
            Response::FullStatus(status) => self.apply_full(status),
            Response::AckOk { .. }
            | Response::OtaReady
            | Response::OtaFailed(_)
            | Response::SoundReady
            | Response::SoundFailed(_)
            | Response::Pong => {}
        }
        *self != before
    }

    fn apply_full(&mut self, status: &FullStatus) {
        self.eq = Some(status.eq);
        self.control = Some(status.control);
        self.led = Some(status.led);
        self.sound_status = Some(status.sound_status);
        self.device_name = Some(status.device_name.clone());
        self.firmware_version = Some(status.firmware_version.clone());
    }

    /// Whether a full status has been seen (or every part reported).
    pub fn is_synced(&self) -> bool {
        self.eq.is_some()
            && self.control.is_some()
            && self.led.is_some()
            && self.sound_status.is_some()
            && self.device_name.is_some()
            && self.firmware_version.is_some()
    }
}
