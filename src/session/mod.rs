//! Request/notify exchange with a speaker over an abstract [`Transport`].

pub mod emulator;
pub mod transport;

use anyhow::{bail, ensure, Context, Result};
use tracing::{debug, info, warn};

use crate::device::{FullStatus, SpeakerState};
use crate::protocol::encoder::{build_ping, build_request_status};
use crate::protocol::message::hex;
use crate::protocol::opcodes::command_name;
use crate::protocol::transfer::{chunk_count, chunk_frames};
use crate::protocol::{decode_frame, Command, Response, TransferEvent, TransferKind};

pub use emulator::VirtualSpeaker;
pub use transport::{ChannelTransport, Transport};

/// Upload progress passed to the caller after every acknowledged frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub chunks_sent: usize,
    pub chunks_total: usize,
    /// Last percentage reported by the speaker, if any.
    pub device_percent: Option<u8>,
}

pub struct Session<T: Transport> {
    transport: T,
    state: SpeakerState,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: SpeakerState::default(),
        }
    }

    /// Snapshot built from every notification seen so far.
    pub fn state(&self) -> &SpeakerState {
        &self.state
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub async fn send(&mut self, command: &Command) -> Result<()> {
        self.send_raw(command.encode()).await
    }

    pub async fn send_raw(&mut self, frame: Vec<u8>) -> Result<()> {
        if let Some(&opcode) = frame.first() {
            debug!("TX {}: {}", command_name(opcode), hex::encode(&frame));
        }
        self.transport.write(frame).await
    }

    /// Wait for the next well-formed notification. Malformed frames are
    /// logged and skipped. Fails once the transport closes.
    pub async fn next_response(&mut self) -> Result<Response> {
        loop {
            let Some(frame) = self.transport.next_notification().await else {
                bail!("Transport closed");
            };
            match decode_frame(&frame) {
                Ok(response) => {
                    debug!("RX {:?}", response);
                    self.state.apply(&response);
                    return Ok(response);
                }
                Err(e) => warn!("Dropping notification {}: {}", hex::encode(&frame), e),
            }
        }
    }

    /// Ask for a full status and wait for it. Other notifications that
    /// arrive first still update the state.
    pub async fn request_status(&mut self) -> Result<FullStatus> {
        self.send_raw(build_request_status()).await?;
        loop {
            if let Response::FullStatus(status) = self.next_response().await? {
                return Ok(status);
            }
        }
    }

    pub async fn ping(&mut self) -> Result<()> {
        self.send_raw(build_ping()).await?;
        while self.next_response().await? != Response::Pong {}
        Ok(())
    }

    /// Run a whole transfer: begin, every data frame, end. Each frame waits
    /// for the speaker's ready before the next is sent.
    pub async fn upload<F>(
        &mut self,
        kind: TransferKind,
        data: &[u8],
        chunk_size: usize,
        mut on_progress: F,
    ) -> Result<()>
    where
        F: FnMut(UploadProgress),
    {
        let size = u32::try_from(data.len())
            .ok()
            .filter(|&s| s <= kind.max_size())
            .with_context(|| format!("{} bytes is too large for a {} upload", data.len(), kind))?;
        let chunks_total = chunk_count(data.len(), chunk_size);
        info!(
            "Uploading {}: {} bytes in {} chunks",
            kind, size, chunks_total
        );

        let mut progress = UploadProgress {
            chunks_sent: 0,
            chunks_total,
            device_percent: None,
        };

        self.send_raw(kind.begin(size)).await?;
        self.wait_for(kind, TransferEvent::Ready, &mut progress).await?;

        for frame in chunk_frames(kind, data, chunk_size) {
            self.send_raw(frame).await?;
            self.wait_for(kind, TransferEvent::Ready, &mut progress).await?;
            progress.chunks_sent += 1;
            on_progress(progress);
        }

        self.send_raw(kind.end()).await?;
        self.wait_for(kind, TransferEvent::Complete, &mut progress)
            .await?;
        info!("Upload of {} complete", kind);
        Ok(())
    }

    /// Cancel an in-flight firmware update.
    pub async fn abort(&mut self, kind: TransferKind) -> Result<()> {
        let Some(frame) = kind.abort() else {
            bail!("{} uploads cannot be aborted", kind);
        };
        warn!("Aborting {} upload", kind);
        self.send_raw(frame).await
    }

    async fn wait_for(
        &mut self,
        kind: TransferKind,
        expected: TransferEvent,
        progress: &mut UploadProgress,
    ) -> Result<()> {
        loop {
            let response = self.next_response().await?;
            if let Response::AckError { command, error } = response {
                ensure!(
                    !is_transfer_opcode(kind, command),
                    "{} upload rejected: {} ({})",
                    kind,
                    error,
                    command_name(command)
                );
                continue;
            }
            match TransferEvent::from_response(kind, &response) {
                Some(TransferEvent::Failed(error)) => bail!("{} upload failed: {}", kind, error),
                Some(TransferEvent::Progress(p)) => progress.device_percent = Some(p),
                Some(event) if event == expected => return Ok(()),
                Some(event) => debug!("Ignoring {:?} while waiting for {:?}", event, expected),
                None => {}
            }
        }
    }
}

fn is_transfer_opcode(kind: TransferKind, opcode: u8) -> bool {
    use crate::protocol::opcodes::*;
    match kind {
        TransferKind::Ota => (CMD_OTA_BEGIN..=CMD_OTA_ABORT).contains(&opcode),
        TransferKind::Sound(_) => (CMD_SOUND_UP_START..=CMD_SOUND_UP_END).contains(&opcode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SoundType;
    use crate::device::EqSettings;
    use crate::protocol::transfer::Channel;
    use crate::protocol::DeviceError;

    fn speaker() -> VirtualSpeaker {
        VirtualSpeaker::new(FullStatus {
            eq: EqSettings::new(2, 0, -2),
            device_name: "Kitchen".into(),
            firmware_version: "1.4.2".into(),
            ..Default::default()
        })
    }

    fn connect(speaker: VirtualSpeaker) -> (Session<ChannelTransport>, tokio::task::JoinHandle<VirtualSpeaker>) {
        let (phone, device) = ChannelTransport::pair(16);
        let handle = tokio::spawn(speaker.run(device));
        (Session::new(phone), handle)
    }

    #[tokio::test]
    async fn test_request_status() {
        let (mut session, handle) = connect(speaker());
        let status = session.request_status().await.unwrap();
        assert_eq!(status.device_name, "Kitchen");
        assert_eq!(status.eq, EqSettings::new(2, 0, -2));
        assert!(session.state().is_synced());
        session.ping().await.unwrap();
        drop(session);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_settings_update_state() {
        let (mut session, handle) = connect(speaker());
        session.send(&Command::SetName("Porch".into())).await.unwrap();
        assert_eq!(
            session.next_response().await.unwrap(),
            Response::AckOk { command: 0x04 }
        );
        session.next_response().await.unwrap();
        assert_eq!(session.state().device_name.as_deref(), Some("Porch"));
        drop(session);
        let speaker = handle.await.unwrap();
        assert_eq!(speaker.status.device_name, "Porch");
    }

    #[tokio::test]
    async fn test_ota_upload() {
        let (mut session, handle) = connect(speaker());
        let firmware: Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
        let mut seen = Vec::new();
        session
            .upload(TransferKind::Ota, &firmware, 64, |p| seen.push(p))
            .await
            .unwrap();
        assert_eq!(seen.len(), 16);
        assert_eq!(seen.last().map(|p| p.chunks_sent), Some(16));
        assert_eq!(seen.last().and_then(|p| p.device_percent), Some(100));
        assert_eq!(session.state().ota_progress, Some(100));
        drop(session);
        let speaker = handle.await.unwrap();
        assert_eq!(speaker.uploads.len(), 1);
        assert_eq!(speaker.uploads[0].channel, Channel::Ota);
        assert_eq!(speaker.uploads[0].data, firmware);
    }

    #[tokio::test]
    async fn test_sound_upload_wraps_sequence() {
        let (mut session, handle) = connect(speaker());
        let clip = vec![0x5A; 300];
        session
            .upload(TransferKind::Sound(SoundType::Connected), &clip, 1, |_| {})
            .await
            .unwrap();
        drop(session);
        let speaker = handle.await.unwrap();
        assert_eq!(
            speaker.uploads[0].channel,
            Channel::Sound(Some(SoundType::Connected))
        );
        assert_eq!(speaker.uploads[0].data.len(), 300);
    }

    #[tokio::test]
    async fn test_upload_failure() {
        let (mut session, _handle) = connect(speaker().rejecting_transfers(DeviceError::OtaInitFail));
        let err = session
            .upload(TransferKind::Ota, &[1, 2, 3], 2, |_| {})
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed"));
    }

    #[tokio::test]
    async fn test_sound_upload_too_large() {
        let (mut session, _handle) = connect(speaker());
        let clip = vec![0; 0x0100_0000];
        let kind = TransferKind::Sound(SoundType::Startup);
        assert!(session.upload(kind, &clip, 512, |_| {}).await.is_err());
        assert!(session.abort(kind).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_notification_is_skipped() {
        let (phone, mut device) = ChannelTransport::pair(4);
        let mut session = Session::new(phone);
        device.write(vec![0x7E, 1, 2]).await.unwrap();
        device.write(vec![]).await.unwrap();
        device.write(vec![0x06, 3]).await.unwrap();
        assert_eq!(session.next_response().await.unwrap(), Response::StatusSound(3));
        assert_eq!(session.state().sound_status, Some(3));
    }

    #[tokio::test]
    async fn test_closed_transport() {
        let (phone, device) = ChannelTransport::pair(4);
        let mut session = Session::new(phone);
        drop(device);
        assert!(session.next_response().await.is_err());
        assert!(session.request_status().await.is_err());
    }
}
