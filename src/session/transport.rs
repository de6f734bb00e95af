use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Byte pipe to a speaker.
///
/// Implementations route writes to the command characteristic and yield
/// notifications from the status characteristic. Connection management,
/// MTU negotiation and reconnects live behind this trait.
#[async_trait]
pub trait Transport: Send {
    /// Write one frame.
    async fn write(&mut self, frame: Vec<u8>) -> Result<()>;

    /// Next incoming frame, or `None` once the link is gone.
    async fn next_notification(&mut self) -> Option<Vec<u8>>;
}

/// In-memory transport over a pair of tokio channels.
///
/// From the device end, `write` sends a notification and `next_notification`
/// yields the next command.
pub struct ChannelTransport {
    tx: mpsc::Sender<Vec<u8>>,
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ChannelTransport {
    /// Returns `(phone_end, device_end)`.
    pub fn pair(buffer: usize) -> (Self, Self) {
        let (to_device, from_phone) = mpsc::channel(buffer);
        let (to_phone, from_device) = mpsc::channel(buffer);
        (
            Self {
                tx: to_device,
                rx: from_device,
            },
            Self {
                tx: to_phone,
                rx: from_phone,
            },
        )
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn write(&mut self, frame: Vec<u8>) -> Result<()> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| anyhow!("Transport closed"))
    }

    async fn next_notification(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pair_is_crossed() {
        let (mut phone, mut device) = ChannelTransport::pair(4);
        phone.write(vec![0xFF]).await.unwrap();
        assert_eq!(device.next_notification().await, Some(vec![0xFF]));
        device.write(vec![0xFF]).await.unwrap();
        assert_eq!(phone.next_notification().await, Some(vec![0xFF]));
    }

    #[tokio::test]
    async fn test_closed_end() {
        let (mut phone, device) = ChannelTransport::pair(4);
        drop(device);
        assert!(phone.is_closed());
        assert!(phone.write(vec![0xF0]).await.is_err());
        assert_eq!(phone.next_notification().await, None);
    }
}
