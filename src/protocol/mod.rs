pub mod decoder;
pub mod encoder;
pub mod error;
pub mod message;
pub mod opcodes;
pub mod transfer;

pub use decoder::{decode, decode_frame, Response};
pub use encoder::Command;
pub use error::{DecodeError, DeviceError};
pub use message::Message;
pub use transfer::{TransferEvent, TransferFrame, TransferKind};
