use super::error::DecodeError;

/// A single protocol frame.
///
/// Wire format:
/// ```text
/// [opcode: 1 byte] [payload: 0..N bytes]
/// ```
///
/// The same layout is used in both directions; which opcode namespace applies
/// depends on the characteristic the frame travelled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub opcode: u8,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(opcode: u8, payload: Vec<u8>) -> Self {
        Self { opcode, payload }
    }

    /// A frame with no payload.
    pub fn bare(opcode: u8) -> Self {
        Self::new(opcode, Vec::new())
    }

    /// Serialize to wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.payload.len());
        bytes.push(self.opcode);
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Split raw bytes into opcode and payload.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let (&opcode, payload) = data.split_first().ok_or(DecodeError::Empty)?;
        Ok(Self::new(opcode, payload.to_vec()))
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "op=0x{:02X}", self.opcode)?;
        if !self.payload.is_empty() {
            write!(f, " payload={}", hex::encode(&self.payload))?;
        }
        Ok(())
    }
}

/// Hex helpers for logs and the CLI (avoid extra dependency).
pub mod hex {
    pub fn encode(data: &[u8]) -> String {
        data.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parse a hex string. Whitespace, `:` and `-` separators are ignored.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        let digits: Vec<u8> = s
            .bytes()
            .filter(|b| !b.is_ascii_whitespace() && *b != b':' && *b != b'-')
            .collect();
        if digits.len() % 2 != 0 {
            return None;
        }
        digits
            .chunks(2)
            .map(|pair| {
                let hi = (pair[0] as char).to_digit(16)?;
                let lo = (pair[1] as char).to_digit(16)?;
                Some((hi * 16 + lo) as u8)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let msg = Message::new(0x07, vec![0x64]);
        assert_eq!(msg.to_bytes(), vec![0x07, 0x64]);

        let parsed = Message::from_bytes(&[0xF0, 0x01, 0x02]).unwrap();
        assert_eq!(parsed.opcode, 0xF0);
        assert_eq!(parsed.payload, vec![0x01, 0x02]);
    }

    #[test]
    fn test_bare_frame() {
        let parsed = Message::from_bytes(&[0xFF]).unwrap();
        assert_eq!(parsed, Message::bare(0xFF));
        assert!(parsed.payload.is_empty());
    }

    #[test]
    fn test_empty_frame() {
        assert_eq!(Message::from_bytes(&[]), Err(DecodeError::Empty));
    }

    #[test]
    fn test_display() {
        let msg = Message::new(0x01, vec![0x06, 0x02, 0x00]);
        assert_eq!(msg.to_string(), "op=0x01 payload=060200");
        assert_eq!(Message::bare(0x22).to_string(), "op=0x22");
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(hex::decode("f0 0a:FF"), Some(vec![0xF0, 0x0A, 0xFF]));
        assert_eq!(hex::decode(""), Some(vec![]));
        assert_eq!(hex::decode("abc"), None);
        assert_eq!(hex::decode("zz"), None);
    }
}
