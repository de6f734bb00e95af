use serde::Serialize;

/// Slots for custom sounds stored on the speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundType {
    Startup = 0,
    Pairing = 1,
    Connected = 2,
    MaxVolume = 3,
}

pub static ALL_SOUNDS: [SoundType; 4] = [
    SoundType::Startup,
    SoundType::Pairing,
    SoundType::Connected,
    SoundType::MaxVolume,
];

impl SoundType {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Unlike the LED tables there is no fallback slot.
    pub fn from_id(id: u8) -> Option<Self> {
        ALL_SOUNDS.iter().copied().find(|s| s.id() == id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Pairing => "pairing",
            Self::Connected => "connected",
            Self::MaxVolume => "max-volume",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Startup => "Startup",
            Self::Pairing => "Pairing",
            Self::Connected => "Connected",
            Self::MaxVolume => "Max Volume",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Startup => "Played when speaker powers on",
            Self::Pairing => "Played when entering pairing mode",
            Self::Connected => "Played when device connects",
            Self::MaxVolume => "Played at maximum volume warning",
        }
    }
}

impl std::str::FromStr for SoundType {
    type Err = String;

    /// Slot names as printed by `as_str`; `_` is accepted in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        ALL_SOUNDS
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| format!("unknown sound slot '{s}'"))
    }
}

/// Bluetooth audio codecs the speaker may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AudioCodec {
    Sbc,
    Aac,
    Aptx,
    AptxHd,
    Ldac,
}

pub static ALL_CODECS: [AudioCodec; 5] = [
    AudioCodec::Sbc,
    AudioCodec::Aac,
    AudioCodec::Aptx,
    AudioCodec::AptxHd,
    AudioCodec::Ldac,
];

impl AudioCodec {
    fn ident(self) -> &'static str {
        match self {
            Self::Sbc => "SBC",
            Self::Aac => "AAC",
            Self::Aptx => "APTX",
            Self::AptxHd => "APTX_HD",
            Self::Ldac => "LDAC",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sbc => "SBC",
            Self::Aac => "AAC",
            Self::Aptx => "aptX",
            Self::AptxHd => "aptX HD",
            Self::Ldac => "LDAC",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Sbc => "Standard Bluetooth codec",
            Self::Aac => "Apple Audio Codec",
            Self::Aptx => "Qualcomm aptX",
            Self::AptxHd => "Qualcomm aptX HD (24-bit)",
            Self::Ldac => "Sony LDAC (Hi-Res)",
        }
    }

    /// Matches either the display name or the identifier, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_CODECS.iter().copied().find(|c| {
            c.display_name().eq_ignore_ascii_case(name) || c.ident().eq_ignore_ascii_case(name)
        })
    }
}
