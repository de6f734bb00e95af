use serde::Serialize;

/// Feature toggles packed into the control byte.
///
/// Each bit is independent. `TWS_MASTER` and `TWS_SLAVE` describe one role
/// and must not both be set, but nothing on the wire enforces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ControlByte(pub u8);

impl ControlByte {
    pub const BASS_BOOST: u8 = 0x01;
    pub const BYPASS_DSP: u8 = 0x02;
    pub const CHANNEL_FLIP: u8 = 0x04;
    pub const TWS_MASTER: u8 = 0x08;
    pub const TWS_SLAVE: u8 = 0x10;
    pub const MUTE: u8 = 0x20;

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Return a copy with `flag` set or cleared. Other bits are untouched.
    pub fn with(self, flag: u8, on: bool) -> Self {
        if on {
            Self(self.0 | flag)
        } else {
            Self(self.0 & !flag)
        }
    }

    pub fn bass_boost(self) -> bool {
        self.contains(Self::BASS_BOOST)
    }

    pub fn bypass_dsp(self) -> bool {
        self.contains(Self::BYPASS_DSP)
    }

    pub fn channel_flip(self) -> bool {
        self.contains(Self::CHANNEL_FLIP)
    }

    pub fn tws_master(self) -> bool {
        self.contains(Self::TWS_MASTER)
    }

    pub fn tws_slave(self) -> bool {
        self.contains(Self::TWS_SLAVE)
    }

    pub fn muted(self) -> bool {
        self.contains(Self::MUTE)
    }
}

impl From<u8> for ControlByte {
    fn from(b: u8) -> Self {
        Self(b)
    }
}

impl From<ControlByte> for u8 {
    fn from(c: ControlByte) -> Self {
        c.0
    }
}

/// Named-field builder for a [`ControlByte`]. Everything defaults to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags {
    pub bass_boost: bool,
    pub bypass_dsp: bool,
    pub channel_flip: bool,
    pub tws_master: bool,
    pub tws_slave: bool,
    pub mute: bool,
}

impl ControlFlags {
    pub fn build(&self) -> ControlByte {
        ControlByte::default()
            .with(ControlByte::BASS_BOOST, self.bass_boost)
            .with(ControlByte::BYPASS_DSP, self.bypass_dsp)
            .with(ControlByte::CHANNEL_FLIP, self.channel_flip)
            .with(ControlByte::TWS_MASTER, self.tws_master)
            .with(ControlByte::TWS_SLAVE, self.tws_slave)
            .with(ControlByte::MUTE, self.mute)
    }
}

impl From<ControlByte> for ControlFlags {
    fn from(c: ControlByte) -> Self {
        Self {
            bass_boost: c.bass_boost(),
            bypass_dsp: c.bypass_dsp(),
            channel_flip: c.channel_flip(),
            tws_master: c.tws_master(),
            tws_slave: c.tws_slave(),
            mute: c.muted(),
        }
    }
}
