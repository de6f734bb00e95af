use serde::Serialize;

/// LED effects known to the speaker firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LedEffect {
    SpectrumBars = 0,
    BeatPulse = 1,
    Ripple = 2,
    Fire = 3,
    Plasma = 4,
    MatrixRain = 5,
    VuMeter = 6,
    Starfield = 7,
    Wave = 8,
    Fireworks = 9,
    RainbowWave = 10,
    ParticleBurst = 11,
    Kaleidoscope = 12,
    FrequencySpiral = 13,
    BassReactor = 14,
    MeteorShower = 15,
    Breathing = 16,
    DnaHelix = 17,
    AudioScope = 18,
    BouncingBalls = 19,
    LavaLamp = 20,
    Ambient = 21,
    Off = 255,
}

/// Every effect in firmware id order, `Off` last.
pub static ALL_EFFECTS: [LedEffect; 23] = [
    LedEffect::SpectrumBars,
    LedEffect::BeatPulse,
    LedEffect::Ripple,
    LedEffect::Fire,
    LedEffect::Plasma,
    LedEffect::MatrixRain,
    LedEffect::VuMeter,
    LedEffect::Starfield,
    LedEffect::Wave,
    LedEffect::Fireworks,
    LedEffect::RainbowWave,
    LedEffect::ParticleBurst,
    LedEffect::Kaleidoscope,
    LedEffect::FrequencySpiral,
    LedEffect::BassReactor,
    LedEffect::MeteorShower,
    LedEffect::Breathing,
    LedEffect::DnaHelix,
    LedEffect::AudioScope,
    LedEffect::BouncingBalls,
    LedEffect::LavaLamp,
    LedEffect::Ambient,
    LedEffect::Off,
];

/// Effects offered as one-tap buttons.
pub static QUICK_SELECT: [LedEffect; 6] = [
    LedEffect::SpectrumBars,
    LedEffect::BeatPulse,
    LedEffect::BassReactor,
    LedEffect::RainbowWave,
    LedEffect::Ambient,
    LedEffect::Off,
];

impl LedEffect {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Unknown ids fall back to `SpectrumBars`, the firmware default.
    pub fn from_id(id: u8) -> Self {
        ALL_EFFECTS
            .iter()
            .copied()
            .find(|e| e.id() == id)
            .unwrap_or(Self::SpectrumBars)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::SpectrumBars => "Spectrum Bars",
            Self::BeatPulse => "Beat Pulse",
            Self::Ripple => "Ripple",
            Self::Fire => "Fire",
            Self::Plasma => "Plasma",
            Self::MatrixRain => "Matrix Rain",
            Self::VuMeter => "VU Meter",
            Self::Starfield => "Starfield",
            Self::Wave => "Wave",
            Self::Fireworks => "Fireworks",
            Self::RainbowWave => "Rainbow Wave",
            Self::ParticleBurst => "Particle Burst",
            Self::Kaleidoscope => "Kaleidoscope",
            Self::FrequencySpiral => "Frequency Spiral",
            Self::BassReactor => "Bass Reactor",
            Self::MeteorShower => "Meteor Shower",
            Self::Breathing => "Breathing",
            Self::DnaHelix => "DNA Helix",
            Self::AudioScope => "Audio Scope",
            Self::BouncingBalls => "Bouncing Balls",
            Self::LavaLamp => "Lava Lamp",
            Self::Ambient => "Ambient",
            Self::Off => "Off",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::SpectrumBars => "📊",
            Self::BeatPulse => "💓",
            Self::Ripple => "🌊",
            Self::Fire => "🔥",
            Self::Plasma => "🟣",
            Self::MatrixRain => "💚",
            Self::VuMeter => "📶",
            Self::Starfield => "⭐",
            Self::Wave => "〰️",
            Self::Fireworks => "🎆",
            Self::RainbowWave => "🌈",
            Self::ParticleBurst => "💥",
            Self::Kaleidoscope => "🔮",
            Self::FrequencySpiral => "🌀",
            Self::BassReactor => "🎵",
            Self::MeteorShower => "☄️",
            Self::Breathing => "💨",
            Self::DnaHelix => "🧬",
            Self::AudioScope => "📈",
            Self::BouncingBalls => "⚽",
            Self::LavaLamp => "🫧",
            Self::Ambient => "✨",
            Self::Off => "⭕",
        }
    }

    /// Selectable effects, i.e. everything but `Off`.
    pub fn user_effects() -> impl Iterator<Item = LedEffect> {
        ALL_EFFECTS.iter().copied().filter(|e| *e != Self::Off)
    }

    /// Every animated effect honours the speed setting.
    pub fn has_speed_control(self) -> bool {
        self != Self::Off
    }

    /// Only Ambient uses the two colors and the gradient.
    pub fn has_color_controls(self) -> bool {
        self == Self::Ambient
    }
}

/// Gradient layouts for the Ambient effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GradientType {
    None = 0,
    LinearH = 1,
    LinearV = 2,
    Radial = 3,
    Diagonal = 4,
}

impl GradientType {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Unknown ids fall back to `None`.
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => Self::LinearH,
            2 => Self::LinearV,
            3 => Self::Radial,
            4 => Self::Diagonal,
            _ => Self::None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::LinearH => "Horizontal",
            Self::LinearV => "Vertical",
            Self::Radial => "Radial",
            Self::Diagonal => "Diagonal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_lookup() {
        assert_eq!(LedEffect::from_id(21), LedEffect::Ambient);
        assert_eq!(LedEffect::from_id(255), LedEffect::Off);
        assert_eq!(LedEffect::from_id(14).display_name(), "Bass Reactor");
    }

    #[test]
    fn test_unknown_effect_falls_back() {
        assert_eq!(LedEffect::from_id(22), LedEffect::SpectrumBars);
        assert_eq!(LedEffect::from_id(200), LedEffect::SpectrumBars);
    }

    #[test]
    fn test_user_effects_exclude_off() {
        let effects: Vec<_> = LedEffect::user_effects().collect();
        assert_eq!(effects.len(), 22);
        assert!(!effects.contains(&LedEffect::Off));
        assert!(QUICK_SELECT.contains(&LedEffect::Off));
    }

    #[test]
    fn test_controls() {
        assert!(LedEffect::Ambient.has_color_controls());
        assert!(!LedEffect::Fire.has_color_controls());
        assert!(LedEffect::Fire.has_speed_control());
        assert!(!LedEffect::Off.has_speed_control());
    }

    #[test]
    fn test_gradient_lookup() {
        assert_eq!(GradientType::from_id(3), GradientType::Radial);
        assert_eq!(GradientType::from_id(9), GradientType::None);
        assert_eq!(GradientType::LinearV.display_name(), "Vertical");
    }
}
