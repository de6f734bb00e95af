use serde::Serialize;

/// Presets stored in the speaker firmware, addressed by index with
/// `SET_EQ_PRESET`. Values are dB offsets for bass, mid and treble.
pub static FIRMWARE_PRESETS: [(&str, [i8; 3]); 12] = [
    ("Flat", [0, 0, 0]),
    ("Bass Boost", [6, 2, 0]),
    ("Treble Boost", [0, 2, 6]),
    ("Vocal", [-2, 4, 2]),
    ("Rock", [4, 0, 4]),
    ("Pop", [2, 3, 4]),
    ("Jazz", [3, 0, 2]),
    ("Classical", [0, 2, 3]),
    ("Electronic", [5, 2, 4]),
    ("Hip Hop", [6, 0, 2]),
    ("Acoustic", [2, 3, 3]),
    ("Loudness", [4, 2, 4]),
];

/// Firmware preset by index.
pub fn firmware_preset(id: u8) -> Option<(&'static str, [i8; 3])> {
    FIRMWARE_PRESETS.get(id as usize).copied()
}

/// App-side tone preset.
///
/// Levels use a 0-100 scale where 50 is neutral; `color` is ARGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EqPreset {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub bass: u8,
    pub mid: u8,
    pub treble: u8,
    pub color: u32,
    pub icon: &'static str,
}

impl EqPreset {
    /// Map the 0-100 levels onto the firmware's signed range,
    /// 50 -> 0 and 0/100 -> -limit/+limit.
    pub fn to_levels(&self, limit: i8) -> [i8; 3] {
        let scale = |v: u8| -> i8 {
            let centered = i32::from(v.min(100)) - 50;
            (centered * i32::from(limit) / 50) as i8
        };
        [scale(self.bass), scale(self.mid), scale(self.treble)]
    }
}

const fn preset(
    id: u8,
    name: &'static str,
    description: &'static str,
    levels: [u8; 3],
    color: u32,
    icon: &'static str,
) -> EqPreset {
    EqPreset {
        id,
        name,
        description,
        bass: levels[0],
        mid: levels[1],
        treble: levels[2],
        color,
        icon,
    }
}

pub const BALANCED: EqPreset = preset(0, "Balanced", "Flat response, true to source", [50, 50, 50], 0xFF00D4FF, "⚖️");

/// Main presets shown to every user.
pub static MAIN_PRESETS: [EqPreset; 6] = [
    BALANCED,
    preset(1, "Deep Bass", "Enhanced low frequencies", [80, 45, 40], 0xFFFF6B35, "🔊"),
    preset(2, "Clear Vocals", "Enhanced clarity for speech and vocals", [35, 70, 55], 0xFF9C27B0, "🎤"),
    preset(3, "Bright & Clear", "Crisp highs, detailed sound", [40, 55, 75], 0xFF00E676, "✨"),
    preset(4, "Punchy", "Tight bass with presence", [70, 60, 55], 0xFFFF5252, "💥"),
    preset(5, "Warm", "Smooth and relaxed sound", [60, 50, 35], 0xFFFFAB40, "☀️"),
];

/// Specialized presets for power users.
pub static EXTENDED_PRESETS: [EqPreset; 6] = [
    preset(6, "Studio", "Reference monitoring profile", [48, 52, 50], 0xFF78909C, "🎚️"),
    preset(7, "Club", "Dance and electronic music", [85, 40, 60], 0xFFE040FB, "🎵"),
    preset(8, "Cinema", "Immersive movie experience", [65, 55, 45], 0xFFFF7043, "🎬"),
    preset(9, "Podcast", "Optimized for spoken content", [30, 75, 50], 0xFF26A69A, "🎙️"),
    preset(10, "Gaming", "Enhanced spatial awareness", [55, 65, 70], 0xFF7C4DFF, "🎮"),
    preset(11, "Late Night", "Reduced bass for quiet listening", [30, 55, 45], 0xFF5C6BC0, "🌙"),
];

/// Main presets first, then extended.
pub fn all_presets() -> impl Iterator<Item = &'static EqPreset> {
    MAIN_PRESETS.iter().chain(EXTENDED_PRESETS.iter())
}

/// Unknown ids fall back to `Balanced`.
pub fn preset_by_id(id: u8) -> &'static EqPreset {
    all_presets().find(|p| p.id == id).unwrap_or(&MAIN_PRESETS[0])
}

pub fn preset_by_name(name: &str) -> Option<&'static EqPreset> {
    all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
}
