use crate::device::Rgb;

/// Named colors offered by the LED color pickers, in display order.
pub static COLOR_PRESETS: [(&str, Rgb); 12] = [
    ("Red", Rgb::new(255, 0, 0)),
    ("Orange", Rgb::new(255, 120, 0)),
    ("Amber", Rgb::new(255, 191, 0)),
    ("Yellow", Rgb::new(255, 255, 0)),
    ("Lime", Rgb::new(128, 255, 0)),
    ("Green", Rgb::new(0, 255, 0)),
    ("Teal", Rgb::new(0, 255, 170)),
    ("Cyan", Rgb::new(0, 212, 255)),
    ("Blue", Rgb::new(0, 0, 255)),
    ("Purple", Rgb::new(156, 39, 176)),
    ("Magenta", Rgb::new(255, 0, 255)),
    ("White", Rgb::new(255, 255, 255)),
];

pub fn color_by_name(name: &str) -> Option<Rgb> {
    COLOR_PRESETS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, rgb)| rgb)
}
