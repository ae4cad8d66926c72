use core::fmt::{Display, Formatter};
use core::str::FromStr;
use ohno::app_err;
use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// An sRGB display color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub Srgb<u8>);

impl Color {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

impl FromStr for Color {
    type Err = ohno::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return Err(app_err!("invalid color '{s}', expected #RRGGBB"));
        }

        Srgb::<u8>::from_str(hex)
            .map(Self)
            .map_err(|e| app_err!("invalid color '{s}': {e}"))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of the label table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelColor {
    pub label: String,
    pub color: Color,
}

/// Colors assigned to label and category names.
#[derive(Debug, Clone, Default)]
pub struct LabelColorMap {
    colors: HashMap<String, Color>,
}

/// Colors handed out to series whose name has no label color.
const FALLBACK_COLORS: [Color; 8] = [
    Color::new(0x63, 0x6e, 0xfa),
    Color::new(0xef, 0x55, 0x3b),
    Color::new(0x00, 0xcc, 0x96),
    Color::new(0xab, 0x63, 0xfa),
    Color::new(0xff, 0xa1, 0x5a),
    Color::new(0x19, 0xd3, 0xf3),
    Color::new(0xff, 0x66, 0x92),
    Color::new(0xb6, 0xe8, 0x80),
];

impl LabelColorMap {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    /// Color for the series at `index` named `name`, falling back to a fixed palette.
    #[must_use]
    pub fn color_or_fallback(&self, name: Option<&str>, index: usize) -> Color {
        name.and_then(|n| self.get(n))
            .unwrap_or(FALLBACK_COLORS[index % FALLBACK_COLORS.len()])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Label names in alphabetical order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.colors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<LabelColor> for LabelColorMap {
    fn from_iter<T: IntoIterator<Item = LabelColor>>(iter: T) -> Self {
        Self {
            colors: iter.into_iter().map(|row| (row.label, row.color)).collect(),
        }
    }
}
