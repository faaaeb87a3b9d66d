//! Interned 24-bit colors and the legacy named palette.
//!
//! Every [`Color`] with a given RGB value points at the same registry entry,
//! so equality is identity. Entries live for the rest of the process.

use std::{
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    sync::{LazyLock, PoisonError, RwLock},
};

const RGB_MASK: u32 = 0x00ff_ffff;

struct ColorEntry {
    rgb: u32,
}

/// Handle to an interned color.
#[derive(Clone, Copy)]
pub struct Color(&'static ColorEntry);

macro_rules! legacy_palette {
    ($($name:ident = $rgb:literal, [$($alias:literal),+];)+) => {
        mod entries {
            $(pub(super) static $name: super::ColorEntry = super::ColorEntry { rgb: $rgb };)+
        }

        $(pub static $name: Color = Color(&entries::$name);)+

        static LEGACY: &[(&Color, &[&str])] = &[$((&$name, &[$($alias),+])),+];
    };
}

legacy_palette! {
    BLACK = 0x000000, ["black"];
    DARK_BLUE = 0x0000aa, ["dark-blue", "dark_blue"];
    DARK_GREEN = 0x00aa00, ["dark-green", "dark_green"];
    DARK_AQUA = 0x00aaaa, ["dark-aqua", "dark_aqua"];
    DARK_RED = 0xaa0000, ["dark-red", "dark_red"];
    DARK_PURPLE = 0xaa00aa, ["dark-purple", "dark_purple"];
    GOLD = 0xffaa00, ["gold", "dark-yellow", "dark_yellow"];
    GRAY = 0xaaaaaa, ["gray", "grey"];
    DARK_GRAY = 0x555555, ["dark-gray", "dark-grey", "dark_gray", "dark_grey"];
    BLUE = 0x5555ff, ["blue"];
    GREEN = 0x55ff55, ["green"];
    AQUA = 0x55ffff, ["aqua"];
    RED = 0xff5555, ["red"];
    LIGHT_PURPLE = 0xff55ff, ["light-purple", "light_purple"];
    YELLOW = 0xffff55, ["yellow"];
    WHITE = 0xffffff, ["white"];
}

// Seeded with the legacy palette so `Color::rgb(0xff5555)` is `RED`.
static REGISTRY: LazyLock<RwLock<HashMap<u32, &'static ColorEntry>>> = LazyLock::new(|| {
    RwLock::new(
        LEGACY
            .iter()
            .map(|(color, _)| (color.0.rgb, color.0))
            .collect(),
    )
});

impl Color {
    /// Intern `value`. Bits above the low 24 are ignored.
    pub fn rgb(value: u32) -> Color {
        let value = value & RGB_MASK;

        if let Some(entry) = REGISTRY
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&value)
            .copied()
        {
            return Color(entry);
        }

        // Re-check under the write lock: another thread may have won the race.
        let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
        let entry = *registry
            .entry(value)
            .or_insert_with(|| -> &'static ColorEntry {
                Box::leak(Box::new(ColorEntry { rgb: value }))
            });
        Color(entry)
    }

    /// Match a style modifier: `#rrggbb` hex, then bare decimal, then a
    /// legacy name.
    pub fn parse(modifier: &str) -> Option<Color> {
        Self::from_hex(modifier)
            .or_else(|| Self::from_decimal(modifier))
            .or_else(|| Self::named(modifier))
    }

    /// `#` followed by one to six hex digits.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let digits = hex.strip_prefix('#')?;
        if digits.is_empty() || digits.len() > 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Color::rgb)
    }

    /// A bare decimal RGB value no larger than `0xffffff`.
    pub fn from_decimal(decimal: &str) -> Option<Color> {
        if decimal.is_empty() || !decimal.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        decimal
            .parse::<u32>()
            .ok()
            .filter(|v| *v <= RGB_MASK)
            .map(Color::rgb)
    }

    /// Look up a legacy color by name, case-insensitively.
    pub fn named(name: &str) -> Option<Color> {
        let name = name.to_ascii_lowercase();
        LEGACY
            .iter()
            .find(|(_, aliases)| aliases.contains(&name.as_str()))
            .map(|(color, _)| **color)
    }

    #[inline]
    pub fn value(self) -> u32 {
        self.0.rgb
    }

    #[inline]
    pub fn red(self) -> u8 {
        (self.0.rgb >> 16) as u8
    }

    #[inline]
    pub fn green(self) -> u8 {
        (self.0.rgb >> 8) as u8
    }

    #[inline]
    pub fn blue(self) -> u8 {
        self.0.rgb as u8
    }

    /// True when both handles point at the same registry entry.
    #[inline]
    pub fn ptr_eq(a: Color, b: Color) -> bool {
        std::ptr::eq(a.0, b.0)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        Color::ptr_eq(*self, *other)
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.rgb.hash(state);
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0.rgb)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({self})")
    }
}
