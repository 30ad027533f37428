//! Theme colors for boxes and keywords.
//!
//! Both enumerations are closed sets. On disk a color is its hex raw value
//! (`"#5F0F40"`), written and read verbatim; anything else fails to load.
//! Colors also parse from their member name (`"midnightDream"`), which is
//! what the CLI accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Pastel,
    Gold,
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Palette::Pastel => write!(f, "Pastel"),
            Palette::Gold => write!(f, "Gold"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pastel {
    LemonSorbet,
    MorningMist,
    TwilightBlues,
    MangoMousse,
}

impl Pastel {
    pub const ALL: [Pastel; 4] = [
        Pastel::LemonSorbet,
        Pastel::MorningMist,
        Pastel::TwilightBlues,
        Pastel::MangoMousse,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Pastel::LemonSorbet => "#EADFB4",
            Pastel::MorningMist => "#9BB0C1",
            Pastel::TwilightBlues => "#51829B",
            Pastel::MangoMousse => "#F6995C",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Pastel::LemonSorbet => "lemonSorbet",
            Pastel::MorningMist => "morningMist",
            Pastel::TwilightBlues => "twilightBlues",
            Pastel::MangoMousse => "mangoMousse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gold {
    MidnightDream,
    TwilightGlow,
    FlamencoFlame,
    AgateBrown,
}

impl Gold {
    pub const ALL: [Gold; 4] = [
        Gold::MidnightDream,
        Gold::TwilightGlow,
        Gold::FlamencoFlame,
        Gold::AgateBrown,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Gold::MidnightDream => "#5F0F40",
            Gold::TwilightGlow => "#FB8B24",
            Gold::FlamencoFlame => "#E36414",
            Gold::AgateBrown => "#9A031E",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Gold::MidnightDream => "midnightDream",
            Gold::TwilightGlow => "twilightGlow",
            Gold::FlamencoFlame => "flamencoFlame",
            Gold::AgateBrown => "agateBrown",
        }
    }
}

/// Box theme color: one member of one of the two palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BoxColor {
    Pastel(Pastel),
    Gold(Gold),
}

impl Default for BoxColor {
    fn default() -> Self {
        BoxColor::Pastel(Pastel::LemonSorbet)
    }
}

impl BoxColor {
    /// All 8 colors in palette order.
    pub const ALL: [BoxColor; 8] = [
        BoxColor::Pastel(Pastel::LemonSorbet),
        BoxColor::Pastel(Pastel::MorningMist),
        BoxColor::Pastel(Pastel::TwilightBlues),
        BoxColor::Pastel(Pastel::MangoMousse),
        BoxColor::Gold(Gold::MidnightDream),
        BoxColor::Gold(Gold::TwilightGlow),
        BoxColor::Gold(Gold::FlamencoFlame),
        BoxColor::Gold(Gold::AgateBrown),
    ];

    pub fn hex(self) -> &'static str {
        match self {
            BoxColor::Pastel(color) => color.hex(),
            BoxColor::Gold(color) => color.hex(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BoxColor::Pastel(color) => color.name(),
            BoxColor::Gold(color) => color.name(),
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            BoxColor::Pastel(_) => Palette::Pastel,
            BoxColor::Gold(_) => Palette::Gold,
        }
    }

    /// Colors grouped per palette, for pickers.
    pub fn sections() -> Vec<(Palette, Vec<BoxColor>)> {
        vec![
            (
                Palette::Pastel,
                Pastel::ALL.iter().map(|c| BoxColor::Pastel(*c)).collect(),
            ),
            (
                Palette::Gold,
                Gold::ALL.iter().map(|c| BoxColor::Gold(*c)).collect(),
            ),
        ]
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        BoxColor::ALL
            .iter()
            .copied()
            .find(|c| c.hex().eq_ignore_ascii_case(hex))
    }
}

impl fmt::Display for BoxColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl FromStr for BoxColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        BoxColor::from_hex(s)
            .or_else(|| {
                BoxColor::ALL
                    .iter()
                    .copied()
                    .find(|c| c.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| ColorParseError(s.to_string()))
    }
}

impl TryFrom<String> for BoxColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BoxColor::from_hex(&value).ok_or(ColorParseError(value))
    }
}

impl From<BoxColor> for String {
    fn from(color: BoxColor) -> Self {
        color.hex().to_string()
    }
}

/// Keyword tag color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeywordColor {
    #[default]
    RoyalPurple,
    OceanTeal,
    ForestMoss,
    SunsetCoral,
}

impl KeywordColor {
    pub const ALL: [KeywordColor; 4] = [
        KeywordColor::RoyalPurple,
        KeywordColor::OceanTeal,
        KeywordColor::ForestMoss,
        KeywordColor::SunsetCoral,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            KeywordColor::RoyalPurple => "#7B2CBF",
            KeywordColor::OceanTeal => "#0F7173",
            KeywordColor::ForestMoss => "#4F772D",
            KeywordColor::SunsetCoral => "#F25C54",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KeywordColor::RoyalPurple => "royalPurple",
            KeywordColor::OceanTeal => "oceanTeal",
            KeywordColor::ForestMoss => "forestMoss",
            KeywordColor::SunsetCoral => "sunsetCoral",
        }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        KeywordColor::ALL
            .iter()
            .copied()
            .find(|c| c.hex().eq_ignore_ascii_case(hex))
    }
}

impl fmt::Display for KeywordColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl FromStr for KeywordColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        KeywordColor::from_hex(s)
            .or_else(|| {
                KeywordColor::ALL
                    .iter()
                    .copied()
                    .find(|c| c.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| ColorParseError(s.to_string()))
    }
}

impl TryFrom<String> for KeywordColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        KeywordColor::from_hex(&value).ok_or(ColorParseError(value))
    }
}

impl From<KeywordColor> for String {
    fn from(color: KeywordColor) -> Self {
        color.hex().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color '{}'", self.0)
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn box_colors_are_eight_distinct_values() {
        let hexes: HashSet<&str> = BoxColor::ALL.iter().map(|c| c.hex()).collect();
        assert_eq!(hexes.len(), 8);
        let sections = BoxColor::sections();
        assert_eq!(sections.len(), 2);
        assert!(sections.iter().all(|(_, colors)| colors.len() == 4));
    }

    #[test]
    fn box_color_serializes_as_raw_hex() {
        let json = serde_json::to_string(&BoxColor::Gold(Gold::MidnightDream)).unwrap();
        assert_eq!(json, "\"#5F0F40\"");

        let back: BoxColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BoxColor::Gold(Gold::MidnightDream));
        assert_eq!(back.palette(), Palette::Gold);
    }

    #[test]
    fn unknown_hex_is_rejected() {
        assert!(serde_json::from_str::<BoxColor>("\"#000000\"").is_err());
        assert!(serde_json::from_str::<KeywordColor>("\"pink\"").is_err());
    }

    #[test]
    fn colors_parse_from_names_and_hex() {
        assert_eq!(
            "twilightblues".parse::<BoxColor>().unwrap(),
            BoxColor::Pastel(Pastel::TwilightBlues)
        );
        assert_eq!(
            "#e36414".parse::<BoxColor>().unwrap(),
            BoxColor::Gold(Gold::FlamencoFlame)
        );
        assert_eq!(
            "oceanTeal".parse::<KeywordColor>().unwrap(),
            KeywordColor::OceanTeal
        );
        assert!("mauve".parse::<KeywordColor>().is_err());
    }

    #[test]
    fn defaults_match_the_first_members() {
        assert_eq!(BoxColor::default().hex(), "#EADFB4");
        assert_eq!(KeywordColor::default(), KeywordColor::RoyalPurple);
    }
}
