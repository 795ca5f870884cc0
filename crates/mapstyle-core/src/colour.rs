//! Colours derived from feature identifier codes.
//!
//! Short codes (two-letter ISO codes in particular) are repeated [`CODE_REPEAT`] times before
//! hashing, which spreads them over a wider range of hash values.

use crate::hash::djb2;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// How many times a code is concatenated with itself before hashing.
pub const CODE_REPEAT: usize = 5;

const RED_MASK: i32 = 0xFF0000;
const GREEN_MASK: i32 = 0x00FF00;
const BLUE_MASK: i32 = 0x0000FF;

/// An 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Splits the low 24 bits of a 32-bit value into channels.
    fn from_packed(v: i32) -> Self {
        Self {
            r: ((v & RED_MASK) >> 16) as u8,
            g: ((v & GREEN_MASK) >> 8) as u8,
            b: (v & BLUE_MASK) as u8,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Accepts `#rgb`, `#rrggbb` and `rgb(r,g,b)`.
    fn from_str(s: &str) -> Result<Self> {
        parse_css_rgb(s).ok_or_else(|| Error::InvalidColour {
            value: s.to_string(),
        })
    }
}

fn parse_css_rgb(s: &str) -> Option<Rgb> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        return match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                Some(Rgb::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Rgb::new(r, g, b))
            }
            _ => None,
        };
    }

    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut it = inner.split(',').map(|c| c.trim().parse::<u8>());
    let r = it.next()?.ok()?;
    let g = it.next()?.ok()?;
    let b = it.next()?.ok()?;
    if it.next().is_some() {
        return None;
    }
    Some(Rgb::new(r, g, b))
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A feature colour together with its "opposite", derived from one hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColourPair {
    pub colour: Rgb,
    pub opposite: Rgb,
}

/// The hash input for `code`: the code concatenated [`CODE_REPEAT`] times.
pub fn amplify(code: &str) -> String {
    code.repeat(CODE_REPEAT)
}

/// Hash of the amplified code; both colours are functions of this value only.
pub fn code_hash(code: &str) -> i32 {
    djb2(&amplify(code))
}

pub fn country_colour(code: &str) -> Rgb {
    Rgb::from_packed(code_hash(code))
}

/// Colour drawn against [`country_colour`], e.g. marker outlines.
///
/// The subtraction is applied to the whole hash before each channel is masked out, so only blue
/// is a per-channel `255 - b` inverse. The upper bytes are negated rather than complemented:
/// green comes out as `256 - g` (mod 256), and red as `255 - r`, or `256 - r` when green is 0.
pub fn opposite_country_colour(code: &str) -> Rgb {
    opposite_from_hash(code_hash(code))
}

fn opposite_from_hash(hash: i32) -> Rgb {
    Rgb::from_packed(255i32.wrapping_sub(hash))
}

pub fn colour_pair(code: &str) -> ColourPair {
    let hash = code_hash(code);
    ColourPair {
        colour: Rgb::from_packed(hash),
        opposite: opposite_from_hash(hash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(hash: i32) -> (u8, u8, u8) {
        (
            ((hash & 0xFF0000) >> 16) as u8,
            ((hash & 0x00FF00) >> 8) as u8,
            (hash & 0x0000FF) as u8,
        )
    }

    #[test]
    fn colour_is_channel_split_of_amplified_hash() {
        let h = djb2("USUSUSUSUS");
        let c = country_colour("US");
        assert_eq!((c.r, c.g, c.b), split(h));
    }

    #[test]
    fn repeat_count_is_exactly_five() {
        let c = country_colour("US");
        assert_eq!(amplify("US"), "USUSUSUSUS");
        assert_ne!((c.r, c.g, c.b), split(djb2("USUSUSUS")));
        assert_ne!((c.r, c.g, c.b), split(djb2("USUSUSUSUSUS")));
    }

    #[test]
    fn opposite_follows_whole_hash_subtraction() {
        for code in ["NL", "US", "DK", "", "1234", "Österreich"] {
            let h = code_hash(code);
            let inv = 255i32.wrapping_sub(h);
            let o = opposite_country_colour(code);
            assert_eq!((o.r, o.g, o.b), split(inv), "code {code:?}");
            assert_eq!(o.b, 255 - country_colour(code).b, "code {code:?}");
        }
    }

    #[test]
    fn opposite_is_not_a_per_channel_inverse() {
        for code in ["NL", "US", "GB", "X1", "X2", "X3"] {
            let c = country_colour(code);
            let o = opposite_country_colour(code);
            assert_eq!(o.g, 0u8.wrapping_sub(c.g), "code {code:?}");
            assert_ne!(o.g, 255 - c.g, "code {code:?}");
            let expected_r = if c.g == 0 {
                0u8.wrapping_sub(c.r)
            } else {
                255 - c.r
            };
            assert_eq!(o.r, expected_r, "code {code:?}");
        }
    }

    #[test]
    fn pair_matches_individual_functions() {
        let pair = colour_pair("NL");
        assert_eq!(pair.colour, country_colour("NL"));
        assert_eq!(pair.opposite, opposite_country_colour("NL"));
    }

    #[test]
    fn css_and_hex_formatting() {
        let c = Rgb::new(1, 171, 255);
        assert_eq!(c.to_string(), "rgb(1,171,255)");
        assert_eq!(c.to_hex(), "#01abff");
    }

    #[test]
    fn parses_css_colours() {
        assert_eq!("#d0d0d0".parse::<Rgb>().unwrap(), Rgb::new(208, 208, 208));
        assert_eq!("#2bf".parse::<Rgb>().unwrap(), Rgb::new(0x22, 0xbb, 0xff));
        assert_eq!(
            "rgb(1, 2,3)".parse::<Rgb>().unwrap(),
            Rgb::new(1, 2, 3)
        );
        assert!("rgb(1,2)".parse::<Rgb>().is_err());
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("teal".parse::<Rgb>().is_err());
    }

    #[test]
    fn serializes_as_css_string() {
        let json = serde_json::to_string(&Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(json, "\"rgb(10,20,30)\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(10, 20, 30));
    }
}
