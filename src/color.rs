//! Color normalization for paint attributes
//!
//! Every `fill`/`stroke` value is reduced to a canonical RGBA form so that
//! `#f00`, `red` and `rgb(255, 0, 0)` land in the same catalog entry.

use std::fmt;

use palette::{FromColor, Hsl, Srgb};

use crate::error::ColorParseError;

/// A color reduced to 8-bit channels plus a fractional alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgba {
    /// What the literal `none` normalizes to
    pub const TRANSPARENT_WHITE: Rgba = Rgba {
        red: 255,
        green: 255,
        blue: 255,
        alpha: 0.0,
    };

    pub const TRANSPARENT_BLACK: Rgba = Rgba {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0.0,
    };

    pub fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Canonical string used as the catalog key
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha >= 1.0 {
            write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
        } else {
            let alpha = (self.alpha * 1000.0).round() / 1000.0;
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.red, self.green, self.blue, alpha
            )
        }
    }
}

/// Normalize a paint value.
///
/// `none` deliberately maps to transparent white rather than "no paint".
/// Paint servers (`url(#grad)`), `currentColor` and other keywords are not
/// colors and come back as an error for the caller to skip.
pub fn normalize(value: &str) -> Result<Rgba, ColorParseError> {
    let lower = value.trim().to_ascii_lowercase();

    let parsed = match lower.as_str() {
        "none" => Some(Rgba::TRANSPARENT_WHITE),
        "transparent" => Some(Rgba::TRANSPARENT_BLACK),
        s if s.starts_with('#') => parse_hex(&s[1..]),
        s if s.starts_with("rgb") => parse_rgb_function(s),
        s if s.starts_with("hsl") => parse_hsl_function(s),
        s => palette::named::from_str(s).map(|c| Rgba::opaque(c.red, c.green, c.blue)),
    };

    parsed.ok_or_else(|| ColorParseError {
        value: value.to_string(),
    })
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channels: Vec<u8> = match hex.len() {
        3 | 4 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<_>>()?,
        6 | 8 => (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
            .collect::<Option<_>>()?,
        _ => return None,
    };

    Some(Rgba {
        red: channels[0],
        green: channels[1],
        blue: channels[2],
        alpha: channels.get(3).map_or(1.0, |a| f32::from(*a) / 255.0),
    })
}

/// Split `name(a, b, c / d)` into its arguments when `name` is accepted
fn function_args<'a>(s: &'a str, names: &[&str]) -> Option<Vec<&'a str>> {
    let open = s.find('(')?;
    if !names.contains(&s[..open].trim()) {
        return None;
    }
    let inner = s[open + 1..].strip_suffix(')')?;
    Some(
        inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect(),
    )
}

fn parse_rgb_function(s: &str) -> Option<Rgba> {
    let args = function_args(s, &["rgb", "rgba"])?;
    if args.len() != 3 && args.len() != 4 {
        return None;
    }

    let channel = |arg: &str| -> Option<u8> {
        let value = match arg.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? / 100.0 * 255.0,
            None => arg.parse::<f32>().ok()?,
        };
        Some(value.clamp(0.0, 255.0).round() as u8)
    };

    Some(Rgba {
        red: channel(args[0])?,
        green: channel(args[1])?,
        blue: channel(args[2])?,
        alpha: match args.get(3) {
            Some(arg) => parse_alpha(arg)?,
            None => 1.0,
        },
    })
}

fn parse_hsl_function(s: &str) -> Option<Rgba> {
    let args = function_args(s, &["hsl", "hsla"])?;
    if args.len() != 3 && args.len() != 4 {
        return None;
    }

    let hue: f32 = args[0].strip_suffix("deg").unwrap_or(args[0]).parse().ok()?;
    let saturation: f32 = args[1].strip_suffix('%')?.parse().ok()?;
    let lightness: f32 = args[2].strip_suffix('%')?.parse().ok()?;

    let hsl: Hsl = Hsl::new(
        hue,
        (saturation / 100.0).clamp(0.0, 1.0),
        (lightness / 100.0).clamp(0.0, 1.0),
    );
    let rgb = Srgb::<f32>::from_color(hsl).into_format::<u8>();

    Some(Rgba {
        red: rgb.red,
        green: rgb.green,
        blue: rgb.blue,
        alpha: match args.get(3) {
            Some(arg) => parse_alpha(arg)?,
            None => 1.0,
        },
    })
}

fn parse_alpha(arg: &str) -> Option<f32> {
    let value = match arg.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? / 100.0,
        None => arg.parse::<f32>().ok()?,
    };
    Some(value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> String {
        normalize(value).expect("should parse").canonical()
    }

    #[test]
    fn test_none_is_transparent_white() {
        assert_eq!(normalize("none").unwrap(), Rgba::TRANSPARENT_WHITE);
        assert_eq!(key("none"), "rgba(255, 255, 255, 0)");
    }

    #[test]
    fn test_hex_forms_agree() {
        assert_eq!(key("#f00"), "rgb(255, 0, 0)");
        assert_eq!(key("#FF0000"), "rgb(255, 0, 0)");
        assert_eq!(key("#ff000080"), "rgba(255, 0, 0, 0.502)");
        assert_eq!(key("#f008"), "rgba(255, 0, 0, 0.533)");
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(key("red"), "rgb(255, 0, 0)");
        assert_eq!(key("  White "), "rgb(255, 255, 255)");
        assert_eq!(key("steelblue"), "rgb(70, 130, 180)");
    }

    #[test]
    fn test_rgb_functions() {
        assert_eq!(key("rgb(255, 0, 0)"), "rgb(255, 0, 0)");
        assert_eq!(key("rgba(0,0,0,0.5)"), "rgba(0, 0, 0, 0.5)");
        assert_eq!(key("rgb(100%, 0%, 0%)"), "rgb(255, 0, 0)");
        assert_eq!(key("rgb(0 128 0 / 50%)"), "rgba(0, 128, 0, 0.5)");
    }

    #[test]
    fn test_hsl_function() {
        assert_eq!(key("hsl(0, 100%, 50%)"), "rgb(255, 0, 0)");
        assert_eq!(key("hsla(120deg, 100%, 50%, 0.25)"), "rgba(0, 255, 0, 0.25)");
    }

    #[test]
    fn test_non_colors_fail() {
        for value in ["url(#grad)", "currentColor", "inherit", "#ggg", "#12345", "rgb(1, 2)"] {
            let err = normalize(value).unwrap_err();
            assert_eq!(err.value, value);
        }
    }
}
