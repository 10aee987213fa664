use std::{fmt, sync::Arc};

use crate::error::{CanvasError, Result};

pub const REFERENCE_PALETTE: [&str; 15] = [
    "#FFFFFF", "#000000", "#FF0000", "#00FF00", "#0000FF",
    "#FFFF00", "#FF00FF", "#00FFFF", "#FFA500", "#800080",
    "#008000", "#C0C0C0", "#A52A2A", "#FFD700", "#ADFF2F",
];

const ANY_HEX: &str = "any-hex";

/// A validated `#RRGGBB` color, stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(into = "String")]
pub struct Color(Arc<str>);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_hex(input: &str) -> Option<Color> {
        let digits = input.strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Color(format!("#{}", digits.to_ascii_uppercase()).into()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.0.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Palette {
    Fixed(Vec<Color>),
    AnyHex,
}

impl Default for Palette {
    fn default() -> Palette {
        let colors = REFERENCE_PALETTE
            .iter()
            .filter_map(|hex| Color::from_hex(hex))
            .collect();
        Palette::Fixed(colors)
    }
}

impl Palette {
    /// Parses `any-hex` or a comma separated list of `#RRGGBB` colors.
    pub fn parse(input: &str) -> Result<Palette> {
        let input = input.trim();
        if input.eq_ignore_ascii_case(ANY_HEX) {
            return Ok(Palette::AnyHex);
        }
        let mut colors: Vec<Color> = Vec::new();
        for entry in input.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let color = Color::from_hex(entry)
                .ok_or_else(|| CanvasError::InvalidConfig(format!("palette entry {entry:?} is not a #RRGGBB color")))?;
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
        if colors.is_empty() {
            return Err(CanvasError::InvalidConfig("palette is empty".to_string()));
        }
        Ok(Palette::Fixed(colors))
    }

    pub fn validate(&self, input: &str) -> Result<Color> {
        let color = Color::from_hex(input)
            .ok_or_else(|| CanvasError::InvalidInput(format!("{input:?} is not a color")))?;
        match self {
            Palette::AnyHex => Ok(color),
            Palette::Fixed(colors) => colors
                .iter()
                .find(|known| **known == color)
                .cloned()
                .ok_or_else(|| CanvasError::InvalidInput(format!("{color} is not in the palette"))),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Palette::AnyHex => ANY_HEX.to_string(),
            Palette::Fixed(colors) => colors.iter().map(Color::as_str).collect::<Vec<_>>().join(","),
        }
    }
}
