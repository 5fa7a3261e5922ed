//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::matrix::Cell;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Piece palette and UI colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Piece colours for cell ids 1..=7 (index 0 is id 1).
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Border.
    pub div_line: Color,
    /// Text (score, help).
    pub main_fg: Color,
    /// Titles.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

const CLASSIC_PIECES: [Color; 7] = [
    Color::Rgb(0xFF, 0x0D, 0x72), // T
    Color::Rgb(0x0D, 0xC2, 0xFF), // O
    Color::Rgb(0x0D, 0xFF, 0x72), // L
    Color::Rgb(0xF5, 0x38, 0xFF), // J
    Color::Rgb(0xFF, 0x8E, 0x0D), // I
    Color::Rgb(0xFF, 0xE1, 0x38), // S
    Color::Rgb(0x38, 0x77, 0xFF), // Z
];

const PIECE_KEYS: [&str; 7] = ["piece1", "piece2", "piece3", "piece4", "piece5", "piece6", "piece7"];

impl Theme {
    /// Original arcade palette on black.
    pub fn classic() -> Self {
        Self {
            pieces: CLASSIC_PIECES,
            bg: Color::Rgb(0, 0, 0),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to the classic palette if path is None or the file is missing.
    /// `palette` selects a piece colour variant on top of the file.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map)?;
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::classic();
        t.apply_palette(palette);
        t
    }

    /// Override piece colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.pieces = [
                    Color::Rgb(0xFF, 0x00, 0xFF), // magenta
                    Color::Rgb(0x00, 0xFF, 0xFF), // cyan
                    Color::Rgb(0x00, 0xFF, 0x00), // green
                    Color::Rgb(0x00, 0x88, 0xFF), // blue
                    Color::Rgb(0xFF, 0x88, 0x00), // orange
                    Color::Rgb(0xFF, 0xFF, 0x00), // yellow
                    Color::Rgb(0xFF, 0x00, 0x00), // red
                ];
            }
            crate::Palette::Colorblind => {
                // Okabe-Ito
                self.pieces = [
                    Color::Rgb(0xCC, 0x79, 0xA7),
                    Color::Rgb(0x56, 0xB4, 0xE9),
                    Color::Rgb(0x00, 0x9E, 0x73),
                    Color::Rgb(0x00, 0x72, 0xB2),
                    Color::Rgb(0xE6, 0x9F, 0x00),
                    Color::Rgb(0xF0, 0xE4, 0x42),
                    Color::Rgb(0xD5, 0x5E, 0x00),
                ];
            }
        }
    }

    /// Missing keys keep the classic value; a present but malformed value is an error.
    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let mut theme = Self::classic();
        let get = |key: &str| map.get(key).map(|v| parse_hex(v)).transpose();
        for (slot, key) in theme.pieces.iter_mut().zip(PIECE_KEYS) {
            if let Some(c) = get(key)? {
                *slot = c;
            }
        }
        if let Some(c) = get("bg")? {
            theme.bg = c;
        }
        if let Some(c) = get("div_line")? {
            theme.div_line = c;
        }
        if let Some(c) = get("main_fg")? {
            theme.main_fg = c;
        }
        if let Some(c) = get("title")? {
            theme.title = c;
        }
        Ok(theme)
    }

    /// Colour for a nonzero cell id; id 0 maps to the background.
    #[inline]
    pub fn cell_color(&self, id: Cell) -> Color {
        match id {
            0 => self.bg,
            n => self.pieces[(n as usize - 1) % 7],
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    // from_str_radix would also take a sign.
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match s.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}
