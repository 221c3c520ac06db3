use crossterm::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_match_glyph")]
    pub match_glyph: String,
    #[serde(default = "default_mismatch_glyph")]
    pub mismatch_glyph: String,
    #[serde(default = "default_match_color")]
    pub match_color: String,
    #[serde(default = "default_mismatch_color")]
    pub mismatch_color: String,
}

fn default_match_glyph() -> String {
    "▀".to_string()
}
fn default_mismatch_glyph() -> String {
    "≠".to_string()
}
fn default_match_color() -> String {
    "#a6e3a1".to_string()
}
fn default_mismatch_color() -> String {
    "#f38ba8".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            match_glyph: default_match_glyph(),
            mismatch_glyph: default_mismatch_glyph(),
            match_color: default_match_color(),
            mismatch_color: default_mismatch_color(),
        }
    }
}

impl Theme {
    /// Parses `#rrggbb`. Anything else falls back to white.
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb { r, g, b };
            }
        }
        Color::White
    }

    pub fn match_color(&self) -> Color { Self::parse_color(&self.match_color) }
    pub fn mismatch_color(&self) -> Color { Self::parse_color(&self.mismatch_color) }
}
