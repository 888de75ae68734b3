use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::catalog::CATALOG;
use crate::model::config::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub bar_empty: Color,
    /// Per-catalog-entry colors
    pub catalog_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let catalog_colors = CATALOG
            .iter()
            .filter_map(|e| parse_hex_color(e.display_color).map(|c| (e.id.to_string(), c)))
            .collect();

        Theme {
            background: Color::Rgb(0x0F, 0x17, 0x2A),
            text: Color::Rgb(0xCB, 0xD5, 0xE1),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x3B, 0x82, 0xF6),
            dim: Color::Rgb(0x64, 0x74, 0x8B),
            red: Color::Rgb(0xEF, 0x44, 0x44),
            yellow: Color::Rgb(0xF5, 0x9E, 0x0B),
            green: Color::Rgb(0x22, 0xC5, 0x5E),
            selection_bg: Color::Rgb(0x1E, 0x29, 0x3B),
            bar_empty: Color::Rgb(0x33, 0x41, 0x55),
            catalog_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from workspace UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "green" => theme.green = color,
                    "selection_bg" => theme.selection_bg = color,
                    "bar_empty" => theme.bar_empty = color,
                    _ => {}
                }
            }
        }

        for (id, value) in &ui.catalog_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.catalog_colors.insert(id.clone(), color);
            }
        }

        theme
    }

    /// Color for a catalog entry, falling back to text color
    pub fn catalog_color(&self, catalog_id: Option<&str>) -> Color {
        catalog_id
            .and_then(|id| self.catalog_colors.get(id))
            .copied()
            .unwrap_or(self.text)
    }

    /// Color for a completion percentage
    pub fn progress_color(&self, percentage: u32) -> Color {
        match percentage {
            100 => self.green,
            50..=99 => self.highlight,
            1..=49 => self.yellow,
            _ => self.dim,
        }
    }
}
