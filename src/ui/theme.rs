//! Theme management and ANSI escape sequence generation.
//!
//! Colors come from a built-in Catppuccin flavour or a custom TOML file. Besides
//! the chrome colors, a theme carries the severity colors used for hotspot
//! classes (critical/high EJI, poor/moderate air) and load errors.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `catppuccin-frappe`: Cool dark theme
//! - `catppuccin-macchiato`: Warm dark theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! accent = "#cba6f7"
//! error_fg = "#f38ba8"
//! critical_fg = "#f38ba8"
//! high_fg = "#fab387"
//! poor_air_fg = "#eba0ac"
//! moderate_air_fg = "#f9e2af"
//! good_fg = "#a6e3a1"
//! ```
//!
//! # Example
//!
//! ```rust
//! use ejiview::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-latte").unwrap();
//! assert_eq!(theme.name, "catppuccin-latte");
//! assert_eq!(Theme::fg("#ff0000"), "\u{1b}[38;2;255;0;0m");
//! ```

use crate::domain::{DashboardError, Result};
use crate::map::Rgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (`"#cdd6f4"`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Cursor row foreground.
    pub selection_fg: String,
    /// Cursor row background.
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, captions and `N/A` cells.
    pub text_dim: String,

    /// Separator lines.
    pub border: String,

    pub search_bar_border: String,
    /// Search match highlight foreground.
    pub match_highlight_fg: String,
    /// Search match highlight background.
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Summary values, active sort column, current page.
    pub accent: String,

    /// Inline load and export errors.
    pub error_fg: String,

    /// EJI percentile above 0.9.
    pub critical_fg: String,
    /// EJI percentile at or below 0.9.
    pub high_fg: String,
    /// Median AQI above 60.
    pub poor_air_fg: String,
    /// Median AQI at or below 60.
    pub moderate_air_fg: String,

    /// Success messages.
    pub good_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name, or `None` if the name is unknown.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Theme` if the file cannot be read or its TOML
    /// does not describe a complete theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| DashboardError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| DashboardError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Converts a hex color to RGB, falling back to white on malformed input.
    fn hex_to_rgb(hex: &str) -> Rgb {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground escape for a hex color.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        Self::fg_rgb(Self::hex_to_rgb(hex))
    }

    /// ANSI 24-bit background escape for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        Self::bg_rgb(Self::hex_to_rgb(hex))
    }

    /// ANSI 24-bit foreground escape for an RGB triple.
    #[must_use]
    pub fn fg_rgb((r, g, b): Rgb) -> String {
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape for an RGB triple, used for colour-scale
    /// swatches.
    #[must_use]
    pub fn bg_rgb((r, g, b): Rgb) -> String {
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    ///
    /// # Panics
    ///
    /// Panics if the embedded theme fails to parse, which the tests rule out.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).expect("built-in catppuccin-mocha theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn every_builtin_theme_parses() {
        for name in ["catppuccin-mocha", "catppuccin-latte", "catppuccin-frappe", "catppuccin-macchiato"] {
            let theme = Theme::from_name(name).unwrap_or_else(|| panic!("{name} failed to parse"));
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn malformed_hex_falls_back_to_white() {
        assert_eq!(Theme::fg("#12"), "\u{1b}[38;2;255;255;255m");
        assert_eq!(Theme::bg("1e1e2e"), "\u{1b}[48;2;30;30;46m");
        assert_eq!(Theme::fg("#ééé"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn custom_theme_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = toml::to_string(&Theme::default()).unwrap().replace("catppuccin-mocha", "custom");
        file.write_all(body.as_bytes()).unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.name, "custom");
    }

    #[test]
    fn incomplete_theme_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name = \"broken\"\n[colors]\nheader_fg = \"#ffffff\"\n").unwrap();
        assert!(matches!(Theme::from_file(file.path()), Err(DashboardError::Theme(_))));
    }
}
