use ratatui::style::Color;
use wtree_core::config::{NamedColor, ThemeColor, ThemeConfig};

pub struct Theme {
    pub accent: Color,
    pub highlight_fg: Color,
    pub muted: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            accent: to_ratatui_color(&config.accent),
            highlight_fg: to_ratatui_color(&config.highlight_fg),
            muted: to_ratatui_color(&config.muted),
            success: to_ratatui_color(&config.success),
            warning: to_ratatui_color(&config.warning),
            error: to_ratatui_color(&config.error),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn to_ratatui_color(color: &ThemeColor) -> Color {
    match color {
        ThemeColor::Rgb(r, g, b) => Color::Rgb(*r, *g, *b),
        ThemeColor::Named(named) => match named {
            NamedColor::Black => Color::Black,
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Cyan => Color::Cyan,
            NamedColor::White => Color::White,
            NamedColor::Gray => Color::Gray,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_defaults() {
        let theme = Theme::from_config(&ThemeConfig::default());
        assert_eq!(theme.accent, Color::Rgb(0x7c, 0x3a, 0xed));
        assert_eq!(theme.highlight_fg, Color::White);
        assert_eq!(theme.muted, Color::Rgb(0x66, 0x66, 0x66));
        assert_eq!(theme.success, Color::Rgb(0x10, 0xb9, 0x81));
        assert_eq!(theme.warning, Color::Rgb(0xf5, 0x9e, 0x0b));
        assert_eq!(theme.error, Color::Rgb(0xef, 0x44, 0x44));
    }

    #[test]
    fn test_theme_custom() {
        let config = ThemeConfig {
            accent: ThemeColor::Named(NamedColor::Blue),
            error: ThemeColor::Named(NamedColor::Magenta),
            highlight_fg: ThemeColor::Rgb(1, 2, 3),
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Blue);
        assert_eq!(theme.error, Color::Magenta);
        assert_eq!(theme.highlight_fg, Color::Rgb(1, 2, 3));
        assert_eq!(theme.success, Color::Rgb(0x10, 0xb9, 0x81));
    }
}
