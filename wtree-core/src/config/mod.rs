pub mod keys;

use crate::constants::{APP_NAME, DEFAULT_EDITOR};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub use keys::{Command, KeysConfig};

fn config_dir() -> Option<PathBuf> {
    // Use ~/.config on both Linux and macOS (not ~/Library/Application Support)
    #[cfg(unix)]
    {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config_home.is_empty()
        {
            return Some(PathBuf::from(xdg_config_home).join(APP_NAME));
        }
        dirs::home_dir().map(|home| home.join(".config").join(APP_NAME))
    }
    #[cfg(windows)]
    {
        dirs::config_dir().map(|dir| dir.join(APP_NAME))
    }
}

pub fn default_config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Every section is optional, so an empty file is a valid config.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log file verbosity (`error`, `warn`, `info`, `debug` or `trace`).
    /// Overridden by `--log-level`.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Program used to open a worktree. For example:
    /// ```toml
    /// [editor]
    /// command = "code"
    /// args = ["--new-window"]
    /// ```
    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    /// Key binding configuration.
    /// To unbind an inherited key mapping, assign it to `noop`.
    #[serde(default)]
    pub keys: KeysConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_command")]
    pub command: String,
    /// Extra arguments placed before the worktree path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: Self::default_command(),
            args: Vec::new(),
        }
    }
}

impl EditorConfig {
    fn default_command() -> String {
        DEFAULT_EDITOR.to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// Active tab and selected row background (default: "#7c3aed").
    #[serde(
        default = "ThemeConfig::default_accent",
        deserialize_with = "deserialize_color"
    )]
    pub accent: ThemeColor,
    /// Text on the accent background (default: "white").
    #[serde(
        default = "ThemeConfig::default_highlight_fg",
        deserialize_with = "deserialize_color"
    )]
    pub highlight_fg: ThemeColor,
    /// Footer hints and inactive tabs (default: "#666666").
    #[serde(
        default = "ThemeConfig::default_muted",
        deserialize_with = "deserialize_color"
    )]
    pub muted: ThemeColor,
    /// Success messages, the input prompt and `[local]` labels (default: "#10b981").
    #[serde(
        default = "ThemeConfig::default_success",
        deserialize_with = "deserialize_color"
    )]
    pub success: ThemeColor,
    /// Progress messages and `[remote]` labels (default: "#f59e0b").
    #[serde(
        default = "ThemeConfig::default_warning",
        deserialize_with = "deserialize_color"
    )]
    pub warning: ThemeColor,
    /// Errors and worktrees being deleted (default: "#ef4444").
    #[serde(
        default = "ThemeConfig::default_error",
        deserialize_with = "deserialize_color"
    )]
    pub error: ThemeColor,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent: Self::default_accent(),
            highlight_fg: Self::default_highlight_fg(),
            muted: Self::default_muted(),
            success: Self::default_success(),
            warning: Self::default_warning(),
            error: Self::default_error(),
        }
    }
}

impl ThemeConfig {
    fn default_accent() -> ThemeColor {
        ThemeColor::Rgb(0x7c, 0x3a, 0xed)
    }
    fn default_highlight_fg() -> ThemeColor {
        ThemeColor::Named(NamedColor::White)
    }
    fn default_muted() -> ThemeColor {
        ThemeColor::Rgb(0x66, 0x66, 0x66)
    }
    fn default_success() -> ThemeColor {
        ThemeColor::Rgb(0x10, 0xb9, 0x81)
    }
    fn default_warning() -> ThemeColor {
        ThemeColor::Rgb(0xf5, 0x9e, 0x0b)
    }
    fn default_error() -> ThemeColor {
        ThemeColor::Rgb(0xef, 0x44, 0x44)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeColor {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

impl NamedColor {
    /// All named colours in alphabetical order, as accepted by the config parser.
    pub const fn all() -> &'static [(&'static str, NamedColor)] {
        &[
            ("black", NamedColor::Black),
            ("blue", NamedColor::Blue),
            ("cyan", NamedColor::Cyan),
            ("gray", NamedColor::Gray),
            ("green", NamedColor::Green),
            ("magenta", NamedColor::Magenta),
            ("red", NamedColor::Red),
            ("white", NamedColor::White),
            ("yellow", NamedColor::Yellow),
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Gray => "gray",
        }
    }
}

impl std::fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(n) => f.write_str(n.as_str()),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl Serialize for ThemeColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl ThemeColor {
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return Some(Self::Rgb(channel(0)?, channel(2)?, channel(4)?));
        }
        let lower = s.to_lowercase();
        let lookup = if lower == "grey" { "gray" } else { lower.as_str() };
        NamedColor::all()
            .iter()
            .find(|(name, _)| *name == lookup)
            .map(|(_, color)| Self::Named(*color))
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<ThemeColor, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ThemeColor::parse(&s).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid color '{s}': expected a named color (black, red, green, yellow, blue, magenta, cyan, white, gray/grey) or hex (#rrggbb)"
        ))
    })
}

pub fn load_config_from_str(s: &str) -> Result<Config> {
    let config: Config = toml::from_str(s)?;
    Ok(config)
}

/// Load the config file. An explicit path must exist; a missing default
/// file just means running with defaults.
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    let config_file = match config_override {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => match default_config_file() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };
    let contents = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed to read {}", config_file.display()))?;
    load_config_from_str(&contents)
        .with_context(|| format!("Invalid config file {}", config_file.display()))
}
