use crate::keyboard::{KeyCode, KeyEvent, KeyModifiers};
use crate::state::Mode;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Commands that can be bound to keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// No-op: explicitly unbinds a key (removes inherited/default binding)
    Noop,

    Quit,
    Select,
    Cancel,

    // Views and operations
    SwitchView,
    StartFilter,
    NewBranch,
    DeleteWorktree,
    Refresh,

    // List movement
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    MoveTop,
    MoveBottom,

    // Text editing
    DeleteBackwardChar,
    DeleteBackwardWord,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorStart,
    MoveCursorEnd,
}

const COMMAND_NAMES: &[(&str, Command)] = &[
    ("noop", Command::Noop),
    ("quit", Command::Quit),
    ("select", Command::Select),
    ("cancel", Command::Cancel),
    ("switch_view", Command::SwitchView),
    ("start_filter", Command::StartFilter),
    ("new_branch", Command::NewBranch),
    ("delete_worktree", Command::DeleteWorktree),
    ("refresh", Command::Refresh),
    ("move_up", Command::MoveUp),
    ("move_down", Command::MoveDown),
    ("page_up", Command::PageUp),
    ("page_down", Command::PageDown),
    ("move_top", Command::MoveTop),
    ("move_bottom", Command::MoveBottom),
    ("delete_backward_char", Command::DeleteBackwardChar),
    ("delete_backward_word", Command::DeleteBackwardWord),
    ("move_cursor_left", Command::MoveCursorLeft),
    ("move_cursor_right", Command::MoveCursorRight),
    ("move_cursor_start", Command::MoveCursorStart),
    ("move_cursor_end", Command::MoveCursorEnd),
];

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s {
            "none" | "unbound" => "noop",
            "confirm" => "select",
            other => other,
        };
        COMMAND_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, command)| command.clone())
            .ok_or_else(|| format!("Unknown command: {s}"))
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = COMMAND_NAMES
            .iter()
            .find(|(_, command)| command == self)
            .map_or("noop", |(n, _)| n);
        f.write_str(name)
    }
}

impl Command {
    /// Short label used in the footer hints
    pub fn description(&self) -> &'static str {
        match self {
            Command::Noop => "unbound",
            Command::Quit => "quit",
            Command::Select => "select",
            Command::Cancel => "cancel",
            Command::SwitchView => "switch view",
            Command::StartFilter => "filter",
            Command::NewBranch => "new branch",
            Command::DeleteWorktree => "delete",
            Command::Refresh => "refresh",
            Command::MoveUp => "up",
            Command::MoveDown => "down",
            Command::PageUp => "page up",
            Command::PageDown => "page down",
            Command::MoveTop => "top",
            Command::MoveBottom => "bottom",
            Command::DeleteBackwardChar => "delete char",
            Command::DeleteBackwardWord => "delete word",
            Command::MoveCursorLeft => "cursor left",
            Command::MoveCursorRight => "cursor right",
            Command::MoveCursorStart => "cursor to start",
            Command::MoveCursorEnd => "cursor to end",
        }
    }
}

/// Key bindings for a specific layer/mode
pub type KeyMap = HashMap<KeyEvent, Command>;

/// Complete key binding configuration, composed from reusable layers.
#[derive(Debug, Clone)]
pub struct KeysConfig {
    pub general: KeyMap,
    pub text_edit: KeyMap,
    pub list_navigation: KeyMap,
    pub worktree_list: KeyMap,
    pub branch_list: KeyMap,
    pub filtering: KeyMap,
    pub creating_branch: KeyMap,
}

/// Intermediate structure for deserializing key bindings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeysConfigRaw {
    #[serde(default)]
    general: HashMap<String, String>,
    #[serde(default)]
    text_edit: HashMap<String, String>,
    #[serde(default)]
    list_navigation: HashMap<String, String>,
    #[serde(default)]
    worktree_list: HashMap<String, String>,
    #[serde(default)]
    branch_list: HashMap<String, String>,
    #[serde(default)]
    filtering: HashMap<String, String>,
    #[serde(default)]
    creating_branch: HashMap<String, String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn bind(map: &mut KeyMap, bindings: &[(KeyEvent, Command)]) {
    for (key, command) in bindings {
        map.insert(*key, command.clone());
    }
}

impl KeysConfig {
    pub fn new() -> Self {
        Self {
            general: Self::default_general(),
            text_edit: Self::default_text_edit(),
            list_navigation: Self::default_list_navigation(),
            worktree_list: Self::default_worktree_list(),
            branch_list: Self::default_branch_list(),
            filtering: Self::default_confirm_cancel(),
            creating_branch: Self::default_confirm_cancel(),
        }
    }

    /// Build the effective keymap for a given app mode using precedence:
    /// general < shared layers < mode-specific
    pub fn keymap_for_mode(&self, mode: Mode) -> KeyMap {
        let mut combined = KeyMap::new();
        Self::apply_layer(&mut combined, &self.general);

        match mode {
            Mode::WorktreeList => {
                Self::apply_layer(&mut combined, &self.list_navigation);
                Self::apply_layer(&mut combined, &self.worktree_list);
            }
            Mode::BranchList => {
                Self::apply_layer(&mut combined, &self.list_navigation);
                Self::apply_layer(&mut combined, &self.branch_list);
            }
            Mode::Filtering => {
                Self::apply_layer(&mut combined, &self.list_navigation);
                Self::apply_layer(&mut combined, &self.text_edit);
                Self::apply_layer(&mut combined, &self.filtering);
            }
            Mode::CreatingBranch => {
                Self::apply_layer(&mut combined, &self.text_edit);
                Self::apply_layer(&mut combined, &self.creating_branch);
            }
        }

        combined
    }

    /// Find the first key bound to a given command in a keymap.
    pub fn find_key(keymap: &KeyMap, command: &Command) -> Option<KeyEvent> {
        // Prefer shorter/simpler key representations
        keymap
            .iter()
            .filter(|(_, cmd)| *cmd == command)
            .map(|(key, _)| *key)
            .min()
    }

    fn apply_layer(base: &mut KeyMap, layer: &KeyMap) {
        for (key, command) in layer {
            if *command == Command::Noop {
                base.remove(key);
            } else {
                base.insert(*key, command.clone());
            }
        }
    }

    fn default_general() -> KeyMap {
        let mut map = KeyMap::new();
        bind(&mut map, &[(KeyEvent::ctrl('c'), Command::Quit)]);
        map
    }

    fn default_text_edit() -> KeyMap {
        let mut map = KeyMap::new();
        bind(
            &mut map,
            &[
                (KeyEvent::plain(KeyCode::Backspace), Command::DeleteBackwardChar),
                (KeyEvent::ctrl('w'), Command::DeleteBackwardWord),
                (
                    KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT),
                    Command::DeleteBackwardWord,
                ),
                (KeyEvent::plain(KeyCode::Left), Command::MoveCursorLeft),
                (KeyEvent::plain(KeyCode::Right), Command::MoveCursorRight),
                (KeyEvent::plain(KeyCode::Home), Command::MoveCursorStart),
                (KeyEvent::ctrl('a'), Command::MoveCursorStart),
                (KeyEvent::plain(KeyCode::End), Command::MoveCursorEnd),
                (KeyEvent::ctrl('e'), Command::MoveCursorEnd),
            ],
        );
        map
    }

    fn default_list_navigation() -> KeyMap {
        let mut map = KeyMap::new();
        bind(
            &mut map,
            &[
                (KeyEvent::plain(KeyCode::Up), Command::MoveUp),
                (KeyEvent::plain(KeyCode::Down), Command::MoveDown),
                (KeyEvent::ctrl('p'), Command::MoveUp),
                (KeyEvent::ctrl('n'), Command::MoveDown),
                (KeyEvent::plain(KeyCode::PageUp), Command::PageUp),
                (KeyEvent::plain(KeyCode::PageDown), Command::PageDown),
                (KeyEvent::plain(KeyCode::Home), Command::MoveTop),
                (KeyEvent::plain(KeyCode::End), Command::MoveBottom),
            ],
        );
        map
    }

    /// Single-letter bindings shared by both list views. Never used in text
    /// modes, where letters are typed into the buffer.
    fn default_list_letters() -> KeyMap {
        let mut map = KeyMap::new();
        bind(
            &mut map,
            &[
                (KeyEvent::char('q'), Command::Quit),
                (KeyEvent::plain(KeyCode::Enter), Command::Select),
                (KeyEvent::plain(KeyCode::Tab), Command::SwitchView),
                (KeyEvent::char('k'), Command::MoveUp),
                (KeyEvent::char('j'), Command::MoveDown),
                (KeyEvent::char('g'), Command::MoveTop),
                (KeyEvent::char('G'), Command::MoveBottom),
                (KeyEvent::char('r'), Command::Refresh),
            ],
        );
        map
    }

    fn default_worktree_list() -> KeyMap {
        let mut map = Self::default_list_letters();
        bind(&mut map, &[(KeyEvent::char('d'), Command::DeleteWorktree)]);
        map
    }

    fn default_branch_list() -> KeyMap {
        let mut map = Self::default_list_letters();
        bind(
            &mut map,
            &[
                (KeyEvent::char('/'), Command::StartFilter),
                (KeyEvent::char('f'), Command::StartFilter),
                (KeyEvent::char('n'), Command::NewBranch),
            ],
        );
        map
    }

    fn default_confirm_cancel() -> KeyMap {
        let mut map = KeyMap::new();
        bind(
            &mut map,
            &[
                (KeyEvent::plain(KeyCode::Enter), Command::Select),
                (KeyEvent::plain(KeyCode::Esc), Command::Cancel),
            ],
        );
        map
    }

    /// Parse a string representation of keybindings into a `KeyMap`
    fn parse_keymap(raw_map: &HashMap<String, String>) -> Result<KeyMap, String> {
        let mut keymap = KeyMap::new();
        for (key_str, command_str) in raw_map {
            let key_event =
                KeyEvent::from_str(key_str).map_err(|e| format!("Invalid key '{key_str}': {e}"))?;
            let command = Command::from_str(command_str)
                .map_err(|e| format!("Invalid command '{command_str}': {e}"))?;
            keymap.insert(key_event, command);
        }
        Ok(keymap)
    }

    /// Merge user configuration with defaults.
    ///
    /// Keep `Noop` values so higher-precedence layers can explicitly unbind inherited mappings.
    fn from_raw(raw: &KeysConfigRaw) -> Result<Self, String> {
        let mut config = Self::default();

        config.general.extend(Self::parse_keymap(&raw.general)?);
        config.text_edit.extend(Self::parse_keymap(&raw.text_edit)?);
        config
            .list_navigation
            .extend(Self::parse_keymap(&raw.list_navigation)?);
        config
            .worktree_list
            .extend(Self::parse_keymap(&raw.worktree_list)?);
        config
            .branch_list
            .extend(Self::parse_keymap(&raw.branch_list)?);
        config.filtering.extend(Self::parse_keymap(&raw.filtering)?);
        config
            .creating_branch
            .extend(Self::parse_keymap(&raw.creating_branch)?);

        Ok(config)
    }
}

impl<'de> Deserialize<'de> for KeysConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = KeysConfigRaw::deserialize(deserializer)?;
        KeysConfig::from_raw(&raw).map_err(serde::de::Error::custom)
    }
}
