/// Every user interaction resolves to an Action. The UI never calls git directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Select,
    Cancel,

    // Movement
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    MoveTop,
    MoveBottom,

    // Views and operations
    SwitchView,
    StartFilter,
    StartNewBranch,
    DeleteWorktree,
    Refresh,

    // Text input
    InputChar(char),
    InputBackspace,
    InputDeleteWord,
    CursorLeft,
    CursorRight,
    CursorStart,
    CursorEnd,
}
