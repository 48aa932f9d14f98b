use crate::{
    constants::{DEFAULT_VIEWPORT_HEIGHT, VIEWPORT_CHROME_ROWS},
    git::{Branch, Worktree},
    viewport,
};
use std::{collections::BTreeSet, ops::Range, path::PathBuf};
use unicode_segmentation::UnicodeSegmentation;

/// Single-line text buffer with a byte cursor kept on grapheme boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

#[derive(Clone, Copy)]
struct GraphemeSpan {
    start: usize,
    end: usize,
    is_whitespace: bool,
}

impl TextInput {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn grapheme_spans(&self) -> Vec<GraphemeSpan> {
        self.text
            .grapheme_indices(true)
            .map(|(start, grapheme)| GraphemeSpan {
                start,
                end: start + grapheme.len(),
                is_whitespace: grapheme.chars().all(char::is_whitespace),
            })
            .collect()
    }

    fn boundaries(&self) -> Vec<usize> {
        let mut boundaries: Vec<usize> = self.text.grapheme_indices(true).map(|(i, _)| i).collect();
        boundaries.push(self.text.len());
        boundaries
    }

    /// Snap the cursor to the nearest boundary at or before it and return
    /// that boundary's index.
    fn snap_cursor(&mut self, boundaries: &[usize]) -> usize {
        let cursor = self.cursor.min(self.text.len());
        let idx = match boundaries.binary_search(&cursor) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        self.cursor = boundaries.get(idx).copied().unwrap_or(0);
        idx
    }

    /// Start of the word before the cursor, skipping trailing whitespace.
    fn prev_word_boundary(&self) -> usize {
        let spans = self.grapheme_spans();
        let mut idx = spans.iter().take_while(|s| s.end <= self.cursor).count();

        while idx > 0 && spans[idx - 1].is_whitespace {
            idx -= 1;
        }
        while idx > 0 && !spans[idx - 1].is_whitespace {
            idx -= 1;
        }
        spans.get(idx).map_or(self.text.len(), |s| s.start).min(self.cursor)
    }

    pub fn insert_char(&mut self, c: char) {
        let boundaries = self.boundaries();
        self.snap_cursor(&boundaries);
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the grapheme before the cursor. Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        let boundaries = self.boundaries();
        let idx = self.snap_cursor(&boundaries);
        if idx == 0 {
            return false;
        }
        let prev = boundaries[idx - 1];
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete_word(&mut self) -> bool {
        let boundaries = self.boundaries();
        self.snap_cursor(&boundaries);
        if self.cursor == 0 {
            return false;
        }
        let start = self.prev_word_boundary();
        self.text.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    pub fn cursor_left(&mut self) {
        let boundaries = self.boundaries();
        let idx = self.snap_cursor(&boundaries);
        if idx > 0 {
            self.cursor = boundaries[idx - 1];
        }
    }

    pub fn cursor_right(&mut self) {
        let boundaries = self.boundaries();
        let idx = self.snap_cursor(&boundaries);
        if let Some(&next) = boundaries.get(idx + 1) {
            self.cursor = next;
        }
    }

    pub fn cursor_start(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.text.len();
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.len(),
        }
    }
}

/// What the user is looking at. Filtering and `CreatingBranch` are sub-modes
/// of the branch view and the only modes with an active text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    WorktreeList,
    BranchList,
    Filtering,
    CreatingBranch,
}

impl Mode {
    pub fn is_text_entry(self) -> bool {
        matches!(self, Self::Filtering | Self::CreatingBranch)
    }

    pub fn shows_branches(self) -> bool {
        !matches!(self, Self::WorktreeList)
    }
}

/// In-flight long-running operations. Each set holds every target that has
/// been dispatched and not yet finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pending {
    /// Branch names
    pub worktree_creation: BTreeSet<String>,
    /// New branch names
    pub branch_creation: BTreeSet<String>,
    /// Worktree paths
    pub worktree_deletion: BTreeSet<PathBuf>,
}

impl Pending {
    pub fn is_idle(&self) -> bool {
        self.worktree_creation.is_empty()
            && self.branch_creation.is_empty()
            && self.worktree_deletion.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Progress,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Everything the UI renders. Owned by the event loop and changed only by
/// [`crate::update::update`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub viewport_height: usize,
    pub worktrees: Vec<Worktree>,
    pub all_branches: Vec<Branch>,
    /// `all_branches` narrowed by the filter; equal to it when the filter is empty
    pub visible_branches: Vec<Branch>,
    pub input: TextInput,
    pub pending: Pending,
    pub status: Option<StatusMessage>,
    /// Bumped on every status change so stale expiry timers can be told apart
    pub status_seq: u64,
    pub loading_worktrees: bool,
    pub loading_branches: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: Mode::WorktreeList,
            cursor: 0,
            scroll_offset: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            worktrees: Vec::new(),
            all_branches: Vec::new(),
            visible_branches: Vec::new(),
            input: TextInput::default(),
            pending: Pending::default(),
            status: None,
            status_seq: 0,
            loading_worktrees: true,
            loading_branches: true,
        }
    }

    /// Rows available for list items in a terminal of `terminal_height` rows.
    pub fn viewport_for_terminal(terminal_height: u16) -> usize {
        usize::from(terminal_height.saturating_sub(VIEWPORT_CHROME_ROWS)).max(1)
    }

    pub fn displayed_len(&self) -> usize {
        if self.mode.shows_branches() {
            self.visible_branches.len()
        } else {
            self.worktrees.len()
        }
    }

    pub fn selected_worktree(&self) -> Option<&Worktree> {
        match self.mode {
            Mode::WorktreeList => self.worktrees.get(self.cursor),
            _ => None,
        }
    }

    pub fn selected_branch(&self) -> Option<&Branch> {
        if self.mode.shows_branches() {
            self.visible_branches.get(self.cursor)
        } else {
            None
        }
    }

    pub fn visible_range(&self) -> Range<usize> {
        viewport::visible_range(self.scroll_offset, self.displayed_len(), self.viewport_height)
    }

    pub fn scroll_indicator(&self) -> Option<(usize, usize)> {
        let len = self.displayed_len();
        viewport::scroll_indicator(&self.visible_range(), len, self.viewport_height)
    }

    /// Move the cursor by `delta`, clamped to the displayed list.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.displayed_len();
        if len == 0 {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
        }
        self.adjust_scroll();
    }

    pub fn move_to(&mut self, index: usize) {
        self.cursor = index.min(self.displayed_len().saturating_sub(1));
        self.adjust_scroll();
    }

    /// Jump to the top of the list.
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Keep the cursor on a valid row after the displayed list changed size.
    pub fn clamp_cursor(&mut self) {
        let len = self.displayed_len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
        self.adjust_scroll();
    }

    pub fn adjust_scroll(&mut self) {
        self.scroll_offset = viewport::adjust_scroll(
            self.cursor,
            self.scroll_offset,
            self.displayed_len(),
            self.viewport_height,
        );
    }

    /// Replace the status line and return its sequence number.
    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) -> u64 {
        self.status_seq += 1;
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
        self.status_seq
    }

    pub fn clear_status(&mut self) {
        self.status_seq += 1;
        self.status = None;
    }

    pub fn is_deleting(&self, worktree: &Worktree) -> bool {
        self.pending.worktree_deletion.contains(&worktree.path)
    }

    pub fn is_creating_worktree(&self, branch: &Branch) -> bool {
        self.pending.worktree_creation.contains(&branch.name)
    }
}
