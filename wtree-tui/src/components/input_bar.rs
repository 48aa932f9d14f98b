use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;
use wtree_core::state::{AppState, Mode, TextInput};

const FILTER_PROMPT: &str = "Filter: ";
const NEW_BRANCH_PROMPT: &str = "New branch name: ";

/// The part of the input buffer shown after the prompt.
#[derive(Debug, PartialEq, Eq)]
struct InputWindow<'a> {
    text: &'a str,
    /// Terminal cursor column, relative to the start of `text`
    cursor_col: u16,
}

impl<'a> InputWindow<'a> {
    /// Scroll `input` horizontally just far enough that its cursor lands
    /// inside `width` columns.
    fn new(input: &'a TextInput, width: u16) -> Self {
        let text = input.as_str();
        let cursor = input.cursor().min(text.len());
        let width = usize::from(width);

        let cells: Vec<(usize, usize)> = text
            .grapheme_indices(true)
            .map(|(i, g)| (i, g.width()))
            .collect();
        let cursor_col: usize = cells
            .iter()
            .take_while(|(i, _)| *i < cursor)
            .map(|(_, w)| w)
            .sum();

        // The cursor may sit past the last grapheme, so it needs a column of its own
        let hidden = cursor_col.saturating_sub(width.saturating_sub(1));
        let mut first = 0;
        let mut skipped = 0;
        while skipped < hidden && first < cells.len() {
            skipped += cells[first].1;
            first += 1;
        }

        let start = cells.get(first).map_or(text.len(), |&(i, _)| i);
        let mut used = 0;
        let end = cells[first..]
            .iter()
            .find_map(|&(i, w)| {
                used += w;
                (used > width).then_some(i)
            })
            .unwrap_or(text.len());

        Self {
            text: &text[start..end],
            cursor_col: u16::try_from(cursor_col.saturating_sub(skipped)).unwrap_or(u16::MAX),
        }
    }
}

fn prompt(mode: Mode) -> Option<&'static str> {
    match mode {
        Mode::Filtering => Some(FILTER_PROMPT),
        Mode::CreatingBranch => Some(NEW_BRANCH_PROMPT),
        Mode::WorktreeList | Mode::BranchList => None,
    }
}

/// Render the prompt and input buffer of a text-entry mode and place the
/// terminal cursor in it. Draws nothing in the list modes.
pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(prompt) = prompt(state.mode) else {
        return;
    };

    let prompt_width = u16::try_from(prompt.width()).unwrap_or(u16::MAX);
    let text_width = area.width.saturating_sub(prompt_width);
    let window = InputWindow::new(&state.input, text_width);

    let line = Line::from(vec![
        Span::styled(
            prompt,
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(window.text),
    ]);
    f.render_widget(Paragraph::new(line), area);

    if text_width > 0 && area.height > 0 {
        let cursor_x = area
            .x
            .saturating_add(prompt_width)
            .saturating_add(window.cursor_col);
        f.set_cursor_position((cursor_x, area.y));
    }
}
