use crate::theme::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};
use wtree_core::{constants::VIEWPORT_CHROME_ROWS, state::AppState};

pub mod branch_list;
pub mod footer;
pub mod header;
pub mod input_bar;
pub mod status_line;
pub mod worktree_list;

const HIGHLIGHT_SYMBOL: &str = "▸ ";
const ROW_PADDING: &str = "  ";

/// Screen regions, top to bottom.
pub struct AppLayout {
    pub header: Rect,
    pub input: Rect,
    pub list: Rect,
    pub status: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Everything except the list body adds up to [`VIEWPORT_CHROME_ROWS`],
    /// so the list shows exactly `AppState::viewport_for_terminal` rows.
    pub fn new(area: Rect) -> Self {
        const HEADER: u16 = 3;
        const INPUT: u16 = 1;
        const STATUS: u16 = 1;
        const FOOTER: u16 = 1;
        const LIST_BORDERS: u16 = 2;
        const _: () = assert!(HEADER + INPUT + STATUS + FOOTER + LIST_BORDERS == VIEWPORT_CHROME_ROWS);

        let chunks = Layout::vertical([
            Constraint::Length(HEADER),
            Constraint::Length(INPUT),
            Constraint::Min(LIST_BORDERS + 1),
            Constraint::Length(STATUS),
            Constraint::Length(FOOTER),
        ])
        .split(area);

        Self {
            header: chunks[0],
            input: chunks[1],
            list: chunks[2],
            status: chunks[3],
            footer: chunks[4],
        }
    }
}

/// Bordered list frame titled with the list name and, when the list
/// overflows, a ` (visible/total)` indicator.
fn list_block<'a>(title: &str, state: &AppState, theme: &Theme) -> Block<'a> {
    let indicator = state
        .scroll_indicator()
        .map(|(visible, total)| format!(" ({visible}/{total})"))
        .unwrap_or_default();
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title}{indicator} "))
        .border_style(Style::default().fg(theme.muted))
}

/// Prefix the row with the cursor marker and paint it when selected.
fn list_row<'a>(spans: Vec<Span<'a>>, selected: bool, theme: &Theme) -> Line<'a> {
    if selected {
        let style = Style::default()
            .bg(theme.accent)
            .fg(theme.highlight_fg)
            .add_modifier(Modifier::BOLD);
        let mut row = vec![Span::raw(HIGHLIGHT_SYMBOL)];
        row.extend(spans.into_iter().map(|span| Span::raw(span.content)));
        Line::from(row).style(style)
    } else {
        let mut row = vec![Span::raw(ROW_PADDING)];
        row.extend(spans);
        Line::from(row)
    }
}

fn placeholder(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("{ROW_PADDING}{text}"),
        Style::default().fg(theme.muted),
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{Frame, Terminal, backend::TestBackend};

    pub fn render(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(draw).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut output = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                output.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            output.push('\n');
        }
        output
    }
}
