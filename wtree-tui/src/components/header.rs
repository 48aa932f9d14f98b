use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Tabs},
};
use wtree_core::{constants::APP_NAME, state::AppState};

const TABS: [&str; 2] = ["Worktrees", "Branches"];

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let selected = usize::from(state.mode.shows_branches());
    let tabs = Tabs::new(TABS)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {APP_NAME} "))
                .border_style(Style::default().fg(theme.accent)),
        )
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::render;
    use wtree_core::state::Mode;

    #[test]
    fn test_header_shows_both_tabs() {
        let state = AppState::new();
        let theme = Theme::default();
        let output = render(40, 3, |f| draw(f, f.area(), &state, &theme));
        assert!(output.contains("Worktrees"));
        assert!(output.contains("Branches"));
        assert!(output.contains(APP_NAME));
    }

    #[test]
    fn test_active_tab_follows_mode() {
        let theme = Theme::default();
        for (mode, active, inactive) in [
            (Mode::WorktreeList, "Worktrees", "Branches"),
            (Mode::Filtering, "Branches", "Worktrees"),
        ] {
            let mut state = AppState::new();
            state.mode = mode;
            let backend = ratatui::backend::TestBackend::new(40, 3);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            terminal.draw(|f| draw(f, f.area(), &state, &theme)).unwrap();
            let buffer = terminal.backend().buffer();

            let row: String = (0..40).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
            let column = |label: &str| {
                let byte = row.find(label).unwrap();
                u16::try_from(row[..byte].chars().count()).unwrap()
            };
            let (active_x, inactive_x) = (column(active), column(inactive));
            assert_eq!(buffer[(active_x, 1)].fg, theme.accent, "{mode:?}");
            assert_eq!(buffer[(inactive_x, 1)].fg, theme.muted, "{mode:?}");
        }
    }
}
