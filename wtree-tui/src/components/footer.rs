use crate::{keymap, theme::Theme};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use wtree_core::{config::KeysConfig, state::AppState};

const SEPARATOR: &str = " · ";

/// Key hints for the current mode, built from the active bindings.
pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, keys: &KeysConfig) {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, description)) in keymap::hints(state.mode, keys).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(SEPARATOR, Style::default().fg(theme.muted)));
        }
        spans.push(Span::styled(
            key,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {description}"),
            Style::default().fg(theme.muted),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
