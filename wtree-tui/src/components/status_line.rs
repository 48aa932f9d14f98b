use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
};
use wtree_core::state::{AppState, StatusKind};

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(status) = &state.status else {
        return;
    };

    let style = match status.kind {
        StatusKind::Progress => Style::default().fg(theme.warning),
        StatusKind::Success => Style::default().fg(theme.success),
        StatusKind::Error => Style::default()
            .fg(theme.error)
            .add_modifier(Modifier::BOLD),
    };
    let line = Paragraph::new(Span::styled(format!(" {}", status.text), style));
    f.render_widget(line, area);
}
