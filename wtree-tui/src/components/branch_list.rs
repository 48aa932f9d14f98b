use super::{list_block, list_row, placeholder};
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use wtree_core::{
    git::{Branch, BranchKind},
    state::AppState,
};

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = list_block("Branches", state, theme);

    let lines: Vec<Line> = if state.visible_branches.is_empty() {
        vec![placeholder(empty_message(state), theme)]
    } else {
        state
            .visible_range()
            .map(|idx| {
                let branch = &state.visible_branches[idx];
                list_row(row_spans(branch, state, theme), idx == state.cursor, theme)
            })
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn empty_message(state: &AppState) -> &'static str {
    if state.loading_branches && state.all_branches.is_empty() {
        "Loading branches..."
    } else if state.all_branches.is_empty() {
        "No branches found."
    } else {
        "No branches match filter."
    }
}

fn row_spans<'a>(branch: &'a Branch, state: &AppState, theme: &Theme) -> Vec<Span<'a>> {
    let (label, color) = match branch.kind {
        BranchKind::Local => ("[local] ", theme.success),
        BranchKind::Remote => ("[remote] ", theme.warning),
    };
    let mut spans = vec![
        Span::styled(label, Style::default().fg(color)),
        Span::raw(branch.name.as_str()),
    ];
    if state.is_creating_worktree(branch) {
        spans.push(Span::styled(
            " (creating worktree...)",
            Style::default().fg(theme.warning),
        ));
    }
    spans
}
