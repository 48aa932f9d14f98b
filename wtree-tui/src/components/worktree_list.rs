use super::{list_block, list_row, placeholder};
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use wtree_core::{git::Worktree, state::AppState};

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = list_block("Worktrees", state, theme);

    let lines: Vec<Line> = if state.worktrees.is_empty() {
        let text = if state.loading_worktrees {
            "Loading worktrees..."
        } else {
            "No worktrees found."
        };
        vec![placeholder(text, theme)]
    } else {
        state
            .visible_range()
            .map(|idx| {
                let worktree = &state.worktrees[idx];
                list_row(row_spans(worktree, state, theme), idx == state.cursor, theme)
            })
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn row_spans<'a>(worktree: &'a Worktree, state: &AppState, theme: &Theme) -> Vec<Span<'a>> {
    if state.is_deleting(worktree) {
        return vec![Span::styled(
            format!("Deleting {}...", worktree.dir_name()),
            Style::default().fg(theme.error),
        )];
    }
    vec![
        Span::raw(worktree.dir_name()),
        Span::styled(
            format!(" ({})", worktree.branch_label()),
            Style::default().fg(theme.muted),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::render;
    use std::path::PathBuf;

    fn worktree(dir: &str, branch: Option<&str>) -> Worktree {
        Worktree {
            path: PathBuf::from(format!("/src/{dir}")),
            branch: branch.map(str::to_string),
            head: "abc".into(),
        }
    }

    fn render_list(state: &AppState, height: u16) -> String {
        let theme = Theme::default();
        render(50, height, |f| draw(f, f.area(), state, &theme))
    }

    #[test]
    fn test_rows_show_directory_and_branch() {
        let mut state = AppState::new();
        state.worktrees = vec![
            worktree("repo", Some("main")),
            worktree("repo-feat", Some("feat/x")),
        ];
        let output = render_list(&state, 6);
        assert!(output.contains("▸ repo (main)"));
        assert!(output.contains("  repo-feat (feat/x)"));
    }

    #[test]
    fn test_detached_worktree() {
        let mut state = AppState::new();
        state.worktrees = vec![worktree("repo-tmp", None)];
        let output = render_list(&state, 4);
        assert!(output.contains("repo-tmp (detached)"));
    }

    #[test]
    fn test_pending_deletion_is_marked() {
        let mut state = AppState::new();
        state.worktrees = vec![
            worktree("repo", Some("main")),
            worktree("repo-old", Some("old")),
        ];
        state.pending.worktree_deletion.insert(PathBuf::from("/src/repo-old"));
        let output = render_list(&state, 6);
        assert!(output.contains("Deleting repo-old..."));
        assert!(!output.contains("repo-old (old)"));
    }

    #[test]
    fn test_every_pending_deletion_is_marked() {
        let mut state = AppState::new();
        state.worktrees = vec![
            worktree("repo", Some("main")),
            worktree("repo-a", Some("a")),
            worktree("repo-b", Some("b")),
        ];
        state.pending.worktree_deletion.insert(PathBuf::from("/src/repo-a"));
        state.pending.worktree_deletion.insert(PathBuf::from("/src/repo-b"));
        let output = render_list(&state, 7);
        assert!(output.contains("Deleting repo-a..."));
        assert!(output.contains("Deleting repo-b..."));
        assert!(output.contains("repo (main)"));
    }

    #[test]
    fn test_empty_states() {
        let mut state = AppState::new();
        assert!(render_list(&state, 4).contains("Loading worktrees..."));

        state.loading_worktrees = false;
        assert!(render_list(&state, 4).contains("No worktrees found."));
    }

    #[test]
    fn test_overflowing_list_shows_indicator_and_window() {
        let mut state = AppState::new();
        state.worktrees = (0..10)
            .map(|i| worktree(&format!("wt-{i}"), Some("b")))
            .collect();
        state.viewport_height = 3;
        state.move_to(5);

        let output = render_list(&state, 5);
        assert!(output.contains("Worktrees (3/10)"));
        assert!(output.contains("▸ wt-5"));
        assert!(output.contains("wt-3"));
        assert!(!output.contains("wt-2 "));
        assert!(!output.contains("wt-6"));
    }
}
