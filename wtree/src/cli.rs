use serde::Serialize;
use std::{io::Write, path::PathBuf};
use wtree_core::{
    WtreeError,
    git::{self, Branch, BranchKind, GitProvider, Worktree},
    operations,
};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
    code: u8,
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> u8 {
        self.code
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        let message = format!("{value:#}");
        match value.downcast_ref::<WtreeError>() {
            Some(e) if e.is_user_error() => Self::user(message),
            _ => Self::system(message),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::system(value.to_string())
    }
}

/// One-shot commands selected by flags. Several may be given at once; they
/// run in field order and stop at the first failure.
#[derive(Debug, Clone, Default)]
pub struct BatchArgs {
    pub list_worktrees: bool,
    pub list_branches: bool,
    pub create_worktree: Option<String>,
    pub delete_worktree: Option<String>,
    pub create_new_branch: Option<String>,
    pub json: bool,
}

impl BatchArgs {
    pub fn is_empty(&self) -> bool {
        !self.list_worktrees
            && !self.list_branches
            && self.create_worktree.is_none()
            && self.delete_worktree.is_none()
            && self.create_new_branch.is_none()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct WorktreeOutput {
    path: PathBuf,
    name: String,
    branch: Option<String>,
    head: String,
}

impl From<&Worktree> for WorktreeOutput {
    fn from(worktree: &Worktree) -> Self {
        Self {
            path: worktree.path.clone(),
            name: worktree.dir_name(),
            branch: worktree.branch.clone(),
            head: worktree.head.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct BranchOutput {
    name: String,
    kind: BranchKind,
    last_commit: i64,
}

impl From<&Branch> for BranchOutput {
    fn from(branch: &Branch) -> Self {
        Self {
            name: branch.name.clone(),
            kind: branch.kind,
            last_commit: branch.last_commit,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct CreatedOutput {
    branch: String,
    path: PathBuf,
    new_branch: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct DeletedOutput {
    path: PathBuf,
}

pub fn run_batch(git: &dyn GitProvider, args: &BatchArgs, out: &mut dyn Write) -> CliResult<()> {
    if args.list_worktrees {
        cmd_list_worktrees(git, args.json, out)?;
    }
    if args.list_branches {
        cmd_list_branches(git, args.json, out)?;
    }
    if let Some(branch) = &args.create_worktree {
        cmd_create_worktree(git, branch, args.json, out)?;
    }
    if let Some(target) = &args.delete_worktree {
        cmd_delete_worktree(git, target, args.json, out)?;
    }
    if let Some(name) = &args.create_new_branch {
        cmd_create_new_branch(git, name, args.json, out)?;
    }
    Ok(())
}

fn cmd_list_worktrees(git: &dyn GitProvider, json: bool, out: &mut dyn Write) -> CliResult<()> {
    let worktrees = git.list_worktrees()?;
    if json {
        let output: Vec<WorktreeOutput> = worktrees.iter().map(WorktreeOutput::from).collect();
        write_json(out, &output)
    } else {
        write!(out, "{}", format_worktree_table(&worktrees))?;
        Ok(())
    }
}

fn cmd_list_branches(git: &dyn GitProvider, json: bool, out: &mut dyn Write) -> CliResult<()> {
    let branches = git::list_branches(git)?;
    if json {
        let output: Vec<BranchOutput> = branches.iter().map(BranchOutput::from).collect();
        write_json(out, &output)
    } else {
        write!(out, "{}", format_branch_table(&branches))?;
        Ok(())
    }
}

fn cmd_create_worktree(
    git: &dyn GitProvider,
    name: &str,
    json: bool,
    out: &mut dyn Write,
) -> CliResult<()> {
    let branches = git::list_branches(git)?;
    let branch = operations::find_branch(&branches, name)?;
    let path = operations::create_worktree_for_branch(git, branch)?;

    if json {
        write_json(
            out,
            &CreatedOutput {
                branch: branch.name.clone(),
                path,
                new_branch: false,
            },
        )
    } else {
        writeln!(
            out,
            "Successfully created worktree for branch '{}' at '{}'",
            branch.name,
            path.display()
        )?;
        Ok(())
    }
}

fn cmd_delete_worktree(
    git: &dyn GitProvider,
    path_or_name: &str,
    json: bool,
    out: &mut dyn Write,
) -> CliResult<()> {
    let worktrees = git.list_worktrees()?;
    let worktree = operations::find_worktree(&worktrees, path_or_name)?;
    operations::delete_worktree(git, worktree)?;

    if json {
        write_json(
            out,
            &DeletedOutput {
                path: worktree.path.clone(),
            },
        )
    } else {
        writeln!(
            out,
            "Successfully deleted worktree at '{}'",
            worktree.path.display()
        )?;
        Ok(())
    }
}

fn cmd_create_new_branch(
    git: &dyn GitProvider,
    name: &str,
    json: bool,
    out: &mut dyn Write,
) -> CliResult<()> {
    let path = operations::create_new_branch_worktree(git, name)?;

    if json {
        write_json(
            out,
            &CreatedOutput {
                branch: name.to_string(),
                path,
                new_branch: true,
            },
        )
    } else {
        writeln!(
            out,
            "Successfully created new branch '{name}' and worktree at '{}'",
            path.display()
        )?;
        Ok(())
    }
}

fn format_worktree_table(worktrees: &[Worktree]) -> String {
    let mut table = String::from("Worktrees:\n");
    for worktree in worktrees {
        table.push_str(&format!(
            "  {} ({})\n",
            worktree.path.display(),
            worktree.branch_label()
        ));
    }
    table
}

fn format_branch_table(branches: &[Branch]) -> String {
    let mut table = String::from("Branches:\n");
    for branch in branches {
        table.push_str(&format!("  [{}] {}\n", branch.kind, branch.name));
    }
    table
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    let json = serde_json::to_string(value).map_err(|e| CliError::system(e.to_string()))?;
    writeln!(out, "{json}")?;
    Ok(())
}

pub fn print_error(error: &CliError, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": error.message() });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {}", error.message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wtree_core::git::{CheckoutTarget, mock::MockGitProvider};

    fn worktree(path: &str, branch: Option<&str>) -> Worktree {
        Worktree {
            path: PathBuf::from(path),
            branch: branch.map(str::to_string),
            head: "abc123".into(),
        }
    }

    fn sample_git(root: &std::path::Path) -> MockGitProvider {
        MockGitProvider {
            worktrees: vec![
                worktree("/src/repo", Some("main")),
                worktree("/src/repo-feat", Some("feat")),
                worktree("/src/repo-tmp", None),
            ],
            local_branches: vec![Branch::local("main", 20), Branch::local("feat", 10)],
            remote_branches: vec![Branch::remote("origin/main", 20)],
            refs: vec!["origin/main".into()],
            repo_root: Some(root.join("repo")),
            ..Default::default()
        }
    }

    fn run(git: &MockGitProvider, args: &BatchArgs) -> (CliResult<()>, String) {
        let mut out = Vec::new();
        let result = run_batch(git, args, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_list_worktrees_table() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, output) = run(
            &git,
            &BatchArgs {
                list_worktrees: true,
                ..Default::default()
            },
        );
        result.unwrap();
        assert_eq!(
            output,
            "Worktrees:\n  /src/repo (main)\n  /src/repo-feat (feat)\n  /src/repo-tmp (detached)\n"
        );
    }

    #[test]
    fn test_list_branches_table() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, output) = run(
            &git,
            &BatchArgs {
                list_branches: true,
                ..Default::default()
            },
        );
        result.unwrap();
        assert_eq!(
            output,
            "Branches:\n  [local] main\n  [local] feat\n  [remote] origin/main\n"
        );
    }

    #[test]
    fn test_list_branches_json() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, output) = run(
            &git,
            &BatchArgs {
                list_branches: true,
                json: true,
                ..Default::default()
            },
        );
        result.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["name"], "main");
        assert_eq!(parsed[0]["kind"], "local");
        assert_eq!(parsed[2]["kind"], "remote");
        assert_eq!(parsed[2]["last_commit"], 20);
    }

    #[test]
    fn test_create_worktree_for_remote_branch() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, output) = run(
            &git,
            &BatchArgs {
                create_worktree: Some("origin/main".into()),
                ..Default::default()
            },
        );
        result.unwrap();
        let expected_path = tmp.path().join("repo-main");
        assert_eq!(
            output,
            format!(
                "Successfully created worktree for branch 'origin/main' at '{}'\n",
                expected_path.display()
            )
        );
        let calls = git.create_worktree_calls.lock().unwrap();
        assert_eq!(
            calls[0].1,
            CheckoutTarget::FromRemote {
                local: "main".into(),
                remote_ref: "origin/main".into()
            }
        );
    }

    #[test]
    fn test_create_worktree_unknown_branch_is_user_error() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, output) = run(
            &git,
            &BatchArgs {
                create_worktree: Some("nope".into()),
                ..Default::default()
            },
        );
        let err = result.unwrap_err();
        assert_eq!(err.code(), 1);
        assert_eq!(err.message(), "branch 'nope' not found");
        assert!(output.is_empty());
        assert!(git.create_worktree_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_delete_by_basename() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, output) = run(
            &git,
            &BatchArgs {
                delete_worktree: Some("repo-feat".into()),
                ..Default::default()
            },
        );
        result.unwrap();
        assert_eq!(output, "Successfully deleted worktree at '/src/repo-feat'\n");
        assert_eq!(
            *git.remove_worktree_calls.lock().unwrap(),
            vec![PathBuf::from("/src/repo-feat")]
        );
    }

    #[test]
    fn test_delete_unknown_worktree_is_user_error() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, _) = run(
            &git,
            &BatchArgs {
                delete_worktree: Some("/elsewhere".into()),
                ..Default::default()
            },
        );
        assert_eq!(result.unwrap_err().code(), 1);
    }

    #[test]
    fn test_git_failure_is_system_error() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        *git.remove_worktree_result.lock().unwrap() = Some(Err(WtreeError::external(
            "git worktree",
            "contains modified or untracked files",
        )
        .into()));
        let (result, _) = run(
            &git,
            &BatchArgs {
                delete_worktree: Some("repo-feat".into()),
                ..Default::default()
            },
        );
        let err = result.unwrap_err();
        assert_eq!(err.code(), 2);
        assert!(err.message().contains("modified or untracked"));
    }

    #[test]
    fn test_create_new_branch() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, output) = run(
            &git,
            &BatchArgs {
                create_new_branch: Some("feat/new".into()),
                json: true,
                ..Default::default()
            },
        );
        result.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["branch"], "feat/new");
        assert_eq!(parsed["new_branch"], true);
        assert_eq!(
            parsed["path"],
            tmp.path().join("repo-feat-new").to_string_lossy().as_ref()
        );
    }

    #[test]
    fn test_invalid_new_branch_name_is_user_error() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, _) = run(
            &git,
            &BatchArgs {
                create_new_branch: Some("has space".into()),
                ..Default::default()
            },
        );
        assert_eq!(result.unwrap_err().code(), 1);
    }

    #[test]
    fn test_commands_run_in_order_and_stop_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let git = sample_git(tmp.path());
        let (result, output) = run(
            &git,
            &BatchArgs {
                list_worktrees: true,
                create_worktree: Some("missing".into()),
                create_new_branch: Some("never".into()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert!(output.starts_with("Worktrees:"));
        assert!(git.verify_ref_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_batch_args_is_empty() {
        assert!(BatchArgs::default().is_empty());
        assert!(
            BatchArgs {
                json: true,
                ..Default::default()
            }
            .is_empty()
        );
        assert!(
            !BatchArgs {
                list_branches: true,
                ..Default::default()
            }
            .is_empty()
        );
    }
}
