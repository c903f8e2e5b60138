use super::probe::{GixProbe, RepoProbe};
use super::query::GitQuery;
use super::runner::{CommandRunner, GitCli};
use crate::contributors::{count_distinct, resolve_contributors, DedupKey};
use crate::email::{EmailNormalizer, IdentityEmail};
use crate::model::{
    ChangeStats, Contributor, LastCommitRef, RepoContributorInfo, ResourceInfo, TimeWindow,
};
use crate::stats::accumulate_stat_changes;
use crate::submit::ContributorSink;
use crate::window::Window;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Git activity queries for Code Time.
///
/// Every operation first asks the probe whether the directory is a
/// repository and returns its empty default without running anything if not.
/// Query failures also degrade to the empty default.
pub struct GitMetrics<R = GitCli, P = GixProbe, E = IdentityEmail> {
    runner: R,
    probe: P,
    emails: E,
}

impl Default for GitMetrics {
    fn default() -> Self {
        Self::new(GitCli::default(), GixProbe, IdentityEmail)
    }
}

impl<R, P, E> GitMetrics<R, P, E>
where
    R: CommandRunner,
    P: RepoProbe,
    E: EmailNormalizer,
{
    pub fn new(runner: R, probe: P, emails: E) -> Self {
        Self { runner, probe, emails }
    }

    pub fn is_repository(&self, dir: &Path) -> bool {
        self.probe.is_repository(dir)
    }

    /// Runs a `--stat` style query and sums its summary lines.
    pub fn get_change_stats(&self, dir: &Path, query: &GitQuery) -> ChangeStats {
        if !self.is_repository(dir) {
            return ChangeStats::new();
        }
        match self.runner.run(query, dir) {
            Some(lines) => accumulate_stat_changes(&lines),
            None => ChangeStats::new(),
        }
    }

    pub fn get_uncommitted_changes(&self, dir: &Path) -> ChangeStats {
        self.get_change_stats(dir, &GitQuery::diff_stat())
    }

    /// Awaitable [`GitMetrics::get_uncommitted_changes`], for querying many
    /// folders on one runtime.
    pub async fn uncommitted_changes(&self, dir: &Path) -> ChangeStats {
        if !self.is_repository(dir) {
            return ChangeStats::new();
        }
        let query = GitQuery::diff_stat();
        match self.runner.run_async(&query, dir).await {
            Some(lines) => accumulate_stat_changes(&lines),
            None => ChangeStats::new(),
        }
    }

    /// Branch, remote, email and tag of the checkout, or `None` if any of
    /// the first three is missing.
    pub fn get_resource_info(&self, dir: &Path) -> Option<ResourceInfo> {
        if !self.is_repository(dir) {
            return None;
        }
        let branch = self.runner.run_line(&GitQuery::current_branch(), dir);
        let identifier = self.runner.run_line(&GitQuery::remote_origin_url(), dir);
        let email = self.runner.run_line(&GitQuery::user_email(), dir);
        let tag = self.runner.run_line(&GitQuery::describe(), dir);

        let info = ResourceInfo::from_parts(branch, identifier, email, tag);
        if info.is_none() {
            debug!(dir = %dir.display(), "incomplete git identity");
        }
        info
    }

    /// Roster of everyone who committed to the repository, de-duplicated on
    /// the email as git printed it.
    ///
    /// `None` means no identity or no history, as opposed to an empty roster.
    pub fn get_repo_users(&self, dir: &Path, filter_out_non_emails: bool) -> Option<RepoContributorInfo> {
        if !self.is_repository(dir) {
            return None;
        }
        let resource = self.get_resource_info(dir)?;
        let lines = self.runner.run(&GitQuery::author_pairs(), dir)?;

        let members = resolve_contributors(
            &lines,
            &self.emails,
            filter_out_non_emails,
            DedupKey::Raw,
            &resource.identifier,
        )?;
        Some(RepoContributorInfo::new(&resource, members))
    }

    pub fn get_repo_contributors(&self, dir: &Path, filter_out_non_emails: bool) -> Vec<Contributor> {
        self.get_repo_users(dir, filter_out_non_emails)
            .map(|roster| roster.members)
            .unwrap_or_default()
    }

    /// Uploads the repository roster. Outcome is logged, never retried.
    pub fn process_repo_contributors<S: ContributorSink + ?Sized>(&self, dir: &Path, sink: &S) -> bool {
        let Some(roster) = self.get_repo_users(dir, false) else {
            debug!(dir = %dir.display(), "no contributor roster to submit");
            return false;
        };
        match sink.submit(&roster) {
            Ok(()) => {
                info!(identifier = %roster.identifier, members = roster.count, "repo contributors updated");
                true
            }
            Err(e) => {
                warn!(identifier = %roster.identifier, error = %e, "failed to submit repo contributors");
                false
            }
        }
    }

    /// Roster for the repository containing `file`, keyed on normalized email.
    ///
    /// `None` if `file` is not inside a repository. A repository without a
    /// usable identity yields an empty roster.
    pub fn get_repo_contributor_info(&self, file: &Path, filter_out_non_emails: bool) -> Option<RepoContributorInfo> {
        let root = self.probe.project_root(file)?;
        if !self.is_repository(&root) {
            return None;
        }

        let Some(resource) = self.get_resource_info(&root) else {
            return Some(RepoContributorInfo::default());
        };

        let members = self
            .runner
            .run(&GitQuery::author_pairs_unique(), &root)
            .and_then(|lines| {
                resolve_contributors(
                    &lines,
                    &self.emails,
                    filter_out_non_emails,
                    DedupKey::Normalized,
                    &resource.identifier,
                )
            })
            .unwrap_or_default();
        Some(RepoContributorInfo::new(&resource, members))
    }

    /// Commit stats for `[window.start, window.end)`. With `use_author`, only
    /// commits by the configured `user.email` count.
    pub fn get_commits_in_range(&self, dir: &Path, window: TimeWindow, use_author: bool) -> ChangeStats {
        if !self.is_repository(dir) {
            return ChangeStats::new();
        }
        let author = if use_author {
            self.get_resource_info(dir).map(|r| r.email)
        } else {
            None
        };
        let query = GitQuery::stat_log(window.start, window.end, author.as_deref());
        self.get_change_stats(dir, &query)
    }

    pub fn get_commits_for(&self, dir: &Path, window: Window, use_author: bool) -> ChangeStats {
        self.get_commits_in_range(dir, window.bounds(), use_author)
    }

    pub fn get_today_commits(&self, dir: &Path, use_author: bool) -> ChangeStats {
        self.get_commits_for(dir, Window::Today, use_author)
    }

    pub fn get_yesterday_commits(&self, dir: &Path, use_author: bool) -> ChangeStats {
        self.get_commits_for(dir, Window::Yesterday, use_author)
    }

    pub fn get_this_week_commits(&self, dir: &Path, use_author: bool) -> ChangeStats {
        self.get_commits_for(dir, Window::Week, use_author)
    }

    /// Most recent commit, optionally restricted to `email`.
    ///
    /// The `%H,%s` line is split at its first comma, so a subject containing
    /// commas is returned whole instead of yielding `None`.
    pub fn get_last_commit(&self, dir: &Path, email: Option<&str>) -> Option<LastCommitRef> {
        if !self.is_repository(dir) {
            return None;
        }
        let lines = self.runner.run(&GitQuery::last_commit(email), dir)?;
        let (commit_id, comment) = lines.first()?.split_once(',')?;
        Some(LastCommitRef {
            commit_id: commit_id.trim().to_string(),
            comment: comment.to_string(),
        })
    }

    pub fn get_repo_config_user_email(&self, dir: &Path) -> String {
        if !self.is_repository(dir) {
            return String::new();
        }
        self.runner.run_line(&GitQuery::global_user_email(), dir)
    }

    /// Remote origin URL without its `.git` suffix.
    pub fn get_repo_url_link(&self, dir: &Path) -> String {
        if !self.is_repository(dir) {
            return String::new();
        }
        let url = self.runner.run_line(&GitQuery::remote_origin_url(), dir);
        match url.strip_suffix(".git") {
            Some(stripped) => stripped.to_string(),
            None => url,
        }
    }

    /// Distinct authors who ever touched `file`.
    pub fn get_file_contributor_count(&self, file: &Path) -> usize {
        // `.git` files are never counted
        if file.extension().is_some_and(|ext| ext == "git") {
            return 0;
        }
        let Some(root) = self.probe.project_root(file) else {
            return 0;
        };
        if !self.is_repository(&root) {
            return 0;
        }
        // git resolves the pathspec against `root`, not the caller's cwd
        let query = GitQuery::file_authors(&path_in_repo(file, &root).to_string_lossy());
        self.runner
            .run(&query, &root)
            .map(|authors| count_distinct(&authors))
            .unwrap_or(0)
    }

    /// Number of tracked files in the repository containing `path`.
    pub fn get_repo_file_count(&self, path: &Path) -> usize {
        let Some(root) = self.probe.project_root(path) else {
            return 0;
        };
        if !self.is_repository(&root) {
            return 0;
        }
        self.runner
            .run(&GitQuery::tracked_files(), &root)
            .map(|files| files.len())
            .unwrap_or(0)
    }
}

/// `file` relative to `root` when it lies inside it, otherwise absolute.
fn path_in_repo(file: &Path, root: &Path) -> PathBuf {
    let absolute = file.canonicalize().unwrap_or_else(|_| match std::env::current_dir() {
        Ok(cwd) if file.is_relative() => cwd.join(file),
        _ => file.to_path_buf(),
    });
    match absolute.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => absolute,
    }
}
