use crate::email::EmailNormalizer;
use crate::error::Result;
use crate::git::{CommandRunner, GitMetrics, RepoProbe};
use crate::model::FolderChanges;
use futures::future::join_all;
use std::path::{Path, PathBuf};

pub fn exec(metrics: &GitMetrics, dirs: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let changes = collect_folder_changes(metrics, dirs)?;
    crate::output::folder_changes(&changes, json)
}

/// Uncommitted change stats for each folder, queried concurrently and
/// returned in input order.
pub fn collect_folder_changes<R, P, E>(metrics: &GitMetrics<R, P, E>, dirs: &[PathBuf]) -> Result<Vec<FolderChanges>>
where
    R: CommandRunner,
    P: RepoProbe,
    E: EmailNormalizer,
{
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let stats = runtime.block_on(join_all(dirs.iter().map(|dir| metrics.uncommitted_changes(dir))));

    Ok(dirs
        .iter()
        .zip(stats)
        .map(|(dir, stats)| FolderChanges {
            path: dir.to_string_lossy().to_string(),
            name: folder_name(dir),
            stats,
        })
        .collect())
}

fn folder_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.to_string_lossy().to_string())
}
