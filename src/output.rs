use crate::model::{
    ChangeStats, FolderChanges, LastCommitRef, RepoContributorInfo, RepoIdentifierInfo, ResourceInfo, TimeWindow,
};
use crate::window::Window;
use anyhow::Result;
use chrono::{Local, TimeZone};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Absent objects print as `{}`, matching the empty-object sentinel.
fn print_json_or_empty<T: Serialize>(value: Option<&T>) -> Result<()> {
    match value {
        Some(v) => print_json(v),
        None => print_json(&serde_json::json!({})),
    }
}

/// Spinner on stderr; hidden when disabled or not attached to a terminal.
pub fn spinner(message: &'static str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

pub fn line(value: &str) -> Result<()> {
    println!("{value}");
    Ok(())
}

pub fn count(label: &str, value: usize, json: bool) -> Result<()> {
    if json {
        let mut map = serde_json::Map::new();
        map.insert(label.to_string(), value.into());
        return print_json(&map);
    }
    println!("{value}");
    Ok(())
}

pub fn folder_changes(changes: &[FolderChanges], json: bool) -> Result<()> {
    if json {
        return print_json(changes);
    }
    println!(
        "{:<40} {:>12} {:>12} {:>8}",
        style("Folder").bold(),
        style("Insertions").bold(),
        style("Deletions").bold(),
        style("Files").bold()
    );
    println!("{}", "─".repeat(75));
    for c in changes {
        println!(
            "{:<40} {:>12} {:>12} {:>8}",
            c.name,
            style(format!("+{}", c.stats.insertions)).green(),
            style(format!("-{}", c.stats.deletions)).red(),
            c.stats.file_count
        );
    }
    Ok(())
}

pub fn resource_info(info: Option<&ResourceInfo>, json: bool) -> Result<()> {
    if json {
        return print_json_or_empty(info);
    }
    let Some(info) = info else {
        println!("No git identity available");
        return Ok(());
    };
    println!("{:<12} {}", style("Branch").bold(), info.branch);
    println!("{:<12} {}", style("Remote").bold(), info.identifier);
    println!("{:<12} {}", style("Email").bold(), info.email);
    println!("{:<12} {}", style("Tag").bold(), info.tag);
    Ok(())
}

pub fn roster(roster: Option<&RepoContributorInfo>, json: bool) -> Result<()> {
    if json {
        return print_json(&roster);
    }
    let Some(roster) = roster else {
        println!("No contributor data");
        return Ok(());
    };
    println!(
        "{} {} ({} contributors)",
        style(&roster.identifier).bold(),
        style(&roster.branch).dim(),
        roster.count
    );
    println!("{:<32} {}", style("Name").bold(), style("Email").bold());
    println!("{}", "─".repeat(70));
    for m in &roster.members {
        println!("{:<32} {}", m.name, m.email);
    }
    Ok(())
}

pub fn window_stats(window: Window, bounds: TimeWindow, stats: &ChangeStats, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "start": bounds.start,
            "end": bounds.end,
            "stats": stats,
        }));
    }
    let label = match window {
        Window::Today => "Today",
        Window::Yesterday => "Yesterday",
        Window::Week => "This week",
    };
    let since = Local
        .timestamp_opt(bounds.start, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| bounds.start.to_string());
    println!("{} (since {})", style(label).bold(), since);
    println!("  Commits:      {}", stats.commit_count);
    println!("  Files:        {}", stats.file_count);
    println!("  Insertions:   {}", style(format!("+{}", stats.insertions)).green());
    println!("  Deletions:    {}", style(format!("-{}", stats.deletions)).red());
    Ok(())
}

pub fn last_commit(commit: Option<&LastCommitRef>, json: bool) -> Result<()> {
    if json {
        return print_json_or_empty(commit);
    }
    match commit {
        Some(c) => println!("{} {}", style(&c.commit_id).yellow(), c.comment),
        None => println!("No commits found"),
    }
    Ok(())
}

pub fn identifier(info: &RepoIdentifierInfo, json: bool) -> Result<()> {
    if json {
        return print_json(info);
    }
    println!("{:<12} {}", style("Identifier").bold(), info.identifier);
    println!("{:<12} {}", style("Owner").bold(), info.owner_id);
    println!("{:<12} {}", style("Repo").bold(), info.repo_name);
    Ok(())
}
