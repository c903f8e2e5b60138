use crate::model::RepoIdentifierInfo;
use regex::Regex;
use std::sync::LazyLock;

static GITHUB_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i).*github.com").expect("valid host regex"));

/// Strips protocol, user and scp-style colon from a remote URL.
///
/// `https://github.com/org/repo.git` and `git@github.com:org/repo.git` both
/// become `github.com/org/repo.git`. Already-normalized input is returned as is.
pub fn normalize_repo_identifier(identifier: &str) -> String {
    if identifier.is_empty() {
        return String::new();
    }
    let id = keep_after(identifier, "//");
    let id = keep_after(id, "@");
    id.replacen(':', "/", 1)
}

/// Keeps the tail when `sep` splits `s` into exactly two parts.
fn keep_after<'a>(s: &'a str, sep: &str) -> &'a str {
    let mut parts = s.split(sep);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(tail), None) => tail,
        _ => s,
    }
}

/// Splits a remote URL into its normalized identifier, owner and repo name.
///
/// The owner is only trusted for GitHub hosts; other hosts leave it empty.
pub fn get_repo_identifier_info(identifier: &str) -> RepoIdentifierInfo {
    let identifier = normalize_repo_identifier(identifier);
    if identifier.is_empty() {
        return RepoIdentifierInfo::default();
    }

    let parts: Vec<&str> = identifier.split(['/', '\\']).collect();

    // at least host/owner/repo, so "github.com//x.git" has no owner
    let owner_id = if parts.len() > 2 && GITHUB_HOST.is_match(parts[0]) {
        parts[1].to_string()
    } else {
        String::new()
    };

    let repo_name = if parts.len() > 2 && identifier.contains(".git") {
        identifier
            .rsplit('/')
            .next()
            .and_then(|last| last.split(".git").next())
            .unwrap_or_default()
            .to_string()
    } else {
        String::new()
    };

    RepoIdentifierInfo {
        identifier,
        owner_id,
        repo_name,
    }
}
