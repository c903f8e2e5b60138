use serde::{Deserialize, Serialize};

/// Aggregate of the summary lines found in one or more `--stat` reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStats {
    pub file_count: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub commit_count: u64,
}

impl ChangeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Identity of a checkout. Only built when branch, remote and email are all known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub branch: String,
    pub identifier: String,
    pub email: String,
    pub tag: String,
}

impl ResourceInfo {
    /// Returns `None` unless branch, identifier and email are all non-empty.
    pub fn from_parts(branch: String, identifier: String, email: String, tag: String) -> Option<Self> {
        if branch.is_empty() || identifier.is_empty() || email.is_empty() {
            return None;
        }
        Some(Self {
            branch,
            identifier,
            email,
            tag,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Contributor {
    pub fn new(name: impl Into<String>, email: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            identifier: identifier.into(),
            branch: None,
            tag: None,
        }
    }
}

/// Contributor roster for one repository. `count` tracks `members.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoContributorInfo {
    pub identifier: String,
    pub branch: String,
    pub tag: String,
    pub count: usize,
    pub members: Vec<Contributor>,
}

impl RepoContributorInfo {
    pub fn new(resource: &ResourceInfo, members: Vec<Contributor>) -> Self {
        Self {
            identifier: resource.identifier.clone(),
            branch: resource.branch.clone(),
            tag: resource.tag.clone(),
            count: members.len(),
            members,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoIdentifierInfo {
    pub identifier: String,
    pub owner_id: String,
    pub repo_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastCommitRef {
    pub commit_id: String,
    pub comment: String,
}

/// Unix-second boundaries of a commit query window, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

/// Uncommitted changes of one folder, as listed in the "open changes" panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderChanges {
    pub path: String,
    pub name: String,
    pub stats: ChangeStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_info_requires_branch_identifier_and_email() {
        let full = ResourceInfo::from_parts(
            "main".into(),
            "git@github.com:swdotcom/swdc-atom.git".into(),
            "dev@example.com".into(),
            String::new(),
        );
        assert!(full.is_some());

        for (b, i, e) in [("", "x", "y"), ("x", "", "y"), ("x", "y", "")] {
            assert!(ResourceInfo::from_parts(b.into(), i.into(), e.into(), "heads/main".into()).is_none());
        }
    }

    #[test]
    fn change_stats_serializes_camel_case() {
        let v = serde_json::to_value(ChangeStats {
            file_count: 1,
            insertions: 2,
            deletions: 3,
            commit_count: 4,
        })
        .unwrap();
        assert_eq!(v["fileCount"], 1);
        assert_eq!(v["commitCount"], 4);
    }

    #[test]
    fn roster_count_matches_members() {
        let resource = ResourceInfo::from_parts("main".into(), "url".into(), "a@b.io".into(), "t".into()).unwrap();
        let roster = RepoContributorInfo::new(
            &resource,
            vec![Contributor::new("A", "a@b.io", "url"), Contributor::new("B", "b@b.io", "url")],
        );
        assert_eq!(roster.count, 2);
        assert_eq!(roster.branch, "main");
    }
}
