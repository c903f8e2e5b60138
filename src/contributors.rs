use crate::email::EmailNormalizer;
use crate::model::Contributor;
use std::collections::HashSet;

/// Which form of the email decides that two records are the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupKey {
    /// The email exactly as git printed it.
    Raw,
    /// The email after normalization.
    Normalized,
}

/// Builds an ordered, de-duplicated roster from `name,email` log lines.
///
/// The first record seen for a key wins; later ones are dropped even if the
/// name differs. Records whose email the normalizer rejects are skipped.
/// Returns `None` when no line has the `name,email` shape at all, which
/// callers treat as "no history" rather than "no contributors".
pub fn resolve_contributors<I, S, E>(
    lines: I,
    normalizer: &E,
    strict: bool,
    key: DedupKey,
    identifier: &str,
) -> Option<Vec<Contributor>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    E: EmailNormalizer + ?Sized,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut members = Vec::new();
    let mut parsed_any = false;

    for line in lines {
        let Some((name, raw_email)) = line.as_ref().split_once(',') else {
            continue;
        };
        parsed_any = true;

        let raw_email = raw_email.trim();
        let Some(email) = normalizer.normalize(raw_email, strict) else {
            continue;
        };

        let dedup = match key {
            DedupKey::Raw => raw_email.to_string(),
            DedupKey::Normalized => email.clone(),
        };
        if seen.insert(dedup) {
            members.push(Contributor::new(name.trim(), email, identifier));
        }
    }

    parsed_any.then_some(members)
}

/// Number of distinct lines, e.g. author names from `git log --pretty=%an`.
pub fn count_distinct<I, S>(lines: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|l| l.as_ref().to_string())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::IdentityEmail;
    use pretty_assertions::assert_eq;

    const REPO: &str = "git@github.com:swdotcom/swdc-atom.git";

    fn names(members: &[Contributor]) -> Vec<(&str, &str)> {
        members.iter().map(|m| (m.name.as_str(), m.email.as_str())).collect()
    }

    #[test]
    fn duplicate_raw_email_keeps_first_name() {
        let lines = ["Jane Doe,jane@example.com", "jane doe,jane@example.com", "Bob,bob@example.com"];
        let members = resolve_contributors(lines, &IdentityEmail, false, DedupKey::Raw, REPO).unwrap();
        assert_eq!(names(&members), [("Jane Doe", "jane@example.com"), ("Bob", "bob@example.com")]);
        assert!(members.iter().all(|m| m.identifier == REPO));
    }

    #[test]
    fn order_of_first_appearance_is_kept() {
        let lines = ["Zed,z@example.com", "Amy,a@example.com", "Zed,z@example.com", "Kim,k@example.com"];
        let members = resolve_contributors(lines, &IdentityEmail, false, DedupKey::Raw, REPO).unwrap();
        assert_eq!(
            names(&members),
            [("Zed", "z@example.com"), ("Amy", "a@example.com"), ("Kim", "k@example.com")]
        );
    }

    #[test]
    fn rejected_emails_are_dropped() {
        let lines = [
            "Bot,1234+bot@users.noreply.github.com",
            "Local,root@localhost",
            "Jane,jane@example.com",
        ];
        let lenient = resolve_contributors(lines, &IdentityEmail, false, DedupKey::Raw, REPO).unwrap();
        assert_eq!(names(&lenient), [("Local", "root@localhost"), ("Jane", "jane@example.com")]);

        let strict = resolve_contributors(lines, &IdentityEmail, true, DedupKey::Raw, REPO).unwrap();
        assert_eq!(names(&strict), [("Jane", "jane@example.com")]);
    }

    #[test]
    fn splits_on_first_comma_only() {
        let members =
            resolve_contributors(["Doe, Jane,jane@example.com"], &IdentityEmail, false, DedupKey::Raw, REPO).unwrap();
        assert_eq!(members[0].name, "Doe");
        assert_eq!(members[0].email, "Jane,jane@example.com");
    }

    #[test]
    fn trailing_whitespace_does_not_split_identity() {
        let lines = ["Jane,jane@example.com", "Jane D,jane@example.com "];
        for key in [DedupKey::Raw, DedupKey::Normalized] {
            let members = resolve_contributors(lines, &IdentityEmail, false, key, REPO).unwrap();
            assert_eq!(members.len(), 1);
        }
    }

    #[test]
    fn no_parseable_records_is_none() {
        assert!(resolve_contributors(["", "garbage"], &IdentityEmail, false, DedupKey::Raw, REPO).is_none());
        let empty: [&str; 0] = [];
        assert!(resolve_contributors(empty, &IdentityEmail, false, DedupKey::Raw, REPO).is_none());
    }

    #[test]
    fn all_filtered_is_an_empty_roster() {
        let members =
            resolve_contributors(["Bot,noreply@github.com"], &IdentityEmail, true, DedupKey::Raw, REPO).unwrap();
        assert!(members.is_empty());
    }

    #[test]
    fn counts_distinct_lines() {
        assert_eq!(count_distinct(["Amy", "Bob", "Amy"]), 2);
        let empty: [&str; 0] = [];
        assert_eq!(count_distinct(empty), 0);
    }
}
