use crate::model::ChangeStats;

/// Folds every `--stat` summary line in `lines` into a [`ChangeStats`].
///
/// A summary line mentions "changed" together with "insertion" or
/// "deletion", e.g. `7 files changed, 137 insertions(+), 55 deletions(-)`.
/// Each one counts as a commit. Per-file listings, commit headers and blank
/// lines are skipped, as are numbers that fail to parse.
pub fn accumulate_stat_changes<I, S>(lines: I) -> ChangeStats
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = ChangeStats::new();

    for line in lines {
        let line = line.as_ref().trim();
        if !is_summary_line(line) {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if let Some(files) = parts.first().and_then(|p| leading_int(p)) {
            stats.file_count = stats.file_count.saturating_add(files);
        }
        stats.commit_count = stats.commit_count.saturating_add(1);

        for (i, part) in parts.iter().enumerate().skip(1) {
            let count = leading_int(parts[i - 1]).filter(|n| *n > 0);
            if part.contains("insertion") {
                stats.insertions = stats.insertions.saturating_add(count.unwrap_or(0));
            } else if part.contains("deletion") {
                stats.deletions = stats.deletions.saturating_add(count.unwrap_or(0));
            }
        }
    }

    stats
}

fn is_summary_line(line: &str) -> bool {
    line.contains("changed") && (line.contains("insertion") || line.contains("deletion"))
}

/// Parses the leading decimal digits of `token`, ignoring anything after them.
fn leading_int(token: &str) -> Option<u64> {
    let end = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    token[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_file_summary() {
        let stats = accumulate_stat_changes(["1 file changed, 20 insertions(+), 2 deletions(-)"]);
        assert_eq!(
            stats,
            ChangeStats {
                file_count: 1,
                insertions: 20,
                deletions: 2,
                commit_count: 1,
            }
        );
    }

    #[test]
    fn multi_file_summary() {
        let stats = accumulate_stat_changes(["7 files changed, 137 insertions(+), 55 deletions(-)"]);
        assert_eq!(
            stats,
            ChangeStats {
                file_count: 7,
                insertions: 137,
                deletions: 55,
                commit_count: 1,
            }
        );
    }

    #[test]
    fn log_output_sums_every_commit_block() {
        let output = [
            "COMMIT:1111111111111111111111111111111111111111,1700000000,2023-11-14T22:13:20+00:00,Add parser",
            "",
            " src/parser.rs | 40 ++++++++++++++++++++++++++++++++++++++++",
            " 1 file changed, 40 insertions(+)",
            "COMMIT:2222222222222222222222222222222222222222,1700000100,2023-11-14T22:15:00+00:00,Trim dead code",
            "",
            " src/lib.rs  | 3 ---",
            " src/old.rs  | 9 ---------",
            " 2 files changed, 12 deletions(-)",
            "COMMIT:3333333333333333333333333333333333333333,1700000200,2023-11-14T22:16:40+00:00,Refactor",
            " 3 files changed, 5 insertions(+), 8 deletions(-)",
        ];
        let stats = accumulate_stat_changes(output);
        assert_eq!(stats.commit_count, 3);
        assert_eq!(stats.file_count, 6);
        assert_eq!(stats.insertions, 45);
        assert_eq!(stats.deletions, 20);
    }

    #[test]
    fn per_file_lines_are_ignored() {
        let stats = accumulate_stat_changes([
            "lib/KpmProviderManager.ts | 22 ++++++++++++++++++++--",
            "README.md | 1 -",
        ]);
        assert!(stats.is_empty());
    }

    #[test]
    fn malformed_numbers_are_skipped() {
        let stats = accumulate_stat_changes(["many files changed, lots insertions(+), 4 deletions(-)"]);
        assert_eq!(stats.commit_count, 1);
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.insertions, 0);
        assert_eq!(stats.deletions, 4);
    }

    #[test]
    fn huge_counts_saturate() {
        let line = "18446744073709551615 files changed, 18446744073709551615 insertions(+), 18446744073709551615 deletions(-)";
        let stats = accumulate_stat_changes([line, line]);
        assert_eq!(stats.commit_count, 2);
        assert_eq!(stats.file_count, u64::MAX);
        assert_eq!(stats.insertions, u64::MAX);
        assert_eq!(stats.deletions, u64::MAX);
    }

    #[test]
    fn empty_input() {
        let none: [&str; 0] = [];
        assert!(accumulate_stat_changes(none).is_empty());
    }

    #[test]
    fn leading_int_behaves_like_prefix_parse() {
        assert_eq!(leading_int("137"), Some(137));
        assert_eq!(leading_int("12abc"), Some(12));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
    }
}
