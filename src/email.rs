use regex::Regex;
use std::sync::LazyLock;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static NUMBERED_NOREPLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+\+.*users\.noreply").expect("valid noreply regex"));

/// Decides which author emails count as contributor identities.
pub trait EmailNormalizer {
    /// Returns the normalized email, or `None` when `raw` should be dropped.
    /// `strict` rejects anything that is not a plausible personal address.
    fn normalize(&self, raw: &str, strict: bool) -> Option<String>;
}

/// Default policy: GitHub noreply aliases are not identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityEmail;

impl EmailNormalizer for IdentityEmail {
    fn normalize(&self, raw: &str, strict: bool) -> Option<String> {
        let email = raw.trim();
        if email.is_empty() {
            return None;
        }

        if strict {
            let lower = email.to_lowercase();
            if !EMAIL_SHAPE.is_match(email) || lower.ends_with("github.com") || lower.contains("users.noreply") {
                return None;
            }
        } else if NUMBERED_NOREPLY.is_match(email) {
            return None;
        }

        Some(email.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_passes_through_non_emails() {
        let n = IdentityEmail;
        assert_eq!(n.normalize("  dev@example.com ", false).as_deref(), Some("dev@example.com"));
        assert_eq!(n.normalize("root@localhost", false).as_deref(), Some("root@localhost"));
        assert_eq!(n.normalize("not-an-email", false).as_deref(), Some("not-an-email"));
        assert_eq!(n.normalize("   ", false), None);
    }

    #[test]
    fn lenient_drops_numbered_noreply() {
        let n = IdentityEmail;
        assert_eq!(n.normalize("1234567+octo@users.noreply.github.com", false), None);
        assert_eq!(
            n.normalize("octo@users.noreply.github.com", false).as_deref(),
            Some("octo@users.noreply.github.com")
        );
    }

    #[test]
    fn strict_requires_plausible_address() {
        let n = IdentityEmail;
        assert_eq!(n.normalize("dev@example.com", true).as_deref(), Some("dev@example.com"));
        assert_eq!(n.normalize("root@localhost", true), None);
        assert_eq!(n.normalize("not-an-email", true), None);
        assert_eq!(n.normalize("noreply@github.com", true), None);
        assert_eq!(n.normalize("octo@users.noreply.github.com", true), None);
    }
}
