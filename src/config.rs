use crate::cli::CommonArgs;
use crate::error::{CodeTimeError, Result};
use crate::git::{GitCli, GitMetrics, GixProbe};
use crate::email::IdentityEmail;
use crate::submit::HttpSink;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.software.com";

/// Settings resolved once from flags and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub repo: PathBuf,
    pub git_timeout: Duration,
    pub api_url: String,
    pub jwt: Option<String>,
}

impl Config {
    pub fn from_args(common: &CommonArgs) -> Result<Self> {
        let repo = match &common.repo {
            Some(path) => path.clone(),
            None => std::env::current_dir()?,
        };
        if common.git_timeout.is_zero() {
            return Err(CodeTimeError::Config("git timeout must be greater than zero".to_string()));
        }
        Ok(Self {
            repo,
            git_timeout: *common.git_timeout,
            api_url: common.api_url.trim().to_string(),
            jwt: common.jwt.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn metrics(&self) -> GitMetrics {
        GitMetrics::new(GitCli::new(self.git_timeout), GixProbe, IdentityEmail)
    }

    /// Contributor upload target. Only this checks the API url, so commands
    /// that never contact the API ignore a bad one.
    pub fn sink(&self) -> Result<HttpSink> {
        let url = &self.api_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CodeTimeError::Config(format!("API url must be http(s): {url}")));
        }
        Ok(HttpSink::new(url.clone(), self.jwt.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> CommonArgs {
        let mut argv = vec!["codetime-git"];
        argv.extend_from_slice(args);
        argv.push("url");
        Cli::try_parse_from(argv).unwrap().common
    }

    #[test]
    fn defaults() {
        let cfg = Config::from_args(&parse(&["--repo", "/tmp", "--api-url", DEFAULT_API_URL])).unwrap();
        assert_eq!(cfg.repo, PathBuf::from("/tmp"));
        assert_eq!(cfg.git_timeout, Duration::from_secs(15));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn humantime_timeout() {
        let cfg = Config::from_args(&parse(&["--git-timeout", "1m 30s", "--api-url", DEFAULT_API_URL])).unwrap();
        assert_eq!(cfg.git_timeout, Duration::from_secs(90));
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(Config::from_args(&parse(&["--git-timeout", "0s", "--api-url", DEFAULT_API_URL])).is_err());
    }

    #[test]
    fn bad_api_url_only_fails_the_sink() {
        let cfg = Config::from_args(&parse(&["--api-url", "ftp://example.com"])).unwrap();
        assert_eq!(cfg.api_url, "ftp://example.com");
        assert!(matches!(cfg.sink(), Err(CodeTimeError::Config(_))));

        let cfg = Config::from_args(&parse(&["--api-url", " https://api.example.com "])).unwrap();
        assert_eq!(cfg.sink().unwrap().endpoint(), "https://api.example.com/repo/contributors");
    }

    #[test]
    fn blank_jwt_is_ignored() {
        let cfg = Config::from_args(&parse(&["--jwt", " ", "--api-url", DEFAULT_API_URL])).unwrap();
        assert!(cfg.jwt.is_none());
    }
}
