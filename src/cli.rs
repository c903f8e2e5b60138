use crate::config::{Config, DEFAULT_API_URL};
use crate::identifier::get_repo_identifier_info;
use crate::output;
use crate::window::Window;
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codetime-git")]
#[command(about = "Git activity for Code Time: change stats, contributors, and repository identity")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository (defaults to the current directory)")]
    pub repo: Option<PathBuf>,

    #[arg(
        long,
        env = "CODETIME_GIT_TIMEOUT",
        default_value = "15s",
        help = "Timeout for each git invocation (e.g. 500ms, 15s, 1m)"
    )]
    pub git_timeout: humantime::Duration,

    #[arg(long, env = "CODETIME_API_URL", default_value = DEFAULT_API_URL, help = "Code Time API base url")]
    pub api_url: String,

    #[arg(long, env = "CODETIME_JWT", hide_env_values = true, help = "Code Time API token")]
    pub jwt: Option<String>,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Uncommitted insertions and deletions per folder
    Changes {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(help = "Folders to summarize (defaults to --repo)")]
        dirs: Vec<PathBuf>,
    },
    /// Branch, remote, email and tag of the repository
    Info {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Everyone who has committed to the repository
    Contributors {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Drop authors whose email is not a plausible address")]
        strict: bool,
    },
    /// Contributor roster for the repository containing a file
    Roster {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Keep authors with non-email identities")]
        lenient: bool,

        #[arg(help = "File inside the repository")]
        file: PathBuf,
    },
    /// Commit stats for today, yesterday or this week
    Commits {
        #[arg(value_enum, help = "Time window")]
        window: Window,

        #[arg(long, help = "Count commits by every author, not just user.email")]
        all_authors: bool,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Most recent commit id and subject
    LastCommit {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, conflicts_with = "mine", help = "Only commits by this author email")]
        author: Option<String>,

        #[arg(long, help = "Only commits by the repository's user.email")]
        mine: bool,
    },
    /// Normalize a remote url into identifier, owner and repo name
    Identifier {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(help = "Remote url, e.g. git@github.com:org/repo.git")]
        url: String,
    },
    /// Remote origin url without the .git suffix
    Url,
    /// Globally configured user.email
    GlobalEmail,
    /// Number of distinct authors of a file
    FileContributors {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(help = "File to inspect")]
        file: PathBuf,
    },
    /// Number of files tracked by the repository containing a path
    FileCount {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(help = "Path inside the repository (defaults to --repo)")]
        path: Option<PathBuf>,
    },
    /// Upload the contributor roster to the Code Time API
    Submit,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.common.verbose);
        let config = Config::from_args(&self.common).context("Invalid configuration")?;
        let metrics = config.metrics();
        let repo = config.repo.as_path();

        match self.command {
            Commands::Changes { json, dirs } => {
                let dirs = if dirs.is_empty() { vec![config.repo.clone()] } else { dirs };
                crate::changes::exec(&metrics, &dirs, json)
            }
            Commands::Info { json } => output::resource_info(metrics.get_resource_info(repo).as_ref(), json),
            Commands::Contributors { json, strict } => {
                let pb = output::spinner("Reading commit history...", !json);
                let roster = metrics.get_repo_users(repo, strict);
                pb.finish_and_clear();
                output::roster(roster.as_ref(), json)
            }
            Commands::Roster { json, lenient, file } => {
                let pb = output::spinner("Reading commit history...", !json);
                let roster = metrics.get_repo_contributor_info(&file, !lenient);
                pb.finish_and_clear();
                output::roster(roster.as_ref(), json)
            }
            Commands::Commits { window, all_authors, json } => {
                let bounds = window.bounds();
                let stats = metrics.get_commits_in_range(repo, bounds, !all_authors);
                output::window_stats(window, bounds, &stats, json)
            }
            Commands::LastCommit { json, author, mine } => {
                let email = if mine {
                    metrics.get_resource_info(repo).map(|r| r.email)
                } else {
                    author
                };
                output::last_commit(metrics.get_last_commit(repo, email.as_deref()).as_ref(), json)
            }
            Commands::Identifier { json, url } => output::identifier(&get_repo_identifier_info(&url), json),
            Commands::Url => output::line(&metrics.get_repo_url_link(repo)),
            Commands::GlobalEmail => output::line(&metrics.get_repo_config_user_email(repo)),
            Commands::FileContributors { json, file } => {
                output::count("contributors", metrics.get_file_contributor_count(&file), json)
            }
            Commands::FileCount { json, path } => {
                let path = path.unwrap_or_else(|| config.repo.clone());
                output::count("files", metrics.get_repo_file_count(&path), json)
            }
            Commands::Submit => {
                let sink = config.sink()?;
                let pb = output::spinner("Submitting contributors...", true);
                let ok = metrics.process_repo_contributors(repo, &sink);
                pb.finish_and_clear();
                if ok {
                    println!("Repo contributors updated");
                } else {
                    println!("No contributors submitted");
                }
                Ok(())
            }
        }
    }
}
