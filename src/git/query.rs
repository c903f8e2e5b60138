use std::fmt;

/// In-process replacement for the `| sort`, `| sort | uniq` and `| sort -u`
/// shell stages that follow some queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    None,
    Sort,
    SortUnique,
}

impl Pipeline {
    pub fn apply(self, mut lines: Vec<String>) -> Vec<String> {
        match self {
            Pipeline::None => {}
            Pipeline::Sort => lines.sort(),
            Pipeline::SortUnique => {
                lines.sort();
                lines.dedup();
            }
        }
        lines
    }
}

/// One invocation of the `git` binary.
///
/// Runs without a shell. `Display` renders the equivalent shell command line,
/// quotes and pipes included, for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitQuery {
    args: Vec<String>,
    pipeline: Pipeline,
    unique_flag: bool,
}

impl GitQuery {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            pipeline: Pipeline::None,
            unique_flag: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn author(self, email: Option<&str>) -> Self {
        match email {
            Some(email) if !email.is_empty() => self.arg(format!("--author={email}")),
            _ => self,
        }
    }

    fn piped(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    pub fn diff_stat() -> Self {
        Self::new(["diff", "--stat"])
    }

    pub fn current_branch() -> Self {
        Self::new(["symbolic-ref", "--short", "HEAD"])
    }

    pub fn remote_origin_url() -> Self {
        Self::new(["config", "--get", "remote.origin.url"])
    }

    pub fn user_email() -> Self {
        Self::new(["config", "user.email"])
    }

    pub fn global_user_email() -> Self {
        Self::new(["config", "--get", "--global", "user.email"])
    }

    pub fn describe() -> Self {
        Self::new(["describe", "--all"])
    }

    /// Every commit's `name,email`, sorted. `uniq` is skipped on Windows,
    /// callers de-duplicate regardless.
    pub fn author_pairs() -> Self {
        let pipeline = if cfg!(windows) {
            Pipeline::Sort
        } else {
            Pipeline::SortUnique
        };
        Self::new(["log", "--pretty=%an,%ae"]).piped(pipeline)
    }

    /// Same pairs as [`GitQuery::author_pairs`], via `sort -u`.
    pub fn author_pairs_unique() -> Self {
        let mut query = Self::new(["log", "--format=%an,%ae"]).piped(Pipeline::SortUnique);
        query.unique_flag = true;
        query
    }

    pub fn stat_log(since: i64, until: i64, author: Option<&str>) -> Self {
        Self::new(["log", "--stat", "--pretty=COMMIT:%H,%ct,%cI,%s"])
            .arg(format!("--since={since}"))
            .arg(format!("--until={until}"))
            .author(author)
    }

    pub fn last_commit(author: Option<&str>) -> Self {
        Self::new(["log", "--pretty=%H,%s"]).author(author).arg("--max-count=1")
    }

    pub fn file_authors(file: &str) -> Self {
        Self::new(["log", "--pretty=%an"]).arg(file)
    }

    pub fn tracked_files() -> Self {
        Self::new(["ls-files"])
    }
}

fn render_arg(arg: &str) -> String {
    match arg.split_once('=') {
        Some(("--format", value)) if value.contains('%') => format!("--format='{value}'"),
        Some((flag, value)) if value.contains('%') => format!("{flag}=\"{value}\""),
        _ => arg.to_string(),
    }
}

impl fmt::Display for GitQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git")?;
        for arg in &self.args {
            write!(f, " {}", render_arg(arg))?;
        }
        match (self.pipeline, self.unique_flag) {
            (Pipeline::None, _) => Ok(()),
            (Pipeline::Sort, _) => write!(f, " | sort"),
            (Pipeline::SortUnique, true) => write!(f, " | sort -u"),
            (Pipeline::SortUnique, false) => write!(f, " | sort | uniq"),
        }
    }
}
