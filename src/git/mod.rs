pub mod probe;
pub mod query;
pub mod repo;
pub mod runner;

pub use probe::{GixProbe, RepoProbe};
pub use query::{GitQuery, Pipeline};
pub use repo::GitMetrics;
pub use runner::{CommandRunner, GitCli};
