pub mod changes;
pub mod cli;
pub mod config;
pub mod contributors;
pub mod email;
pub mod error;
pub mod git;
pub mod identifier;
pub mod logging;
pub mod model;
pub mod output;
pub mod stats;
pub mod submit;
pub mod window;

pub use error::{CodeTimeError, Result};
pub use git::GitMetrics;
