//! Delivery of rendered pages: a local directory or the website repository.

mod dir;
pub mod github;

pub use dir::DirPublisher;
pub use github::GitHubPublisher;

use crate::errors::AppResult;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Updated,
    Unchanged,
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PublishOutcome::Created => "created",
            PublishOutcome::Updated => "updated",
            PublishOutcome::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

pub trait Publisher {
    /// Replace the content of `path`. Publishing the same content twice is a no-op.
    fn publish(&self, path: &str, content: &str, message: &str) -> AppResult<PublishOutcome>;

    fn describe(&self) -> String;
}
