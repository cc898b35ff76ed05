use super::{PublishOutcome, Publisher};
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Writes pages under a local directory, mirroring the repository layout.
pub struct DirPublisher {
    root: PathBuf,
}

impl DirPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let rel = Path::new(path);
        if rel.is_absolute() || rel.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(AppError::Publish(format!(
                "target must be a relative path inside the output directory: {path}"
            )));
        }
        Ok(self.root.join(rel))
    }
}

impl Publisher for DirPublisher {
    fn publish(&self, path: &str, content: &str, _message: &str) -> AppResult<PublishOutcome> {
        let file = self.resolve(path)?;

        let outcome = if file.exists() {
            if fs::read_to_string(&file)? == content {
                return Ok(PublishOutcome::Unchanged);
            }
            PublishOutcome::Updated
        } else {
            PublishOutcome::Created
        };

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, content)?;
        Ok(outcome)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
