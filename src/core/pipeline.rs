//! Stages shared by the schedule and supporters pipelines:
//! rendering every page of a run, then delivering them.

use crate::config::{Config, PageConfig};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::publish::{DirPublisher, GitHubPublisher, Publisher};
use crate::render::Renderer;
use crate::ui::messages::{detail, info, success};
use minijinja::Value;
use std::path::PathBuf;

/// What happens to the processed rows at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Print the rows as a table, render nothing.
    Preview,
    /// Write the pages under a local directory.
    Directory(PathBuf),
    /// Commit the pages to the website repository.
    Remote { dry_run: bool },
}

impl Delivery {
    pub fn from_flags(out: Option<&str>, publish: bool, dry_run: bool) -> Self {
        match (out, publish) {
            (Some(dir), _) => Delivery::Directory(crate::utils::path::expand_tilde(dir)),
            (None, true) => Delivery::Remote { dry_run },
            (None, false) => Delivery::Preview,
        }
    }
}

/// A rendered page, ready for delivery.
#[derive(Debug, Clone)]
pub struct Page {
    pub locale: String,
    pub target: String,
    pub html: String,
}

/// Render all pages of a run. Nothing is delivered unless every page rendered.
pub fn render_pages<F>(kind: &str, pages: &[PageConfig], context: F) -> AppResult<Vec<Page>>
where
    F: Fn(&PageConfig) -> Value,
{
    let mut renderer = Renderer::new()?;
    pages
        .iter()
        .map(|page| {
            let html = renderer.render(kind, page, context(page))?;
            Ok(Page {
                locale: page.locale.clone(),
                target: page.target.clone(),
                html,
            })
        })
        .collect()
}

pub fn deliver(
    cfg: &Config,
    pool: &DbPool,
    kind: &str,
    pages: &[Page],
    delivery: &Delivery,
) -> AppResult<()> {
    let publisher: Box<dyn Publisher> = match delivery {
        Delivery::Preview => return Ok(()),
        Delivery::Directory(dir) => Box::new(DirPublisher::new(dir.clone())),
        Delivery::Remote { dry_run: true } => {
            info(format!(
                "Dry run: {} {kind} page(s) for {}@{}",
                pages.len(),
                cfg.publish.repository,
                cfg.publish.branch
            ));
            for page in pages {
                detail(format!("{} ({} bytes)", page.target, page.html.len()));
            }
            return Ok(());
        }
        Delivery::Remote { dry_run: false } => {
            Box::new(GitHubPublisher::from_config(&cfg.publish, &cfg.http)?)
        }
    };

    info(format!(
        "Publishing {} {kind} page(s) to {}",
        pages.len(),
        publisher.describe()
    ));

    for page in pages {
        let message = format!("{} ({kind}, {})", cfg.publish.commit_message, page.locale);
        let outcome = publisher.publish(&page.target, &page.html, &message)?;
        detail(format!("{} → {outcome}", page.target));
        ttlog_soft(
            &pool.conn,
            "publish",
            &page.target,
            &format!("{kind} page {outcome} on {}", publisher.describe()),
        );
    }

    success(format!("{kind} pages delivered"));
    Ok(())
}
