//! Supporters pipeline: active supporters from the spreadsheet, with a link
//! to their website when the domain looks like a real organization's.

use crate::config::{Config, SupportersConfig};
use crate::core::pipeline::{Delivery, deliver, render_pages};
use crate::core::sheet::{Sheet, cell};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::supporter::Supporter;
use crate::net::fetch::source_for;
use crate::ui::messages::{detail, header, info};
use crate::utils::table::{Column, Table};
use minijinja::context;
use regex::Regex;
use std::sync::LazyLock;

pub const KIND: &str = "supporters";

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[a-z][a-z0-9+.-]*://").expect("valid scheme regex"));

/// Host part of a website value: no scheme, no `www.`, no path or port.
pub fn host_of(website: &str) -> String {
    let without_scheme = SCHEME.replace(website.trim(), "");
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// A website is linkable when its host is not a blocked (free-mail) domain
/// and has at least two non-empty labels.
pub fn validate_domain(website: &str, blocked: &[String]) -> bool {
    let host = host_of(website);
    if host.is_empty() {
        return false;
    }

    if blocked
        .iter()
        .any(|b| host.starts_with(&b.trim().to_ascii_lowercase()))
    {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

fn link_for(website: &str, blocked: &[String]) -> Option<String> {
    if !validate_domain(website, blocked) {
        return None;
    }
    if SCHEME.is_match(website) {
        Some(website.to_string())
    } else {
        Some(format!("https://{website}"))
    }
}

pub fn parse_supporters(text: &str, cfg: &SupportersConfig) -> AppResult<Vec<Supporter>> {
    let sheet = Sheet::parse(text)?;
    let status_idx = sheet.require(&cfg.status_column)?;
    let org_idx = sheet.require(&cfg.organization_column)?;
    let contact_idx = sheet.column(&cfg.contact_column);
    let ours_idx = sheet.column(&cfg.contact_from_us_column);
    let website_idx = sheet.column(&cfg.website_column);

    let optional = |rec: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| rec.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let mut supporters = Vec::new();
    for (line, rec) in &sheet.records {
        let status = cell(rec, status_idx, *line, &cfg.status_column)?;
        if status != cfg.active_status {
            continue;
        }

        let website = Some(optional(rec, website_idx)).filter(|w| !w.is_empty());
        let link = website
            .as_deref()
            .and_then(|w| link_for(w, &cfg.blocked_domains));

        supporters.push(Supporter {
            organization: cell(rec, org_idx, *line, &cfg.organization_column)?.to_string(),
            contact: optional(rec, contact_idx),
            contact_from_us: optional(rec, ours_idx),
            status: status.to_string(),
            website,
            link,
        });
    }

    Ok(supporters)
}

pub struct SupportersLogic;

impl SupportersLogic {
    pub fn load(cfg: &Config, pool: &DbPool, input: Option<&str>) -> AppResult<Vec<Supporter>> {
        let source = source_for(input, &cfg.supporters.csv_url, &cfg.http)?;
        info(format!("Fetching supporters from {}", source.describe()));

        let text = source.fetch()?;
        ttlog_soft(
            &pool.conn,
            "fetch",
            KIND,
            &format!("{} bytes from {}", text.len(), source.describe()),
        );

        let supporters = parse_supporters(&text, &cfg.supporters)?;
        let linked = supporters.iter().filter(|s| s.link.is_some()).count();
        let summary = format!(
            "{} active supporters ({} with a website link)",
            supporters.len(),
            linked
        );
        detail(&summary);
        ttlog_soft(&pool.conn, "filter", KIND, &summary);

        Ok(supporters)
    }

    pub fn run(
        cfg: &Config,
        pool: &DbPool,
        input: Option<&str>,
        delivery: &Delivery,
    ) -> AppResult<()> {
        let supporters = Self::load(cfg, pool, input)?;

        if *delivery == Delivery::Preview {
            print_supporters(&supporters);
            return Ok(());
        }

        let pages = render_pages(KIND, &cfg.supporters.pages, |page| {
            context! {
                supporters => &supporters,
                locale => &page.locale,
            }
        })?;
        ttlog_soft(
            &pool.conn,
            "render",
            KIND,
            &format!("{} page(s) rendered", pages.len()),
        );

        deliver(cfg, pool, KIND, &pages, delivery)
    }
}

pub fn print_supporters(supporters: &[Supporter]) {
    let mut table = Table::new(vec![
        Column::new("ORGANIZATION", 36),
        Column::new("WEBSITE", 36),
        Column::new("LINK", 4),
        Column::new("CONTACT", 24),
    ]);

    for s in supporters {
        table.add_row(vec![
            s.organization.clone(),
            s.website.clone().unwrap_or_else(|| "--".into()),
            if s.link.is_some() { "yes" } else { "no" }.to_string(),
            s.contact_from_us.clone(),
        ]);
    }

    header("Supporters");
    print!("{}", table.render());
}
