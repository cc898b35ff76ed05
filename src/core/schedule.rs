//! Program schedule pipeline: fetch → parse → compact → render → deliver.

use crate::config::{Config, ScheduleConfig};
use crate::core::compactor::ScheduleCompactor;
use crate::core::pipeline::{Delivery, deliver, render_pages};
use crate::core::sheet::{Sheet, cell};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::schedule::{DisplayRow, RawRow};
use crate::net::fetch::source_for;
use crate::ui::messages::{detail, header, info};
use crate::utils::table::{Column, Table};
use minijinja::context;

pub const KIND: &str = "schedule";

/// Map the spreadsheet onto raw schedule rows. Columns other than the three
/// mapped ones are carried along untouched.
pub fn parse_schedule(text: &str, cfg: &ScheduleConfig) -> AppResult<Vec<RawRow>> {
    let sheet = Sheet::parse(text)?;
    let time_idx = sheet.require(&cfg.time_column)?;
    let location_idx = sheet.require(&cfg.location_column)?;
    let activity_idx = sheet.require(&cfg.activity_column)?;
    let mapped = [time_idx, location_idx, activity_idx];

    let mut rows = Vec::with_capacity(sheet.records.len());
    for (line, rec) in &sheet.records {
        let mut row = RawRow::new(
            *line,
            cell(rec, time_idx, *line, &cfg.time_column)?,
            cell(rec, location_idx, *line, &cfg.location_column)?,
            cell(rec, activity_idx, *line, &cfg.activity_column)?,
        );

        for (i, name) in sheet.headers.iter().enumerate() {
            if mapped.contains(&i) || name.is_empty() {
                continue;
            }
            row.extra
                .insert(name.clone(), rec.get(i).unwrap_or_default().to_string());
        }

        rows.push(row);
    }

    Ok(rows)
}

pub struct ScheduleLogic;

impl ScheduleLogic {
    /// Fetch, parse and compact the schedule.
    pub fn load(cfg: &Config, pool: &DbPool, input: Option<&str>) -> AppResult<Vec<DisplayRow>> {
        let source = source_for(input, &cfg.schedule.csv_url, &cfg.http)?;
        info(format!("Fetching schedule from {}", source.describe()));

        let text = source.fetch()?;
        ttlog_soft(
            &pool.conn,
            "fetch",
            KIND,
            &format!("{} bytes from {}", text.len(), source.describe()),
        );

        let raw = parse_schedule(&text, &cfg.schedule)?;
        let rows = ScheduleCompactor::from_config(&cfg.schedule).compact(&raw)?;

        let untimed = raw.iter().filter(|r| !r.has_range()).count();
        let summary = format!(
            "{} rows → {} display rows ({} without a time range)",
            raw.len(),
            rows.len(),
            untimed
        );
        detail(&summary);
        ttlog_soft(&pool.conn, "compact", KIND, &summary);

        Ok(rows)
    }

    pub fn run(
        cfg: &Config,
        pool: &DbPool,
        input: Option<&str>,
        delivery: &Delivery,
    ) -> AppResult<()> {
        let rows = Self::load(cfg, pool, input)?;

        if *delivery == Delivery::Preview {
            print_schedule(&rows);
            return Ok(());
        }

        let pages = render_pages(KIND, &cfg.schedule.pages, |page| {
            context! {
                rows => &rows,
                merged_activities => &rows,
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

pub fn print_schedule(rows: &[DisplayRow]) {
    let mut table = Table::new(vec![
        Column::new("TIME", 20),
        Column::new("LOCATION", 24),
        Column::new("ACTIVITY", 40),
        Column::new("UNITS", 5),
    ]);

    for r in rows {
        table.add_row(vec![
            r.time_range.clone(),
            r.location.clone(),
            r.activity.clone(),
            r.duration_units.to_string(),
        ]);
    }

    header("Program schedule");
    print!("{}", table.render());
}
