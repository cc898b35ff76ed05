// src/export/logic.rs

use crate::config::Config;
use crate::core::schedule::ScheduleLogic;
use crate::core::supporters::SupportersLogic;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::{ensure_distinct, ensure_writable};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{ScheduleExport, SupporterExport};
use crate::export::{ExportFormat, ExportSource};
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;
use serde::Serialize;
use std::path::Path;

/// High level export logic.
pub struct ExportLogic;

fn write<T: Serialize>(format: ExportFormat, items: &[T], path: &Path) -> AppResult<()> {
    match format {
        ExportFormat::Csv => export_csv(items, path),
        ExportFormat::Json => export_json(items, path),
    }
}

impl ExportLogic {
    /// Export the processed rows of one pipeline.
    ///
    /// - `source`: schedule (compacted rows) | supporters (active supporters)
    /// - `format`: csv | json
    /// - `file`: absolute path of the output file
    /// - `input`: local CSV instead of the configured URL
    pub fn export(
        cfg: &Config,
        pool: &DbPool,
        source: ExportSource,
        format: ExportFormat,
        file: &str,
        input: Option<&str>,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        if let Some(input) = input {
            ensure_distinct(&expand_tilde(input), path)?;
        }
        ensure_writable(path, force)?;

        let count = match source {
            ExportSource::Schedule => {
                let rows = ScheduleLogic::load(cfg, pool, input)?;
                let items: Vec<ScheduleExport> = rows.iter().map(ScheduleExport::from).collect();
                if items.is_empty() {
                    warning("No schedule rows to export.");
                    return Ok(());
                }
                write(format, &items, path)?;
                items.len()
            }
            ExportSource::Supporters => {
                let supporters = SupportersLogic::load(cfg, pool, input)?;
                let items: Vec<SupporterExport> =
                    supporters.iter().map(SupporterExport::from).collect();
                if items.is_empty() {
                    warning("No active supporters to export.");
                    return Ok(());
                }
                write(format, &items, path)?;
                items.len()
            }
        };

        ttlog_soft(
            &pool.conn,
            "export",
            source.as_str(),
            &format!("{count} rows → {}", path.display()),
        );
        Ok(())
    }
}
