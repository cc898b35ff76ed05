use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const OP_MAX_WIDTH: usize = 60;

/// ANSI color of an operation in the printed run log
fn color_for_operation(op: &str) -> Colour {
    match op {
        "fetch" => Colour::Blue,
        "compact" | "filter" => Colour::Cyan,
        "render" => Colour::Purple,
        "publish" => Colour::Green,
        "export" => Colour::Yellow,
        "error" => Colour::Red,
        "init" => Colour::RGB(255, 153, 51), // orange
        _ => Colour::White,
    }
}

#[derive(Debug)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    /// Most recent `limit` entries (all when None), oldest first.
    pub fn entries(pool: &DbPool, limit: Option<usize>) -> AppResult<Vec<LogEntry>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM (
                SELECT * FROM log ORDER BY id DESC LIMIT ?1
             ) ORDER BY id ASC",
        )?;

        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let rows = stmt.query_map([limit], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }
        Ok(entries)
    }

    pub fn print_log(pool: &DbPool, limit: Option<usize>) -> AppResult<()> {
        let entries = Self::entries(pool, limit)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        // One column for "operation (target)", capped at OP_MAX_WIDTH
        let op_targets: Vec<String> = entries
            .iter()
            .map(|e| {
                let s = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                if s.chars().count() > OP_MAX_WIDTH {
                    let mut t: String = s.chars().take(OP_MAX_WIDTH - 3).collect();
                    t.push_str("...");
                    t
                } else {
                    s
                }
            })
            .collect();

        let op_w = op_targets.iter().map(|s| s.chars().count()).max().unwrap_or(10);
        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);

        println!("📜 Internal log:\n");

        for (entry, op_target) in entries.iter().zip(&op_targets) {
            let padding = " ".repeat(op_w.saturating_sub(op_target.chars().count()));

            // Only the operation word is colored
            let colored = match op_target.split_once(' ') {
                Some((op, rest)) => format!(
                    "{} {}",
                    color_for_operation(&entry.operation).paint(op),
                    rest
                ),
                None => color_for_operation(&entry.operation)
                    .paint(op_target.as_str())
                    .to_string(),
            };

            println!(
                "{:>id_w$}: {} | {}{} => {}",
                entry.id,
                entry.date,
                colored,
                padding,
                entry.message,
                id_w = id_w
            );
        }

        Ok(())
    }
}
