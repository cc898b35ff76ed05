//! Header-addressed access to a published spreadsheet.

use crate::errors::{AppError, AppResult};
use csv::{ReaderBuilder, StringRecord};

/// Line number of the header row, used for missing-column errors.
pub const HEADER_LINE: usize = 1;

pub struct Sheet {
    pub headers: Vec<String>,
    pub records: Vec<(usize, StringRecord)>, // (source line, record)
}

impl Sheet {
    pub fn parse(text: &str) -> AppResult<Self> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (i, rec) in rdr.records().enumerate() {
            let rec = rec?;
            let line = rec
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + HEADER_LINE + 1);
            records.push((line, rec));
        }

        Ok(Self { headers, records })
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name.trim())
    }

    pub fn require(&self, name: &str) -> AppResult<usize> {
        self.column(name).ok_or_else(|| AppError::MissingField {
            row: HEADER_LINE,
            field: name.to_string(),
        })
    }
}

/// Trimmed value of a mapped column; a record too short to hold it is an error.
pub fn cell<'r>(rec: &'r StringRecord, idx: usize, line: usize, field: &str) -> AppResult<&'r str> {
    rec.get(idx)
        .map(str::trim)
        .ok_or_else(|| AppError::MissingField {
            row: line,
            field: field.to_string(),
        })
}
