//! Where the spreadsheet text comes from: a published CSV URL or a local file.

use crate::config::HttpConfig;
use crate::errors::{AppError, AppResult};
use crate::net::{build_client, retry::send_with_retry};
use crate::utils::path::expand_tilde;
use reqwest::blocking::Client;
use std::fs;
use std::path::PathBuf;

pub trait CsvSource {
    /// Return the whole CSV document as UTF-8 text.
    fn fetch(&self) -> AppResult<String>;

    /// Human readable origin, used in messages and the run log.
    fn describe(&self) -> String;
}

pub struct HttpSource {
    client: Client,
    url: String,
    http: HttpConfig,
}

pub struct FileSource {
    path: PathBuf,
}

impl HttpSource {
    pub fn new(url: &str, http: &HttpConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_client(http)?,
            url: url.to_string(),
            http: http.clone(),
        })
    }
}

impl CsvSource for HttpSource {
    fn fetch(&self) -> AppResult<String> {
        let resp = send_with_retry(|| self.client.get(&self.url), &self.http, "fetch CSV")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        // Published sheets are UTF-8 whatever the Content-Type says.
        let bytes = resp.bytes()?;
        let text = String::from_utf8(bytes.to_vec()).map_err(|source| AppError::InvalidEncoding {
            url: self.url.clone(),
            source,
        })?;
        Ok(strip_bom(&text).to_string())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

impl FileSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: expand_tilde(path),
        }
    }
}

impl CsvSource for FileSource {
    fn fetch(&self) -> AppResult<String> {
        let text = fs::read_to_string(&self.path)?;
        Ok(strip_bom(&text).to_string())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Pick the local file when `--input` was given, otherwise the configured URL.
pub fn source_for(
    input: Option<&str>,
    csv_url: &str,
    http: &HttpConfig,
) -> AppResult<Box<dyn CsvSource>> {
    match input {
        Some(path) => Ok(Box::new(FileSource::new(path))),
        None if csv_url.trim().is_empty() => Err(AppError::Config(
            "no csv_url configured; pass --input or set csv_url".into(),
        )),
        None => Ok(Box::new(HttpSource::new(csv_url, http)?)),
    }
}
