//! Blocking HTTP plumbing shared by the CSV fetcher and the GitHub publisher.

pub mod fetch;
pub mod retry;

use crate::config::HttpConfig;
use crate::errors::AppResult;
use reqwest::blocking::Client;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("sitefeed/", env!("CARGO_PKG_VERSION"));

pub fn build_client(http: &HttpConfig) -> AppResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}
