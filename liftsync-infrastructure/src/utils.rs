use std::time::Duration;

use anyhow::Result;
use chrono::{Datelike, Utc};
use reqwest::Client;

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// `count` years ending at `latest`, newest first.
pub fn recent_years(latest: i32, count: usize) -> Vec<i32> {
    (0..count).map(|offset| latest - offset as i32).collect()
}

pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}
