use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

use liftsync_domain::{ConfigurationError, InsertAck, ResultRow, SyncSettings};

use crate::config::{
    validate_endpoint_path, validate_http_url, validate_identifier, NotifierConfig, SourceConfig,
    StoreConfig,
};
use crate::utils::{current_year, recent_years};

const DEFAULT_CONFIG_PATH: &str = "./liftsync.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub source_domain: String,
    pub source_index_page: String,
    pub source_event_index_path: String,
    pub source_event_results_path: String,
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub store_table: String,
    pub store_key_column: String,
    pub store_name_column: String,
    pub store_id_column: String,
    pub insert_return: InsertAck,
    pub notify_url: Option<String>,
    pub notify_template: Option<String>,
    pub years: Vec<i32>,
    pub max_candidates: Option<usize>,
    pub request_timeout_seconds: u64,
    pub insert_timeout_seconds: u64,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// Warnings raised while reading, held until logging is installed.
    #[serde(skip)]
    pub notices: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_domain: "https://usaweightlifting.sport80.com".to_string(),
            source_index_page: "/public/rankings/all".to_string(),
            source_event_index_path: "/api/events/rankings/table/data".to_string(),
            source_event_results_path: "/api/events/rankings/table/{event_id}/data".to_string(),
            store_url: None,
            store_key: None,
            store_table: "lifting_results".to_string(),
            store_key_column: "event_id".to_string(),
            store_name_column: "meet".to_string(),
            store_id_column: "id".to_string(),
            insert_return: InsertAck::Minimal,
            notify_url: None,
            notify_template: None,
            years: recent_years(current_year(), 2),
            max_candidates: Some(30),
            request_timeout_seconds: 30,
            insert_timeout_seconds: 60,
            log_dir: None,
            log_json: false,
            notices: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Reads `path`, else `LIFTSYNC_CONFIG`, else `./liftsync.toml`. A missing
    /// file falls back to defaults; environment overrides apply either way.
    /// The result is neither normalized nor validated.
    pub async fn read(path: Option<&str>) -> Result<Self> {
        let path = path
            .map(ToString::to_string)
            .or_else(|| env::var("LIFTSYNC_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .with_context(|| format!("reading {path}"))?;
            Self::from_toml(&content).with_context(|| format!("parsing {path}"))?
        } else {
            let mut config = AppConfig::default();
            config
                .notices
                .push(format!("config file {path} not found, using defaults"));
            config
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn normalize(&mut self) {
        for field in [
            &mut self.store_url,
            &mut self.store_key,
            &mut self.notify_url,
            &mut self.notify_template,
            &mut self.log_dir,
        ] {
            if field.as_deref().is_some_and(|value| value.trim().is_empty()) {
                *field = None;
            }
        }
        if let Some(url) = &mut self.store_url {
            *url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(key) = &mut self.store_key {
            *key = key.trim().to_string();
        }
        self.source_domain = self.source_domain.trim().trim_end_matches('/').to_string();
        for field in [
            &mut self.store_table,
            &mut self.store_key_column,
            &mut self.store_name_column,
            &mut self.store_id_column,
        ] {
            *field = field.trim().to_string();
        }
        let mut seen = Vec::with_capacity(self.years.len());
        self.years.retain(|year| {
            let fresh = !seen.contains(year);
            seen.push(*year);
            fresh
        });
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_http_url("source_domain", &self.source_domain)?;
        validate_endpoint_path("source_index_page", &self.source_index_page)?;
        validate_endpoint_path("source_event_index_path", &self.source_event_index_path)?;
        validate_endpoint_path("source_event_results_path", &self.source_event_results_path)?;
        if !self.source_event_results_path.contains("{event_id}") {
            return Err(ConfigurationError::new(
                "source_event_results_path must contain {event_id}",
            ));
        }

        let store_url = self
            .store_url
            .as_deref()
            .ok_or_else(|| ConfigurationError::new("store_url is required"))?;
        validate_http_url("store_url", store_url)?;
        if self.store_key.is_none() {
            return Err(ConfigurationError::new("store_key is required"));
        }
        validate_identifier("store_table", &self.store_table)?;
        validate_identifier("store_key_column", &self.store_key_column)?;
        validate_identifier("store_name_column", &self.store_name_column)?;
        validate_identifier("store_id_column", &self.store_id_column)?;
        self.validate_store_columns()?;

        if let Some(url) = &self.notify_url {
            validate_http_url("notify_url", url)?;
        }
        if self.request_timeout_seconds == 0 || self.insert_timeout_seconds == 0 {
            return Err(ConfigurationError::new("timeouts must be greater than 0"));
        }
        self.to_sync_settings().validate()
    }

    /// The id, key and name columns share one payload object with the fixed
    /// lifter columns, so every name must be distinct.
    fn validate_store_columns(&self) -> Result<(), ConfigurationError> {
        let columns = [
            ("store_key_column", &self.store_key_column),
            ("store_name_column", &self.store_name_column),
            ("store_id_column", &self.store_id_column),
        ];
        for (index, (field, column)) in columns.iter().enumerate() {
            if ResultRow::FIXED_COLUMNS.contains(&column.as_str()) {
                return Err(ConfigurationError::new(format!(
                    "{field} = {column} collides with a result column"
                )));
            }
            if let Some((other, _)) = columns[..index].iter().find(|(_, seen)| seen == column) {
                return Err(ConfigurationError::new(format!(
                    "{field} and {other} both name column {column}"
                )));
            }
        }
        Ok(())
    }

    pub fn to_sync_settings(&self) -> SyncSettings {
        SyncSettings {
            years: self.years.clone(),
            max_candidates: self.max_candidates,
            insert_ack: self.insert_return,
        }
    }

    pub fn to_source_config(&self) -> SourceConfig {
        SourceConfig {
            domain: self.source_domain.clone(),
            index_page_path: self.source_index_page.clone(),
            event_index_path: self.source_event_index_path.clone(),
            event_results_path: self.source_event_results_path.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
        }
    }

    pub fn to_store_config(&self) -> Result<StoreConfig, ConfigurationError> {
        let url = self
            .store_url
            .clone()
            .ok_or_else(|| ConfigurationError::new("store_url is required"))?;
        let key = self
            .store_key
            .clone()
            .ok_or_else(|| ConfigurationError::new("store_key is required"))?;
        Ok(StoreConfig {
            url,
            key,
            table: self.store_table.clone(),
            key_column: self.store_key_column.clone(),
            name_column: self.store_name_column.clone(),
            id_column: self.store_id_column.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
            insert_timeout: Duration::from_secs(self.insert_timeout_seconds),
        })
    }

    pub fn to_notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            url: self.notify_url.clone(),
            template: self.notify_template.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    /// `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY` are read as fallbacks for
    /// the store settings; the `LIFTSYNC_` names win when both are set.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("LIFTSYNC_SOURCE_DOMAIN") {
            self.source_domain = value;
        }
        if let Some(value) = lookup("LIFTSYNC_SOURCE_INDEX_PAGE") {
            self.source_index_page = value;
        }
        if let Some(value) = lookup("LIFTSYNC_SOURCE_EVENT_INDEX_PATH") {
            self.source_event_index_path = value;
        }
        if let Some(value) = lookup("LIFTSYNC_SOURCE_EVENT_RESULTS_PATH") {
            self.source_event_results_path = value;
        }
        if let Some(value) = lookup("LIFTSYNC_STORE_URL").or_else(|| lookup("SUPABASE_URL")) {
            self.store_url = Some(value);
        }
        if let Some(value) =
            lookup("LIFTSYNC_STORE_KEY").or_else(|| lookup("SUPABASE_SERVICE_ROLE_KEY"))
        {
            self.store_key = Some(value);
        }
        if let Some(value) = lookup("LIFTSYNC_STORE_TABLE") {
            self.store_table = value;
        }
        if let Some(value) = lookup("LIFTSYNC_STORE_KEY_COLUMN") {
            self.store_key_column = value;
        }
        if let Some(value) = lookup("LIFTSYNC_STORE_NAME_COLUMN") {
            self.store_name_column = value;
        }
        if let Some(value) = lookup("LIFTSYNC_STORE_ID_COLUMN") {
            self.store_id_column = value;
        }
        if let Some(value) = lookup("LIFTSYNC_INSERT_RETURN") {
            match value.trim() {
                "minimal" => self.insert_return = InsertAck::Minimal,
                "representation" => self.insert_return = InsertAck::Representation,
                other => self
                    .notices
                    .push(format!("ignoring unknown LIFTSYNC_INSERT_RETURN {other}")),
            }
        }
        if let Some(value) = lookup("LIFTSYNC_NOTIFY_URL") {
            self.notify_url = Some(value);
        }
        if let Some(value) = lookup("LIFTSYNC_NOTIFY_TEMPLATE") {
            self.notify_template = Some(value);
        }
        if let Some(value) = lookup("LIFTSYNC_YEARS") {
            let years = parse_env_year_list(&value);
            if !years.is_empty() {
                self.years = years;
            }
        }
        if let Some(value) = lookup("LIFTSYNC_MAX_CANDIDATES") {
            self.max_candidates = match value.trim() {
                "all" => None,
                other => other.parse().ok().or(self.max_candidates),
            };
        }
        if let Some(value) = lookup("LIFTSYNC_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("LIFTSYNC_INSERT_TIMEOUT_SECONDS") {
            self.insert_timeout_seconds = value.parse().unwrap_or(self.insert_timeout_seconds);
        }
        if let Some(value) = lookup("LIFTSYNC_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Some(value) = lookup("LIFTSYNC_LOG_JSON") {
            self.log_json = value.parse().unwrap_or(self.log_json);
        }
    }
}

fn parse_env_year_list(value: &str) -> Vec<i32> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| item.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn configured() -> AppConfig {
        let mut config = AppConfig::default();
        config.store_url = Some("https://abc.supabase.co/".to_string());
        config.store_key = Some("service-key".to_string());
        config
    }

    #[test]
    fn defaults_cover_the_current_and_previous_year() {
        let config = AppConfig::default();
        let year = current_year();
        assert_eq!(config.years, vec![year, year - 1]);
        assert_eq!(config.max_candidates, Some(30));
        assert_eq!(config.store_table, "lifting_results");
    }

    #[test]
    fn parses_partial_toml_over_defaults() {
        let config = AppConfig::from_toml(
            r#"
            store_url = "https://abc.supabase.co"
            store_key = "k"
            years = [2022]
            insert_return = "representation"
            "#,
        )
        .expect("toml");
        assert_eq!(config.years, vec![2022]);
        assert_eq!(config.insert_return, InsertAck::Representation);
        assert_eq!(config.store_name_column, "meet");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_store_credentials_fail_validation() {
        let config = AppConfig::default();
        let err = config.validate().expect_err("store url missing");
        assert!(err.to_string().contains("store_url"));

        let mut config = configured();
        config.store_key = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn supabase_variables_are_fallbacks() {
        let env = vars(&[
            ("SUPABASE_URL", "https://fallback.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "fallback-key"),
            ("LIFTSYNC_STORE_KEY", "primary-key"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|name| env.get(name).cloned());
        assert_eq!(config.store_url.as_deref(), Some("https://fallback.supabase.co"));
        assert_eq!(config.store_key.as_deref(), Some("primary-key"));
    }

    #[test]
    fn env_overrides_years_and_limits() {
        let env = vars(&[
            ("LIFTSYNC_YEARS", "2021, 2020,,x"),
            ("LIFTSYNC_MAX_CANDIDATES", "all"),
            ("LIFTSYNC_INSERT_RETURN", "representation"),
            ("LIFTSYNC_REQUEST_TIMEOUT_SECONDS", "nope"),
        ]);
        let mut config = configured();
        config.apply_overrides(|name| env.get(name).cloned());
        assert_eq!(config.years, vec![2021, 2020]);
        assert_eq!(config.max_candidates, None);
        assert_eq!(config.insert_return, InsertAck::Representation);
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn normalize_blanks_optionals_and_dedups_years() {
        let mut config = configured();
        config.notify_url = Some("  ".to_string());
        config.log_dir = Some(String::new());
        config.years = vec![2024, 2023, 2024];
        config.normalize();
        assert_eq!(config.notify_url, None);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.store_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(config.years, vec![2024, 2023]);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let mut config = configured();
        config.max_candidates = Some(0);
        assert!(config.validate().is_err());

        let mut config = configured();
        config.insert_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn results_path_needs_a_key_placeholder() {
        let mut config = configured();
        config.source_event_results_path = "/api/events/results".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn store_columns_must_not_collide() {
        let mut config = configured();
        config.store_name_column = "name".to_string();
        let err = config.validate().expect_err("name is a result column");
        assert!(err.to_string().contains("store_name_column"));

        let mut config = configured();
        config.store_key_column = "sport80_id".to_string();
        config.store_id_column = "sport80_id".to_string();
        let err = config.validate().expect_err("id and key share a column");
        assert!(err.to_string().contains("store_id_column and store_key_column"));

        let mut config = configured();
        config.store_key_column = "sport80_id".to_string();
        config.store_id_column = "event_id".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_insert_return_is_kept_as_a_notice() {
        let env = vars(&[("LIFTSYNC_INSERT_RETURN", "everything")]);
        let mut config = configured();
        config.apply_overrides(|name| env.get(name).cloned());
        assert_eq!(config.insert_return, InsertAck::Minimal);
        assert_eq!(config.notices.len(), 1);
        assert!(config.notices[0].contains("everything"));
    }

    #[tokio::test]
    async fn missing_config_file_is_kept_as_a_notice() {
        let config = AppConfig::read(Some("./does-not-exist/liftsync.toml"))
            .await
            .expect("defaults");
        assert!(config
            .notices
            .iter()
            .any(|notice| notice.contains("does-not-exist/liftsync.toml")));
    }

    #[test]
    fn converts_into_adapter_configs() {
        let mut config = configured();
        config.normalize();
        let store = config.to_store_config().expect("store config");
        assert_eq!(store.url, "https://abc.supabase.co");
        assert_eq!(store.insert_timeout, Duration::from_secs(60));
        let source = config.to_source_config();
        assert_eq!(source.domain, "https://usaweightlifting.sport80.com");
        assert_eq!(config.to_sync_settings().max_candidates, Some(30));
    }
}
