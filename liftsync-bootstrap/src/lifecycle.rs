use anyhow::{Context, Result};
use tracing::{error, info, warn};

use liftsync_application::commands::run_sync;
use liftsync_domain::SyncSummary;
use liftsync_infrastructure::AppConfig;

use crate::context::SyncContext;
use crate::logging::init_logging;

/// Command line values layered over the loaded config.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<String>,
    pub max_candidates: Option<usize>,
    pub years: Vec<i32>,
    pub log_json: bool,
}

impl RunOptions {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(limit) = self.max_candidates {
            config.max_candidates = Some(limit);
        }
        if !self.years.is_empty() {
            config.years = self.years.clone();
        }
        config.log_json |= self.log_json;
    }
}

/// One complete sync run. Skipped candidates still count as success; only
/// configuration, setup and dedup-baseline failures return an error.
pub async fn run_once(options: RunOptions) -> Result<SyncSummary> {
    let mut config = AppConfig::read(options.config_path.as_deref())
        .await
        .context("loading configuration")?;
    options.apply(&mut config);
    config.normalize();

    let _guard = init_logging(config.log_json, config.log_dir.as_deref())?;
    log_notices(&mut config);
    config.validate().inspect_err(|err| {
        error!(error = %err, "invalid configuration");
    })?;
    info!(
        years = ?config.years,
        max_candidates = ?config.max_candidates,
        table = %config.store_table,
        "configuration loaded"
    );

    let context = SyncContext::new(&config).await.inspect_err(|err| {
        error!(error = %format!("{err:#}"), "adapter setup failed");
    })?;
    let summary = run_sync(&context.state).await.inspect_err(|err| {
        error!(error = %err, "sync run aborted");
    })?;
    Ok(summary)
}

/// Logs the warnings collected while the config was read. Returns how many.
fn log_notices(config: &mut AppConfig) -> usize {
    let count = config.notices.len();
    for notice in config.notices.drain(..) {
        warn!("{notice}");
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_override_config() {
        let mut config = AppConfig::default();
        let options = RunOptions {
            max_candidates: Some(5),
            years: vec![2019],
            log_json: true,
            ..RunOptions::default()
        };
        options.apply(&mut config);
        assert_eq!(config.max_candidates, Some(5));
        assert_eq!(config.years, vec![2019]);
        assert!(config.log_json);
    }

    #[test]
    fn absent_cli_values_keep_config() {
        let mut config = AppConfig::default();
        config.years = vec![2020, 2021];
        RunOptions::default().apply(&mut config);
        assert_eq!(config.years, vec![2020, 2021]);
        assert_eq!(config.max_candidates, Some(30));
        assert!(!config.log_json);
    }

    #[test]
    fn collected_notices_are_logged_once() {
        let mut config = AppConfig::default();
        config.notices.push("config file ./liftsync.toml not found, using defaults".to_string());
        assert_eq!(log_notices(&mut config), 1);
        assert!(config.notices.is_empty());
        assert_eq!(log_notices(&mut config), 0);
    }
}
