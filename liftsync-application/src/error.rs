use liftsync_domain::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("{stage} failed: {source}")]
    TransientFetch {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn fetch(stage: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| AppError::TransientFetch { stage, source }
    }
}
