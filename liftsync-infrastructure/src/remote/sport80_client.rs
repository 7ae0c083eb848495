// Sport80 remote source
// The public site embeds a `window.env = {...};` object in its rankings page.
// It carries the public API token and the API base url every call needs, so
// the client scrapes it once at connect time.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::{debug, info};

use liftsync_domain::ports::{PageFetcher, RemoteSource};
use liftsync_domain::{NaturalKey, PagePayload, QueryContext};

use crate::config::SourceConfig;
use crate::utils::http_client;

const ENV_PATTERN: &str = r"(?s)window\.env = (\{.*?\});";
const TOKEN_KEY: &str = "SERVICES_API_PUBLIC_KEY";
const API_BASE_KEY: &str = "RANKINGS_DOMAIN_URL";

/// The parts of the site's embedded environment the API calls depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEnv {
    pub api_token: String,
    pub api_base: String,
}

pub fn extract_domain_env(page: &str) -> Result<DomainEnv> {
    let pattern = Regex::new(ENV_PATTERN)?;
    let raw = pattern
        .captures(page)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| anyhow!("page has no window.env block"))?;
    let env: Value = serde_json::from_str(raw.as_str()).context("window.env is not valid JSON")?;
    let read = |key: &str| {
        env.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| anyhow!("window.env has no {key}"))
    };
    Ok(DomainEnv {
        api_token: read(TOKEN_KEY)?,
        api_base: read(API_BASE_KEY)?,
    })
}

pub struct Sport80Client {
    http: Client,
    api_base: Url,
    headers: HeaderMap,
    config: SourceConfig,
}

impl Sport80Client {
    pub async fn connect(config: SourceConfig) -> Result<Self> {
        let http = http_client(config.request_timeout)?;
        let page_url = Url::parse(&config.domain)?.join(&config.index_page_path)?;
        let page = http
            .get(page_url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("fetching {page_url}"))?
            .text()
            .await?;
        let env = extract_domain_env(&page).with_context(|| format!("reading {page_url}"))?;
        info!(api_base = %env.api_base, "sport80 session ready");
        Self::with_env(http, config, env)
    }

    pub fn with_env(http: Client, config: SourceConfig, env: DomainEnv) -> Result<Self> {
        let api_base = Url::parse(&env.api_base).context("RANKINGS_DOMAIN_URL is not a url")?;
        let headers = standard_headers(&env)?;
        Ok(Self {
            http,
            api_base,
            headers,
            config,
        })
    }

    pub fn event_index_url(&self) -> Result<Url> {
        Ok(self.api_base.join(&self.config.event_index_path)?)
    }

    pub fn event_results_url(&self, key: &NaturalKey) -> Result<Url> {
        let path = self
            .config
            .event_results_path
            .replace("{event_id}", key.as_str());
        Ok(self.api_base.join(&path)?)
    }

    fn post(&self, url: Url, context: &QueryContext) -> RequestBuilder {
        let request = self.http.post(url).headers(self.headers.clone());
        match context.body() {
            Some(body) => request.json(body),
            None => request,
        }
    }

    async fn fetch(&self, url: Url, context: &QueryContext) -> Result<PagePayload> {
        debug!(url = %url, filtered = !context.is_empty(), "requesting page");
        let response = self
            .post(url.clone(), context)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("POST {url}"))?;
        response
            .json::<PagePayload>()
            .await
            .with_context(|| format!("decoding page from {url}"))
    }
}

fn standard_headers(env: &DomainEnv) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert("X-API-TOKEN", HeaderValue::from_str(&env.api_token)?);
    headers.insert("authority", HeaderValue::from_str(&env.api_base)?);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[async_trait]
impl PageFetcher for Sport80Client {
    async fn fetch_page(&self, cursor: &str, context: &QueryContext) -> Result<PagePayload> {
        // cursors are absolute in practice; join also resolves relative ones
        let url = self.api_base.join(cursor)?;
        self.fetch(url, context).await
    }
}

#[async_trait]
impl RemoteSource for Sport80Client {
    async fn fetch_event_index(&self, context: &QueryContext) -> Result<PagePayload> {
        self.fetch(self.event_index_url()?, context).await
    }

    async fn fetch_event_results(&self, key: &NaturalKey) -> Result<PagePayload> {
        self.fetch(self.event_results_url(key)?, &QueryContext::empty())
            .await
    }
}
