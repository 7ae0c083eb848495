// Supabase destination store
// Talks to the PostgREST endpoint at `<url>/rest/v1/<table>`. Each payload
// object carries the id, key and name under their configured columns next to
// the fixed lifter columns.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use tracing::{debug, info};

use liftsync_domain::ports::{DestinationStore, InsertAck, InsertReceipt};
use liftsync_domain::{ExistingKeySet, NaturalKey, ResultRow};

use crate::config::StoreConfig;
use crate::utils::http_client;

pub struct SupabaseStore {
    http: Client,
    endpoint: String,
    headers: HeaderMap,
    config: StoreConfig,
}

impl SupabaseStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http = http_client(config.request_timeout)?;
        let endpoint = format!("{}/rest/v1/{}", config.url.trim_end_matches('/'), config.table);
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&config.key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(Self {
            http,
            endpoint,
            headers,
            config,
        })
    }

    fn get(&self) -> RequestBuilder {
        self.http.get(&self.endpoint).headers(self.headers.clone())
    }

    async fn read_rows(&self, request: RequestBuilder, what: &str) -> Result<Vec<Map<String, Value>>> {
        let response = checked(request.send().await?, what).await?;
        response
            .json::<Vec<Map<String, Value>>>()
            .await
            .with_context(|| format!("decoding {what}"))
    }
}

/// PostgREST `in.(...)` filter with every value double-quoted.
pub fn in_filter(keys: &[NaturalKey]) -> String {
    let quoted = keys
        .iter()
        .map(|key| {
            let escaped = key.as_str().replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        })
        .collect::<Vec<_>>();
    format!("in.({})", quoted.join(","))
}

pub fn prefer_header(ack: InsertAck) -> &'static str {
    match ack {
        InsertAck::Minimal => "return=minimal",
        InsertAck::Representation => "return=representation",
    }
}

/// Builds one payload object per row with the id, key and name written
/// under the configured columns. Fails if a configured column would
/// overwrite another field.
pub fn row_payload(rows: &[ResultRow], config: &StoreConfig) -> Result<Vec<Value>> {
    rows.iter()
        .map(|row| {
            let Value::Object(serialized) = serde_json::to_value(row)? else {
                return Err(anyhow!("result row did not serialize to an object"));
            };
            let mut fields = Map::with_capacity(serialized.len());
            fields.insert(config.id_column.clone(), Value::from(row.allocated_id));
            for (column, value) in [
                (&config.key_column, Value::from(row.event_key.as_str())),
                (&config.name_column, Value::from(row.event_name.as_str())),
            ] {
                if fields.insert(column.clone(), value).is_some() {
                    return Err(anyhow!("column {column} is configured twice"));
                }
            }
            for column in ResultRow::FIXED_COLUMNS {
                let value = serialized.get(column).cloned().unwrap_or(Value::Null);
                if fields.insert(column.to_string(), value).is_some() {
                    return Err(anyhow!("column {column} collides with a configured column"));
                }
            }
            Ok(Value::Object(fields))
        })
        .collect()
}

/// Reads the answer of the max id lookup. No rows means an empty table; a
/// row whose id cannot be read is an error.
fn max_id_from_rows(rows: &[Map<String, Value>], id_column: &str) -> Result<Option<i64>> {
    let Some(row) = rows.first() else {
        return Ok(None);
    };
    match row.get(id_column) {
        Some(value) => cell_id(value)
            .map(Some)
            .ok_or_else(|| anyhow!("max id lookup returned unreadable {id_column}: {value}")),
        None => Err(anyhow!("max id lookup returned a row without {id_column}")),
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn cell_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

async fn checked(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(anyhow!("{what} responded {status}: {body}"))
}

#[async_trait]
impl DestinationStore for SupabaseStore {
    async fn load_existing(&self) -> Result<ExistingKeySet> {
        let select = format!("{},{}", self.config.key_column, self.config.name_column);
        let rows = self
            .read_rows(self.get().query(&[("select", select)]), "existing events")
            .await?;

        let mut existing = ExistingKeySet::new();
        for row in &rows {
            if let Some(key) = row
                .get(&self.config.key_column)
                .and_then(cell_text)
                .and_then(|text| NaturalKey::parse(&text))
            {
                existing.insert_key(key);
            }
            if let Some(name) = row.get(&self.config.name_column).and_then(cell_text) {
                existing.insert_name(&name);
            }
        }
        debug!(rows = rows.len(), "read destination snapshot");
        Ok(existing)
    }

    async fn find_existing_keys(&self, keys: &[NaturalKey]) -> Result<Vec<NaturalKey>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let request = self.get().query(&[
            ("select", self.config.key_column.clone()),
            (self.config.key_column.as_str(), in_filter(keys)),
        ]);
        let rows = self.read_rows(request, "existence check").await?;
        let mut found = rows
            .iter()
            .filter_map(|row| row.get(&self.config.key_column))
            .filter_map(cell_text)
            .filter_map(|text| NaturalKey::parse(&text))
            .collect::<Vec<_>>();
        found.sort();
        found.dedup();
        Ok(found)
    }

    async fn fetch_max_id(&self) -> Result<Option<i64>> {
        let id = &self.config.id_column;
        let request = self.get().query(&[
            ("select", id.clone()),
            (id.as_str(), "not.is.null".to_string()),
            ("order", format!("{id}.desc.nullslast")),
            ("limit", "1".to_string()),
        ]);
        let rows = self.read_rows(request, "max id lookup").await?;
        max_id_from_rows(&rows, id)
    }

    async fn insert_rows(&self, rows: &[ResultRow], ack: InsertAck) -> Result<InsertReceipt> {
        let payload = row_payload(rows, &self.config)?;
        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .header("Prefer", prefer_header(ack))
            .timeout(self.config.insert_timeout)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("inserting into {}", self.config.table))?;
        let response = checked(response, "batch insert").await?;

        let returned = match ack {
            InsertAck::Minimal => None,
            InsertAck::Representation => Some(
                response
                    .json::<Vec<Value>>()
                    .await
                    .context("decoding inserted rows")?,
            ),
        };
        info!(table = %self.config.table, rows = rows.len(), "inserted rows");
        Ok(InsertReceipt {
            rows_written: rows.len(),
            returned,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn config(key_column: &str, name_column: &str) -> StoreConfig {
        config_with_id(key_column, name_column, "id")
    }

    fn config_with_id(key_column: &str, name_column: &str, id_column: &str) -> StoreConfig {
        StoreConfig {
            url: "https://abc.supabase.co".to_string(),
            key: "service-key".to_string(),
            table: "lifting_results".to_string(),
            key_column: key_column.to_string(),
            name_column: name_column.to_string(),
            id_column: id_column.to_string(),
            request_timeout: Duration::from_secs(5),
            insert_timeout: Duration::from_secs(5),
        }
    }

    fn row() -> ResultRow {
        ResultRow {
            allocated_id: 7,
            event_key: NaturalKey::parse("55").expect("key"),
            event_name: "Spring Open".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 6),
            name: Some("A. Lifter".to_string()),
            age: None,
            body_weight: Some(json!("81.0")),
            snatch1: None,
            snatch2: None,
            snatch3: None,
            snatch_best: None,
            cj1: None,
            cj2: None,
            cj3: None,
            cj_best: None,
            total: Some(json!("250")),
        }
    }

    #[test]
    fn in_filter_quotes_and_escapes_values() {
        let keys = ["101", "a,b", "say \"hi\""]
            .iter()
            .map(|raw| NaturalKey::parse(raw).expect("key"))
            .collect::<Vec<_>>();
        assert_eq!(in_filter(&keys), r#"in.("101","a,b","say \"hi\"")"#);
    }

    #[test]
    fn payload_uses_default_column_names() {
        let payload = row_payload(&[row()], &config("event_id", "meet")).expect("payload");
        assert_eq!(payload[0]["id"], json!(7));
        assert_eq!(payload[0]["event_id"], json!("55"));
        assert_eq!(payload[0]["meet"], json!("Spring Open"));
        assert_eq!(payload[0]["date"], json!("2024-04-06"));
        assert_eq!(payload[0]["total"], json!("250"));
    }

    #[test]
    fn payload_renames_onto_configured_columns() {
        let payload = row_payload(&[row()], &config("sport80_id", "event_name")).expect("payload");
        let fields = payload[0].as_object().expect("object");
        assert_eq!(fields.get("sport80_id"), Some(&json!("55")));
        assert_eq!(fields.get("event_name"), Some(&json!("Spring Open")));
        assert!(!fields.contains_key("event_id"));
        assert!(!fields.contains_key("meet"));
    }

    #[test]
    fn payload_keeps_the_lifter_name_and_every_configured_column() {
        let config = config_with_id("sport80_id", "event_name", "event_id");
        let payload = row_payload(&[row()], &config).expect("payload");
        let fields = payload[0].as_object().expect("object");
        assert_eq!(fields.get("event_id"), Some(&json!(7)));
        assert_eq!(fields.get("sport80_id"), Some(&json!("55")));
        assert_eq!(fields.get("event_name"), Some(&json!("Spring Open")));
        assert_eq!(fields.get("name"), Some(&json!("A. Lifter")));
        assert!(!fields.contains_key("id"));
    }

    #[test]
    fn payload_refuses_columns_that_overwrite_fields() {
        let err = row_payload(&[row()], &config("event_id", "name")).expect_err("name collides");
        assert!(err.to_string().contains("name"));

        let err = row_payload(&[row()], &config_with_id("id", "meet", "id"))
            .expect_err("id and key collide");
        assert!(err.to_string().contains("configured twice"));
    }

    #[test]
    fn max_id_comes_from_the_first_row() {
        let rows = [json!({"id": "41"}).as_object().cloned().expect("object")];
        assert_eq!(max_id_from_rows(&rows, "id").expect("max id"), Some(41));
        assert_eq!(max_id_from_rows(&[], "id").expect("empty table"), None);
    }

    #[test]
    fn unreadable_max_id_is_an_error() {
        for row in [json!({"id": null}), json!({"id": "n/a"}), json!({})] {
            let rows = [row.as_object().cloned().expect("object")];
            assert!(max_id_from_rows(&rows, "id").is_err(), "{row}");
        }
    }

    #[test]
    fn prefer_header_follows_ack_mode() {
        assert_eq!(prefer_header(InsertAck::Minimal), "return=minimal");
        assert_eq!(prefer_header(InsertAck::Representation), "return=representation");
    }

    #[test]
    fn snapshot_cells_accept_numbers_and_strings() {
        assert_eq!(cell_text(&json!(" 12 ")).as_deref(), Some("12"));
        assert_eq!(cell_text(&json!(12)).as_deref(), Some("12"));
        assert_eq!(cell_text(&Value::Null), None);
        assert_eq!(cell_id(&json!("41")), Some(41));
        assert_eq!(cell_id(&json!(41)), Some(41));
    }

    #[test]
    fn endpoint_targets_the_rest_table() {
        let store = SupabaseStore::new(config("event_id", "meet")).expect("store");
        assert_eq!(store.endpoint, "https://abc.supabase.co/rest/v1/lifting_results");
    }
}
