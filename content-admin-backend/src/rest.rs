//! REST implementation over the managed service.
//!
//! Tables are reached through the PostgREST endpoint (`/rest/v1/<table>`),
//! files through the storage endpoint (`/storage/v1/object/<bucket>/<path>`).
//! Every call is a single request: no retries and no partial results.

use crate::{ObjectStore, StoredObject, TableStore};
use async_trait::async_trait;
use bytes::Bytes;
use content_admin_error::{backend::BackendError, BackendResult};
use content_admin_models::{settings::Backend as BackendSettings, OrderSpec, RecordFields, RecordId};
use reqwest::{header, Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct RestBackend {
    http: Client,
    base_url: String,
    api_key: String,
    schema: String,
}

impl RestBackend {
    pub fn new(settings: &BackendSettings) -> BackendResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()
            .map_err(|e| BackendError::Fetch(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            schema: settings.schema.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach credentials and schema profile headers.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("Accept-Profile", &self.schema)
            .header("Content-Profile", &self.schema)
    }
}

/// Read a JSON body, turning transport errors and non-2xx statuses into
/// the error produced by `kind`.
async fn read_json<F>(response: reqwest::Result<Response>, kind: F) -> BackendResult<Value>
where
    F: Fn(String) -> BackendError,
{
    let response = check_status(response, &kind).await?;
    response.json::<Value>().await.map_err(|e| kind(e.to_string()))
}

async fn check_status<F>(response: reqwest::Result<Response>, kind: &F) -> BackendResult<Response>
where
    F: Fn(String) -> BackendError,
{
    let response = response.map_err(|e| kind(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(kind(format!("{status}: {body}")))
}

/// PostgREST answers writes with an array of affected rows.
fn first_row(table: &str, value: Value, kind: fn(String) -> BackendError) -> BackendResult<Value> {
    match value {
        Value::Array(rows) => rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(table.to_string())),
        Value::Object(_) => Ok(value),
        other => Err(kind(format!("unexpected response from `{table}`: {other}"))),
    }
}

#[async_trait]
impl TableStore for RestBackend {
    #[instrument(name = "rest-select", skip(self, order))]
    async fn select(&self, table: &str, order: &OrderSpec) -> BackendResult<Vec<Value>> {
        let mut query = vec![("select", "*".to_string())];
        if let Some(order) = order.to_query() {
            query.push(("order", order));
        }
        let response = self
            .authorize(self.http.get(self.table_url(table)))
            .query(&query)
            .send()
            .await;
        match read_json(response, BackendError::Fetch).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(BackendError::Fetch(format!(
                "`{table}` returned a non-array listing: {other}"
            ))),
        }
    }

    #[instrument(name = "rest-select-one", skip(self))]
    async fn select_by_id(&self, table: &str, id: RecordId) -> BackendResult<Option<Value>> {
        let response = self
            .authorize(self.http.get(self.table_url(table)))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))])
            .send()
            .await;
        match read_json(response, BackendError::Fetch).await? {
            Value::Array(rows) => Ok(rows.into_iter().next()),
            other => Err(BackendError::Fetch(format!(
                "`{table}` returned a non-array listing: {other}"
            ))),
        }
    }

    #[instrument(name = "rest-insert", skip(self, fields))]
    async fn insert(&self, table: &str, fields: RecordFields) -> BackendResult<Value> {
        let response = self
            .authorize(self.http.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&[Value::Object(fields)])
            .send()
            .await;
        let rows = read_json(response, BackendError::Write).await?;
        first_row(table, rows, BackendError::Write)
    }

    #[instrument(name = "rest-update", skip(self, fields))]
    async fn update(
        &self,
        table: &str,
        id: RecordId,
        fields: RecordFields,
    ) -> BackendResult<Value> {
        let response = self
            .authorize(self.http.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&Value::Object(fields))
            .send()
            .await;
        let rows = read_json(response, BackendError::Write).await?;
        first_row(table, rows, BackendError::Write)
            .map_err(|e| match e {
                BackendError::NotFound(_) => BackendError::NotFound(format!("{table}#{id}")),
                other => other,
            })
    }

    #[instrument(name = "rest-delete", skip(self))]
    async fn delete(&self, table: &str, id: RecordId) -> BackendResult<()> {
        let response = self
            .authorize(self.http.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .send()
            .await;
        check_status(response, &BackendError::Write).await?;
        debug!(table, id, "Deleted row");
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for RestBackend {
    #[instrument(name = "rest-upload", skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> BackendResult<StoredObject> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await;
        let body = read_json(response, BackendError::Upload).await?;
        let key = body
            .get("Key")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{bucket}/{path}"));
        Ok(StoredObject { key })
    }
}
