//! Cancellable JSON requests against the REST API.
//!
//! Every request takes a [`CancellationToken`]. A token cancelled before or
//! during the request yields [`ApiError::Cancelled`]; the response, if one
//! arrives later, is dropped. This lets a view that goes away stop caring
//! about its in-flight fetches without tracking a mounted flag.

use serde::de::DeserializeOwned;
use tabula_seeker::Row;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{error_message, ApiError, Result};

/// JSON client for the dashboard's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Creates a client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(ApiClient::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the URL for `path` with `query` appended.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.config.endpoint(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for &(key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// GETs `path` and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let url = self.url(path, &[])?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("GET {} cancelled", url);
                Err(ApiError::Cancelled)
            }
            result = self.send(url.clone()) => result,
        }
    }

    /// GETs a row collection.
    ///
    /// Accepts a bare JSON array or an envelope with the array under `data`.
    /// Non-object items are skipped.
    pub async fn fetch_rows(&self, path: &str, cancel: &CancellationToken) -> Result<Vec<Row>> {
        let body: serde_json::Value = self.get_json(path, cancel).await?;
        rows_from_json(body)
    }

    async fn send<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        log::debug!("GET {}", url);
        let mut request = self.http.get(url).header("Accept", "application/json");
        if let Some(token) = self.config.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(ApiError::http(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }
}

/// Extracts rows from a response body.
pub fn rows_from_json(body: serde_json::Value) -> Result<Vec<Row>> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut envelope) => match envelope.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(ApiError::Parse {
                    message: "expected an array or an object with a `data` array".into(),
                    body: None,
                })
            }
        },
        other => {
            return Err(ApiError::parse_with_body(
                "expected an array of rows",
                other.to_string(),
            ))
        }
    };

    let total = items.len();
    let rows: Vec<Row> = items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::Object(row) => Some(row),
            _ => None,
        })
        .collect();
    if rows.len() < total {
        log::warn!("skipped {} non-object rows", total - rows.len());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::new("http://127.0.0.1:9/api").unwrap())
    }

    #[test]
    fn url_with_and_without_query() {
        let c = client();
        assert_eq!(
            c.url("users", &[]).unwrap().as_str(),
            "http://127.0.0.1:9/api/users"
        );
        assert_eq!(
            c.url("/users", &[("search", "ann lee"), ("page", "2")])
                .unwrap()
                .as_str(),
            "http://127.0.0.1:9/api/users?search=ann+lee&page=2"
        );
    }

    #[test]
    fn rows_from_array_or_envelope() {
        let rows = rows_from_json(json!([{"a": 1}, 3, {"a": 2}])).unwrap();
        assert_eq!(rows.len(), 2);

        let rows = rows_from_json(json!({"data": [{"a": 1}], "total": 1})).unwrap();
        assert_eq!(rows.len(), 1);

        assert!(rows_from_json(json!({"items": []})).is_err());
        assert!(rows_from_json(json!("nope")).is_err());
    }

    #[tokio::test]
    async fn pre_cancelled_token_never_sends() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result: Result<serde_json::Value> = client().get_json("users", &cancel).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }
}
