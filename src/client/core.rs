// File: ./src/client/core.rs
use crate::client::cert;
use crate::client::error::ApiError;
use crate::config::Config;
use crate::model::{
    CheckedStateUpdate, ListSummary, NewItem, NewList, NewListResponse, ToDoList,
};

use hyper::body::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request, Uri};
use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

type HttpsClient =
    Client<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>, String>;

/// Everything outside RFC 3986 "unreserved" gets escaped inside a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const BODY_EXCERPT: usize = 200;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: HttpsClient,
    base: String,
    timeout: Duration,
}

impl ApiClient {
    /// `base_url` is scheme + authority (e.g. `http://127.0.0.1:3001`), `api_prefix`
    /// the path every endpoint hangs off (e.g. `/api`).
    pub fn new(base_url: &str, api_prefix: &str, insecure: bool) -> Result<Self, ApiError> {
        let uri: Uri = base_url.parse().map_err(|e: http::uri::InvalidUri| {
            ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            }
        })?;
        let requires_tls = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            _ => {
                return Err(ApiError::InvalidUrl {
                    url: base_url.to_string(),
                    reason: "expected an http:// or https:// url".to_string(),
                });
            }
        };

        let https_connector = cert::connector(insecure, requires_tls)?;
        let http = Client::builder(TokioExecutor::new()).build(https_connector);

        let prefix = api_prefix.trim_matches('/');
        let mut base = base_url.trim_end_matches('/').to_string();
        if !prefix.is_empty() {
            base.push('/');
            base.push_str(prefix);
        }

        Ok(Self {
            http,
            base,
            timeout: Duration::from_secs(10),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(
            &config.base_url,
            &config.api_prefix,
            config.allow_insecure_certs,
        )?
        .with_timeout(Duration::from_secs(config.request_timeout_secs.max(1))))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn list_summaries(&self) -> Result<Vec<ListSummary>, ApiError> {
        self.send(Method::GET, "/lists".to_string(), None).await
    }

    /// Any 2xx counts as created. The body is only read for logging, so an empty
    /// or unexpected body yields `Ok(None)`.
    pub async fn create_list(&self, name: &str) -> Result<Option<NewListResponse>, ApiError> {
        let body = encode(&NewList {
            name: name.to_string(),
        })?;
        let bytes = self
            .send_raw(Method::POST, "/lists".to_string(), Some(body))
            .await?;
        Ok(serde_json::from_slice(&bytes).ok())
    }

    /// Any 2xx counts as deleted, including a bodyless 204. Only an explicit
    /// `false` body means the server removed nothing.
    pub async fn delete_list(&self, list_id: &str) -> Result<bool, ApiError> {
        let path = format!("/lists/{}", segment(list_id));
        let bytes = self.send_raw(Method::DELETE, path, None).await?;
        Ok(serde_json::from_slice::<bool>(&bytes).unwrap_or(true))
    }

    pub async fn get_list(&self, list_id: &str) -> Result<ToDoList, ApiError> {
        let path = format!("/lists/{}", segment(list_id));
        self.send_snapshot(Method::GET, path, None).await
    }

    pub async fn create_item(&self, list_id: &str, label: &str) -> Result<ToDoList, ApiError> {
        let path = format!("/lists/{}/items/", segment(list_id));
        let body = encode(&NewItem {
            label: label.to_string(),
        })?;
        self.send_snapshot(Method::POST, path, Some(body)).await
    }

    pub async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<ToDoList, ApiError> {
        let path = format!("/lists/{}/items/{}", segment(list_id), segment(item_id));
        self.send_snapshot(Method::DELETE, path, None).await
    }

    pub async fn set_checked_state(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
    ) -> Result<ToDoList, ApiError> {
        let path = format!("/lists/{}/checked_state", segment(list_id));
        let body = encode(&CheckedStateUpdate {
            item_id: item_id.to_string(),
            checked_state: checked,
        })?;
        self.send_snapshot(Method::PATCH, path, Some(body)).await
    }

    /// The backend answers `null` when a list vanished between calls.
    async fn send_snapshot(
        &self,
        method: Method,
        path: String,
        body: Option<String>,
    ) -> Result<ToDoList, ApiError> {
        let list: Option<ToDoList> = self.send(method, path, body).await?;
        list.ok_or(ApiError::MissingList)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let bytes = self.send_raw(method, path, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// One round trip. Non-2xx becomes `ApiError::Status`; the body is returned undecoded.
    async fn send_raw(
        &self,
        method: Method,
        path: String,
        body: Option<String>,
    ) -> Result<Bytes, ApiError> {
        let url = format!("{}{}", self.base, path);
        debug!(%method, %url, "api request");

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(&url)
            .header(ACCEPT, "application/json");
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let req = builder.body(body.unwrap_or_default())?;

        let response = tokio::time::timeout(self.timeout, self.http.request(req))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout.as_secs()))??;

        let (parts, incoming) = response.into_parts();
        let bytes = incoming.collect().await?.to_bytes();
        debug!(%method, %url, status = %parts.status, len = bytes.len(), "api response");

        if !parts.status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            return Err(ApiError::Status {
                status: parts.status,
                body: text.chars().take(BODY_EXCERPT).collect(),
            });
        }
        Ok(bytes)
    }
}

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

fn encode<T: Serialize>(body: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_and_prefix_without_double_slashes() {
        let client = ApiClient::new("http://127.0.0.1:3001/", "/api/", false).unwrap();
        assert_eq!(client.base(), "http://127.0.0.1:3001/api");

        let bare = ApiClient::new("http://127.0.0.1:3001", "", false).unwrap();
        assert_eq!(bare.base(), "http://127.0.0.1:3001");
    }

    #[test]
    fn rejects_urls_without_http_scheme() {
        let err = ApiClient::new("ftp://example.org", "/api", false).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));

        let err = ApiClient::new("not a url", "/api", false).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn escapes_reserved_characters_in_path_segments() {
        assert_eq!(segment("it-9"), "it-9");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
        assert_eq!(segment("x?y#z"), "x%3Fy%23z");
    }
}
