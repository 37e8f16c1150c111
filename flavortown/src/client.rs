use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Devlog, Project, StoreItem, User};
use crate::FlavortownURL;

/// Marker header identifying this client to the backend.
const EXTENSION_HEADER: &str = "X-Flavortown-Ext-2532";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const BODY_PREVIEW_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct FlavortownClient {
    http: reqwest::Client,
    base_url: FlavortownURL,
    api_key: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("connection error: {0}")]
    Connection(String),
    #[error("could not decode response: {message} (body: {preview})")]
    Decode { message: String, preview: String },
}

impl FlavortownClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_base(api_key, FlavortownURL::new())
    }

    pub fn with_base(
        api_key: impl Into<String>,
        base_url: FlavortownURL,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    /// Authorization header value for the configured key. A key already
    /// carrying a bearer prefix (any casing) passes through unchanged.
    fn auth_header(&self) -> Option<String> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return None;
        }
        let has_prefix = key
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "));
        if has_prefix {
            Some(key.to_string())
        } else {
            Some(format!("Bearer {key}"))
        }
    }

    async fn get_text(&self, url: impl AsRef<str>) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url.as_ref());
        let mut request = self
            .http
            .get(url.as_ref())
            .header(EXTENSION_HEADER, "true")
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-cache");
        if let Some(auth) = self.auth_header() {
            request = request.header(header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    pub async fn fetch_projects(&self) -> Result<Vec<Project>, FetchError> {
        let body = self.get_text(self.base_url.append_path("/projects")).await?;
        decode_list(&body, &["projects"])
    }

    pub async fn fetch_project(&self, id: i64) -> Result<Project, FetchError> {
        let body = self
            .get_text(self.base_url.append_path(&format!("/projects/{id}")))
            .await?;
        decode_one(&body, &["project"])
    }

    pub async fn fetch_devlogs(&self, project_id: i64) -> Result<Vec<Devlog>, FetchError> {
        let body = self
            .get_text(
                self.base_url
                    .append_path(&format!("/projects/{project_id}/devlogs")),
            )
            .await?;
        decode_list(&body, &["devlogs"])
    }

    pub async fn fetch_store_items(&self) -> Result<Vec<StoreItem>, FetchError> {
        let body = self.get_text(self.base_url.append_path("/store")).await?;
        decode_list(&body, &["items", "store_items", "store"])
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        let body = self.get_text(self.base_url.append_path("/users")).await?;
        decode_list(&body, &["users"])
    }

    pub async fn fetch_user(&self, id: i64) -> Result<User, FetchError> {
        let body = self
            .get_text(self.base_url.append_path(&format!("/users/{id}")))
            .await?;
        decode_one(&body, &["user"])
    }
}

fn decode_error(message: String, body: &str) -> FetchError {
    FetchError::Decode {
        message,
        preview: body.chars().take(BODY_PREVIEW_LEN).collect(),
    }
}

/// Decode a list endpoint body, trying each wrapper key in order before
/// falling back to a bare JSON array.
fn decode_list<T: DeserializeOwned>(body: &str, keys: &[&str]) -> Result<Vec<T>, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| decode_error(e.to_string(), body))?;

    let mut candidates: Vec<&Value> = keys.iter().filter_map(|key| value.get(key)).collect();
    candidates.push(&value);

    let mut last_error = format!("no candidate shape matched (tried keys {keys:?})");
    for candidate in candidates {
        match serde_json::from_value(candidate.clone()) {
            Ok(list) => return Ok(list),
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(decode_error(last_error, body))
}

/// Decode a single-entity endpoint body, trying each wrapper key in order
/// before falling back to a bare JSON object.
fn decode_one<T: DeserializeOwned>(body: &str, keys: &[&str]) -> Result<T, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| decode_error(e.to_string(), body))?;

    let mut candidates: Vec<&Value> = keys.iter().filter_map(|key| value.get(key)).collect();
    candidates.push(&value);

    let mut last_error = format!("no candidate shape matched (tried keys {keys:?})");
    for candidate in candidates {
        match serde_json::from_value(candidate.clone()) {
            Ok(entity) => return Ok(entity),
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(decode_error(last_error, body))
}
