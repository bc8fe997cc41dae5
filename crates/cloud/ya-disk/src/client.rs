//! Yandex Disk REST client.
//!
//! Wire contract:
//! - every API call carries `Authorization: OAuth <token>`
//! - `GET /` checks the token (401/403 means rejected)
//! - `GET /resources?path=P` describes a resource, `PUT /resources?path=P` creates a directory
//! - `GET /resources/upload?path=P&overwrite=false` reserves P and returns an upload `href`;
//!   409 means P exists, 423 means P is locked
//! - the bytes are then `PUT` to the `href` (no auth header)

use async_trait::async_trait;
use bytes::Bytes;
use loader_core::{ByteStream, StorageError};
use reqwest::header::AUTHORIZATION;
use reqwest::{Body, Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::backend::RemoteStorage;

#[derive(Debug, Clone)]
pub struct YaDiskClient {
    http: Client,
    api_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ResourceInfo {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct UploadLink {
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YaDiskClient {
    /// Creates a client for `api_url` (e.g. `https://cloud-api.yandex.net/v1/disk`).
    pub fn new(api_url: &str, token: &str) -> Result<Self, StorageError> {
        let http = Client::builder().build().map_err(transport)?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_url, endpoint)
    }

    fn auth(token: &str) -> String {
        format!("OAuth {token}")
    }

    async fn put_to_link(&self, body: Body, url: &str) -> Result<(), StorageError> {
        let response = self.http.put(url).body(body).send().await.map_err(transport)?;
        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(StorageError::path_exists(url)),
            StatusCode::LOCKED => Err(StorageError::locked(url)),
            _ => Err(api_error(response).await),
        }
    }
}

fn transport(e: reqwest::Error) -> StorageError {
    StorageError::Transport(e.to_string())
}

async fn api_error(response: Response) -> StorageError {
    let status = response.status().as_u16();
    let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
    StorageError::Api {
        status,
        message: body.message.or(body.description).unwrap_or_default(),
    }
}

#[async_trait]
impl RemoteStorage for YaDiskClient {
    async fn check_token(&self, token: &str) -> Result<bool, StorageError> {
        let response = self
            .http
            .get(self.url("/"))
            .header(AUTHORIZATION, Self::auth(token))
            .send()
            .await
            .map_err(transport)?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            _ => Err(api_error(response).await),
        }
    }

    async fn is_dir(&self, path: &str) -> Result<bool, StorageError> {
        let response = self
            .http
            .get(self.url("/resources"))
            .header(AUTHORIZATION, Self::auth(&self.token))
            .query(&[("path", path)])
            .send()
            .await
            .map_err(transport)?;
        match response.status() {
            s if s.is_success() => {
                let info: ResourceInfo = response.json().await.map_err(transport)?;
                Ok(info.kind == "dir")
            }
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(api_error(response).await),
        }
    }

    async fn mkdir(&self, path: &str) -> Result<(), StorageError> {
        let response = self
            .http
            .put(self.url("/resources"))
            .header(AUTHORIZATION, Self::auth(&self.token))
            .query(&[("path", path)])
            .send()
            .await
            .map_err(transport)?;
        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => {
                debug!(path, "Directory already exists");
                Ok(())
            }
            _ => Err(api_error(response).await),
        }
    }

    async fn upload_buffer(&self, bytes: Bytes, path: &str) -> Result<(), StorageError> {
        let url = self.request_upload_link(path).await?;
        self.put_to_link(Body::from(bytes), &url).await
    }

    async fn request_upload_link(&self, path: &str) -> Result<String, StorageError> {
        let response = self
            .http
            .get(self.url("/resources/upload"))
            .header(AUTHORIZATION, Self::auth(&self.token))
            .query(&[("path", path), ("overwrite", "false")])
            .send()
            .await
            .map_err(transport)?;
        match response.status() {
            s if s.is_success() => {
                let link: UploadLink = response.json().await.map_err(transport)?;
                Ok(link.href)
            }
            StatusCode::CONFLICT => Err(StorageError::path_exists(path)),
            StatusCode::LOCKED => Err(StorageError::locked(path)),
            _ => Err(api_error(response).await),
        }
    }

    async fn upload_by_link(&self, chunks: ByteStream, url: &str) -> Result<(), StorageError> {
        self.put_to_link(Body::wrap_stream(chunks), url).await
    }

    async fn close(&self) {
        info!(api_url = %self.api_url, "Yandex disk client closed");
    }
}
