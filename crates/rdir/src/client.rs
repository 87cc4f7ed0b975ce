//! HTTP client for the reverse-directory push endpoint.

use crate::error::{RdirError, RdirResult};
use async_trait::async_trait;
use chunkdex_core::IndexRecord;
use chunkdex_core::config::RdirConfig;
use reqwest::{StatusCode, Url};
use serde::Serialize;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-oio-req-id";

const PUSH_PATH: &str = "/v1/rdir/push";

/// Destination of chunk index records.
///
/// Pushes are upserts: pushing the same record twice leaves the directory in
/// the same state as pushing it once.
#[async_trait]
pub trait DirectoryIndex: Send + Sync {
    async fn push(&self, record: &IndexRecord) -> RdirResult<()>;
}

#[derive(Serialize)]
struct PushRequest<'a> {
    container_id: &'a str,
    content_id: &'a str,
    chunk_id: &'a str,
    mtime: i64,
}

/// HTTP client for the reverse directory. One pooled connection manager is
/// shared by every push.
#[derive(Clone)]
pub struct RdirClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RdirClient {
    pub fn new(config: &RdirConfig) -> RdirResult<Self> {
        let base_url = Url::parse(config.url.trim()).map_err(|e| RdirError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_connections)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn push_url(&self, volume_id: &str) -> RdirResult<Url> {
        let mut url = self
            .base_url
            .join(PUSH_PATH)
            .map_err(|e| RdirError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("vol", volume_id);
        Ok(url)
    }
}

fn request_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("chunkdex-indexer-{}", &id[..16])
}

#[async_trait]
impl DirectoryIndex for RdirClient {
    async fn push(&self, record: &IndexRecord) -> RdirResult<()> {
        let url = self.push_url(&record.volume_id)?;
        let req_id = request_id();
        let body = PushRequest {
            container_id: &record.container_id,
            content_id: &record.content_id,
            chunk_id: record.chunk_id.as_str(),
            mtime: record.mtime,
        };

        tracing::trace!(
            req_id = %req_id,
            volume_id = %record.volume_id,
            chunk_id = %record.chunk_id,
            "Pushing chunk record"
        );

        let response = self
            .http
            .post(url)
            .header(REQUEST_ID_HEADER, &req_id)
            .json(&body)
            .send()
            .await
            .map_err(RdirError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(RdirError::VolumeNotFound {
                volume_id: record.volume_id.clone(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(RdirError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
