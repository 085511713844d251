use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use tracing::debug;

use super::{AssetRequest, AssetResponse, CacheError, ResponseKind};

/// Source of assets when the cache misses.
pub trait Network {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, CacheError>;
}

/// Fetches assets over HTTP relative to a fixed origin.
pub struct HttpNetwork {
    client: Client,
    origin: Url,
}

impl HttpNetwork {
    pub fn new(origin: &str) -> Result<Self, CacheError> {
        let origin = Url::parse(origin).map_err(|err| CacheError::InvalidRequest(err.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, origin })
    }
}

impl Network for HttpNetwork {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, CacheError> {
        let url = self
            .origin
            .join(&request.url)
            .map_err(|err| CacheError::InvalidRequest(err.to_string()))?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|err| CacheError::InvalidRequest(err.to_string()))?;
        let kind = if url.origin() == self.origin.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };

        debug!(%url, method = %method, "network fetch");
        let response = self.client.request(method, url).send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();

        Ok(AssetResponse {
            status,
            content_type,
            body,
            kind,
        })
    }
}
