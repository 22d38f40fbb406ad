//! Thin asynchronous client for the tonapi v2 NFT endpoints.
//!
//! - Fetches collection items by offset.
//! - Decodes the loosely-typed item metadata into raw records; address
//!   normalization happens one layer up.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::debug;

use crate::util::version::user_agent;

pub const DEFAULT_BASE_URL: &str = "https://tonapi.io/";

#[derive(Debug, Error)]
pub enum TonApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

/// One entry of `nft_items` as tonapi returns it.
#[derive(Clone, Debug, Deserialize)]
pub struct RawNftItem {
    pub address: String,
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub previews: Vec<RawPreview>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub attributes: Vec<RawAttribute>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawAttribute {
    pub trait_type: String,
    #[serde(deserialize_with = "string_from_json")]
    pub value: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawPreview {
    pub resolution: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct NftItemsEnvelope {
    #[serde(default)]
    nft_items: Vec<RawNftItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

#[derive(Clone)]
pub struct TonApiClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl TonApiClient {
    pub fn new() -> Result<Self, TonApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, TonApiError> {
        let base_url = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };
        let http = Client::builder().user_agent(user_agent()).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: None,
            timeout: None,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET v2/nfts/collections/{collection}/items?limit=..&offset=..`
    pub async fn get_collection_items(
        &self,
        collection: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<RawNftItem>, TonApiError> {
        let mut url = self.url(&format!("v2/nfts/collections/{collection}/items"))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        debug!(%url, "requesting collection items");

        let envelope: NftItemsEnvelope = self.fetch_json(url).await?;
        Ok(envelope.nft_items)
    }

    async fn fetch_json<T>(&self, url: Url) -> Result<T, TonApiError>
    where
        T: DeserializeOwned,
    {
        let mut builder = self.http.get(url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    body
                }
            });
        Err(TonApiError::Api { status, message })
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

/// Trait values are strings in practice, but some collections publish numbers
/// or booleans.
fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Scalar;

    impl<'de> serde::de::Visitor<'de> for Scalar {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(Scalar)
}
