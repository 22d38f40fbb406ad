//! Resolves query strings to bots and keeps the newest one.

use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        AppState, Attribute, BotIndex, BotItem, PreviewError, PreviewResolution, Resolution,
        SlotUpdate,
    },
    infra::{
        address::{AddressError, TonAddress},
        tonapi::{RawNftItem, TonApiClient, TonApiError},
    },
    util::config::LookupConfig,
};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Api(#[from] TonApiError),
    #[error("bot {index} has an unparseable address {raw:?}: {source}")]
    Address {
        index: BotIndex,
        raw: String,
        source: AddressError,
    },
}

/// Fetches one bot at a time from a fixed collection.
#[derive(Clone)]
pub struct BotLookup {
    client: TonApiClient,
    collection: String,
}

impl BotLookup {
    pub fn new(client: TonApiClient, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = TonApiClient::with_base_url(&config.base_url)?
            .with_api_key(config.api_key.clone())
            .with_timeout(config.timeout);
        Ok(Self::new(client, config.collection.clone()))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Invalid queries resolve to [`Resolution::Ignored`] without a request.
    pub async fn resolve(&self, query: &str) -> Result<Resolution, LookupError> {
        match parse_query(query) {
            Some(index) => self.resolve_index(index).await,
            None => Ok(Resolution::Ignored),
        }
    }

    pub async fn resolve_index(&self, index: BotIndex) -> Result<Resolution, LookupError> {
        let mut items = self
            .client
            .get_collection_items(&self.collection, 1, index.offset())
            .await?;

        if items.is_empty() {
            info!(%index, "no bot at this position");
            return Ok(Resolution::NotFound);
        }

        let bot = into_bot_item(index, items.swap_remove(0))?;
        info!(%index, address = %bot.address, "resolved bot");
        Ok(Resolution::Found(bot))
    }
}

fn parse_query(query: &str) -> Option<BotIndex> {
    let index = BotIndex::parse(query);
    if index.is_none() {
        debug!(query, "ignoring query that is not a positive integer");
    }
    index
}

fn into_bot_item(index: BotIndex, raw: RawNftItem) -> Result<BotItem, LookupError> {
    let address = TonAddress::parse(&raw.address)
        .map_err(|source| LookupError::Address {
            index,
            raw: raw.address.clone(),
            source,
        })?
        .to_canonical();

    let mut previews = BTreeMap::new();
    for preview in raw.previews {
        match PreviewResolution::from_tag(&preview.resolution) {
            Some(resolution) => {
                previews.entry(resolution).or_insert(preview.url);
            }
            None => debug!(tag = %preview.resolution, "skipping unknown preview resolution"),
        }
    }

    Ok(BotItem {
        index,
        address,
        name: raw.metadata.name,
        description: raw.metadata.description,
        attributes: raw
            .metadata
            .attributes
            .into_iter()
            .map(|attr| Attribute::new(attr.trait_type, attr.value))
            .collect(),
        previews,
    })
}

/// Query front-end for a caller that displays one bot at a time.
///
/// Clones share the held bot. A result that arrives after a newer query was
/// issued is discarded.
#[derive(Clone)]
pub struct LookupSession {
    lookup: BotLookup,
    state: Arc<Mutex<AppState>>,
}

impl LookupSession {
    pub fn new(lookup: BotLookup) -> Self {
        Self {
            lookup,
            state: Arc::new(Mutex::new(AppState::default())),
        }
    }

    /// Failures of a query that has since been superseded are reported as
    /// [`SlotUpdate::Stale`] rather than as errors.
    pub async fn submit(&self, query: &str) -> Result<SlotUpdate, LookupError> {
        let Some(index) = parse_query(query) else {
            return Ok(SlotUpdate::Unchanged);
        };

        let ticket = self.state.lock().await.issue(index);
        let resolution = match self.lookup.resolve_index(index).await {
            Ok(resolution) => resolution,
            Err(err) => {
                if !self.state.lock().await.is_latest(&ticket) {
                    warn!(%index, error = %err, "dropping failure of a superseded query");
                    return Ok(SlotUpdate::Stale);
                }
                warn!(%index, error = %err, "bot lookup failed");
                return Err(err);
            }
        };

        let update = self.state.lock().await.apply(ticket, resolution);
        if update == SlotUpdate::Stale {
            warn!(
                %index,
                generation = ticket.generation(),
                "dropping result superseded by a newer query"
            );
        }
        Ok(update)
    }

    pub async fn current(&self) -> Option<BotItem> {
        self.state.lock().await.current().cloned()
    }

    pub async fn mining_value(&self) -> u64 {
        self.state.lock().await.mining_value()
    }

    pub async fn preview_url(&self) -> Result<Option<String>, PreviewError> {
        self.state
            .lock()
            .await
            .preview_url()
            .map(|url| url.map(str::to_string))
    }

    pub async fn clear(&self) {
        self.state.lock().await.clear();
    }
}
