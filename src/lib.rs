//! Looks up G-Bots by their position in the collection and computes their
//! mining value from trait multipliers.

pub mod domain;
pub mod infra;
pub mod lookup;
pub mod util;

pub use domain::{
    mining_value, preview_url, AppState, Attribute, BotIndex, BotItem, PreviewError,
    PreviewResolution, Resolution, SlotUpdate,
};
pub use infra::address::{AddressError, TonAddress};
pub use infra::tonapi::{TonApiClient, TonApiError};
pub use lookup::{BotLookup, LookupError, LookupSession};
pub use util::config::{ConfigError, LookupConfig};
