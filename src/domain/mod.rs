//! Bot model, mining valuation and the single-bot holder.

pub mod app_state;
pub mod entities;
pub mod evaluation;

pub use app_state::{AppState, SlotUpdate, Ticket};
pub use entities::{traits, Attribute, BotIndex, BotItem, PreviewResolution, Resolution};
pub use evaluation::{
    applied_multipliers, mining_value, multiplier_for, preview_url, PreviewError,
    BASE_MINING_VALUE, MINING_MULTIPLIERS,
};
