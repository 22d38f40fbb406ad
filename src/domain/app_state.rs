use super::entities::{BotIndex, BotItem, Resolution};
use super::evaluation::{mining_value, preview_url, PreviewError};

/// Issued for every effective query. Only the newest ticket may update the
/// held bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    index: BotIndex,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index(&self) -> BotIndex {
        self.index
    }
}

/// What applying a resolution did to the held bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotUpdate {
    Replaced,
    /// Not found or ignored; the previous bot is kept.
    Unchanged,
    /// A newer query was issued while this one was in flight.
    Stale,
}

/// Holds at most one resolved bot.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    current: Option<BotItem>,
    issued: u64,
}

impl AppState {
    pub fn current(&self) -> Option<&BotItem> {
        self.current.as_ref()
    }

    pub fn issue(&mut self, index: BotIndex) -> Ticket {
        self.issued += 1;
        Ticket {
            generation: self.issued,
            index,
        }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.issued
    }

    pub fn apply(&mut self, ticket: Ticket, resolution: Resolution) -> SlotUpdate {
        if !self.is_latest(&ticket) {
            return SlotUpdate::Stale;
        }
        match resolution {
            Resolution::Found(item) => {
                self.current = Some(item);
                SlotUpdate::Replaced
            }
            Resolution::NotFound | Resolution::Ignored => SlotUpdate::Unchanged,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn mining_value(&self) -> u64 {
        mining_value(self.current.as_ref())
    }

    /// `Ok(None)` while no bot is held.
    pub fn preview_url(&self) -> Result<Option<&str>, PreviewError> {
        self.current.as_ref().map(preview_url).transpose()
    }
}
