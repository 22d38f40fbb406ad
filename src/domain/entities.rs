use std::{collections::BTreeMap, fmt};

/// Trait names published by the G-Bot collection.
pub mod traits {
    pub const ARMOR_SET: &str = "Armor Set";
    pub const COLORS: &str = "Colors";
    pub const EYES: &str = "Eyes";
    pub const HEAD: &str = "Head";
    pub const TORSO: &str = "Torso";
    pub const ARMS_TOP: &str = "Arms Top";
    pub const ARMS_BOTTOM: &str = "Arms Bottom";
    pub const LEGS_TOP: &str = "Legs Top";
    pub const LEGS_BOTTOM: &str = "Legs Bottom";
    pub const OUTER_BODY_TYPE: &str = "Outer Body Type";
    pub const INNER_BODY_TYPE: &str = "Inner Body Type";
    pub const ELEMENTS_TYPE: &str = "Elements Type";
    /// Present (with value `concealed`) on bots whose traits are hidden.
    pub const MODE: &str = "mode";
}

/// 1-based position of a bot inside the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BotIndex(u64);

impl BotIndex {
    pub fn new(index: u64) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    /// Parses user input. Anything but a positive base-10 integer is `None`.
    pub fn parse(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse::<u64>().ok().and_then(Self::new)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// 0-based offset used by the indexing service.
    pub fn offset(&self) -> u64 {
        self.0 - 1
    }
}

impl fmt::Display for BotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

impl Attribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreviewResolution {
    Tiny,
    Small,
    Medium,
    Large,
}

impl PreviewResolution {
    pub const ALL: [PreviewResolution; 4] = [
        PreviewResolution::Tiny,
        PreviewResolution::Small,
        PreviewResolution::Medium,
        PreviewResolution::Large,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            PreviewResolution::Tiny => "5x5",
            PreviewResolution::Small => "150x150",
            PreviewResolution::Medium => "500x500",
            PreviewResolution::Large => "1500x1500",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|res| res.tag() == tag)
    }
}

impl fmt::Display for PreviewResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A resolved G-Bot. The address is always in canonical form.
#[derive(Clone, Debug, PartialEq)]
pub struct BotItem {
    pub index: BotIndex,
    pub address: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
    pub previews: BTreeMap<PreviewResolution, String>,
}

impl BotItem {
    /// Value of the first attribute named `trait_type`.
    pub fn attribute(&self, trait_type: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.trait_type == trait_type)
            .map(|attr| attr.value.as_str())
    }

    pub fn has_trait(&self, trait_type: &str) -> bool {
        self.attribute(trait_type).is_some()
    }

    pub fn is_concealed(&self) -> bool {
        self.has_trait(traits::MODE)
    }

    pub fn preview(&self, resolution: PreviewResolution) -> Option<&str> {
        self.previews.get(&resolution).map(String::as_str)
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("G-Bot {}", self.index))
    }
}

/// Outcome of resolving one query.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Found(BotItem),
    /// The service returned no item at that offset.
    NotFound,
    /// The query was not a positive integer; nothing was requested.
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_index_accepts_positive_integers() {
        assert_eq!(BotIndex::parse("1").map(|i| i.offset()), Some(0));
        assert_eq!(BotIndex::parse(" 42 ").map(|i| i.offset()), Some(41));
        assert_eq!(BotIndex::parse("007").map(|i| i.get()), Some(7));
        assert_eq!(
            BotIndex::parse("99999999999").map(|i| i.offset()),
            Some(99_999_999_998)
        );
        assert_eq!(
            BotIndex::parse("4294967296").map(|i| i.offset()),
            Some(4_294_967_295)
        );
    }

    #[test]
    fn bot_index_rejects_everything_else() {
        for query in ["", "   ", "0", "-3", "+3", "abc", "12abc", "1.5"] {
            assert_eq!(BotIndex::parse(query), None, "query {query:?}");
        }
    }

    #[test]
    fn preview_tags_round_trip() {
        for res in PreviewResolution::ALL {
            assert_eq!(PreviewResolution::from_tag(res.tag()), Some(res));
        }
        assert_eq!(PreviewResolution::from_tag("64x64"), None);
    }

    #[test]
    fn first_attribute_wins_on_duplicate_names() {
        let item = BotItem {
            index: BotIndex::new(3).unwrap(),
            address: String::new(),
            name: None,
            description: None,
            attributes: vec![Attribute::new("Eyes", "Azure"), Attribute::new("Eyes", "Golden")],
            previews: BTreeMap::new(),
        };
        assert_eq!(item.attribute("Eyes"), Some("Azure"));
        assert!(!item.is_concealed());
        assert_eq!(item.display_name(), "G-Bot #3");
    }
}
