use rust_decimal::{prelude::ToPrimitive, Decimal};
use thiserror::Error;

use super::entities::{traits, BotItem, PreviewResolution};

/// Mining value of a bot before any trait multiplier applies.
pub const BASE_MINING_VALUE: i64 = 500;

/// Per-trait multipliers, in tenths (`16` is x1.6). Values missing from a row
/// have no effect.
pub const MINING_MULTIPLIERS: &[(&str, &[(&str, i64)])] = &[
    (
        traits::ARMOR_SET,
        &[
            ("Set 01", 20),
            ("Set 02", 16),
            ("Set 03", 28),
            ("Progenitor", 100),
        ],
    ),
    (
        traits::ELEMENTS_TYPE,
        &[("Diamond", 39), ("Golden", 61), ("Shiny", 21)],
    ),
    (
        traits::EYES,
        &[
            ("Azure", 24),
            // Spelled as published in the collection's multiplier sheet.
            ("Funchia", 27),
            ("Scarlet", 30),
            ("Golden", 35),
        ],
    ),
    (traits::INNER_BODY_TYPE, &[("ABS", 15)]),
    (
        traits::OUTER_BODY_TYPE,
        &[("ABS", 17), ("Shiny", 25), ("SMMA", 26), ("Golden", 46)],
    ),
    (traits::COLORS, &[("Rare", 16)]),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreviewError {
    #[error("bot has no {0} preview")]
    MissingResolution(PreviewResolution),
}

fn lookup(values: &[(&str, i64)], value: &str) -> Option<Decimal> {
    values
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, tenths)| Decimal::new(*tenths, 1))
}

pub fn multiplier_for(trait_type: &str, value: &str) -> Option<Decimal> {
    MINING_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == trait_type)
        .and_then(|(_, values)| lookup(values, value))
}

/// Multipliers that apply to `item`, in table order.
pub fn applied_multipliers(item: &BotItem) -> Vec<(&'static str, Decimal)> {
    MINING_MULTIPLIERS
        .iter()
        .filter_map(|(trait_type, values)| {
            let value = item.attribute(trait_type)?;
            lookup(values, value).map(|multiplier| (*trait_type, multiplier))
        })
        .collect()
}

/// Floored mining value; `0` with no bot or a concealed bot.
///
/// Products are computed in decimal so `500 * 3.5 * 4.6` is exactly `8050`.
pub fn mining_value(item: Option<&BotItem>) -> u64 {
    let Some(item) = item else {
        return 0;
    };
    if item.is_concealed() {
        return 0;
    }

    applied_multipliers(item)
        .into_iter()
        .fold(Decimal::from(BASE_MINING_VALUE), |acc, (_, multiplier)| {
            acc * multiplier
        })
        .floor()
        .to_u64()
        .unwrap_or(0)
}

pub fn preview_url(item: &BotItem) -> Result<&str, PreviewError> {
    item.preview(PreviewResolution::Medium)
        .ok_or(PreviewError::MissingResolution(PreviewResolution::Medium))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::entities::{Attribute, BotIndex};

    fn bot(attributes: &[(&str, &str)]) -> BotItem {
        BotItem {
            index: BotIndex::new(1).unwrap(),
            address: "EQDgZmQpDJbO6laHvvibaXYXMlEAYEH6LnUtA5J19W18dENp".to_string(),
            name: Some("G-Bot".to_string()),
            description: None,
            attributes: attributes
                .iter()
                .map(|(name, value)| Attribute::new(*name, *value))
                .collect(),
            previews: PreviewResolution::ALL
                .into_iter()
                .map(|res| (res, format!("https://cache.example/{}.png", res.tag())))
                .collect(),
        }
    }

    #[test]
    fn no_bot_is_worth_nothing() {
        assert_eq!(mining_value(None), 0);
    }

    #[test]
    fn untabled_traits_keep_base_value() {
        let item = bot(&[("Head", "Visor"), ("Torso", "Plate"), ("Colors", "Common")]);
        assert_eq!(mining_value(Some(&item)), 500);
        assert!(applied_multipliers(&item).is_empty());
    }

    #[test]
    fn armor_and_colors_multiply() {
        let item = bot(&[("Armor Set", "Set 02"), ("Colors", "Rare")]);
        assert_eq!(mining_value(Some(&item)), 1280);
    }

    #[test]
    fn golden_eyes_and_body_multiply() {
        let item = bot(&[("Eyes", "Golden"), ("Outer Body Type", "Golden")]);
        assert_eq!(mining_value(Some(&item)), 8050);
    }

    #[test]
    fn concealed_bot_is_worth_nothing() {
        let item = bot(&[("mode", "concealed"), ("Armor Set", "Progenitor")]);
        assert_eq!(mining_value(Some(&item)), 0);

        let any_mode = bot(&[("Eyes", "Golden"), ("mode", "revealed")]);
        assert_eq!(mining_value(Some(&any_mode)), 0);
    }

    #[test]
    fn fractional_values_are_floored() {
        // 500 * 2.1 * 1.5 * 1.7 = 2677.5
        let item = bot(&[
            ("Elements Type", "Shiny"),
            ("Inner Body Type", "ABS"),
            ("Outer Body Type", "ABS"),
        ]);
        assert_eq!(mining_value(Some(&item)), 2677);

        // 500 * 1.6 * 2.6 * 1.5 * 1.6 = 4992
        let item = bot(&[
            ("Armor Set", "Set 02"),
            ("Outer Body Type", "SMMA"),
            ("Inner Body Type", "ABS"),
            ("Colors", "Rare"),
        ]);
        assert_eq!(mining_value(Some(&item)), 4992);
    }

    #[test]
    fn attribute_order_does_not_matter() {
        let forward = bot(&[
            ("Armor Set", "Set 03"),
            ("Eyes", "Scarlet"),
            ("Inner Body Type", "ABS"),
            ("Elements Type", "Diamond"),
        ]);
        let mut reversed = forward.clone();
        reversed.attributes.reverse();
        assert_eq!(
            mining_value(Some(&forward)),
            mining_value(Some(&reversed))
        );
    }

    #[test]
    fn table_order_does_not_matter() {
        let item = bot(&[
            ("Armor Set", "Set 01"),
            ("Elements Type", "Golden"),
            ("Eyes", "Azure"),
            ("Colors", "Rare"),
        ]);
        let base = Decimal::from(BASE_MINING_VALUE);
        let forward = applied_multipliers(&item)
            .into_iter()
            .fold(base, |acc, (_, m)| acc * m);
        let backward = applied_multipliers(&item)
            .into_iter()
            .rev()
            .fold(base, |acc, (_, m)| acc * m);
        assert_eq!(forward, backward);
        // 500 * 2 * 6.1 * 2.4 * 1.6
        assert_eq!(mining_value(Some(&item)), 23424);
    }

    #[test]
    fn scoring_is_idempotent_and_read_only() {
        let item = bot(&[("Armor Set", "Progenitor"), ("Eyes", "Golden")]);
        let snapshot = item.clone();
        let first = mining_value(Some(&item));
        let second = mining_value(Some(&item));
        assert_eq!(first, second);
        assert_eq!(first, 17500);
        assert_eq!(item, snapshot);
    }

    #[test]
    fn unknown_values_of_tabled_traits_have_no_effect() {
        assert_eq!(multiplier_for("Eyes", "Emerald"), None);
        assert_eq!(multiplier_for("Eyes", "Fuchsia"), None);
        assert_eq!(multiplier_for("Head", "Visor"), None);
        assert_eq!(
            multiplier_for("Armor Set", "Progenitor"),
            Some(Decimal::from(10))
        );
        assert_eq!(multiplier_for("Colors", "Rare"), Some(Decimal::new(16, 1)));
        let item = bot(&[("Eyes", "Emerald")]);
        assert_eq!(mining_value(Some(&item)), 500);
    }

    #[test]
    fn table_has_no_duplicate_traits_and_positive_multipliers() {
        let mut names: Vec<_> = MINING_MULTIPLIERS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MINING_MULTIPLIERS.len());
        assert!(MINING_MULTIPLIERS
            .iter()
            .flat_map(|(_, values)| values.iter())
            .all(|(_, tenths)| *tenths > 0));
    }

    #[test]
    fn preview_url_picks_medium_resolution() {
        let item = bot(&[]);
        assert_eq!(
            preview_url(&item),
            Ok("https://cache.example/500x500.png")
        );
    }

    #[test]
    fn missing_medium_preview_is_an_error() {
        let mut item = bot(&[]);
        item.previews = BTreeMap::from([(
            PreviewResolution::Large,
            "https://cache.example/1500.png".to_string(),
        )]);
        assert_eq!(
            preview_url(&item),
            Err(PreviewError::MissingResolution(PreviewResolution::Medium))
        );
    }
}
