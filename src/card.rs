//! View model for one item card and the actions it can emit.
//!
//! A [`Card`] is rebuilt from the favorites registry every frame, so every
//! rendered copy of an id (any tab, or the detail modal) agrees after a toggle.

use crate::favorites::FavoritesRegistry;
use crate::normalize::{DisplayItem, Rarity};

/// Leading columns of a card row that belong to the favorite toggle.
pub const FAVORITE_HIT_WIDTH: u16 = 2;

pub const FAVORITE_ON: &str = "♥";
pub const FAVORITE_OFF: &str = "♡";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceLabel {
    New,
    Offer {
        final_price: u32,
        /// Only set when the item is discounted.
        regular_price: Option<u32>,
    },
    /// Not in the current rotation.
    Unavailable,
}

impl PriceLabel {
    pub fn for_item(item: &DisplayItem) -> Self {
        if item.is_newly_added {
            return PriceLabel::New;
        }
        match item.price_final {
            Some(final_price) => PriceLabel::Offer {
                final_price,
                regular_price: item.price_regular.filter(|regular| final_price < *regular),
            },
            None => PriceLabel::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardBackground {
    Gradient((u8, u8, u8), (u8, u8, u8)),
    Rarity(Rarity),
}

impl CardBackground {
    pub fn for_item(item: &DisplayItem) -> Self {
        item.gradient_colors
            .as_ref()
            .and_then(|(from, to)| Some((parse_hex_color(from)?, parse_hex_color(to)?)))
            .map(|(from, to)| CardBackground::Gradient(from, to))
            .unwrap_or(CardBackground::Rarity(item.rarity))
    }
}

/// Parses `rrggbb`, with or without a leading `#`.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    OpenDetail(String),
    ToggleFavorite(String),
}

#[derive(Debug, Clone)]
pub struct Card<'a> {
    pub item: &'a DisplayItem,
    pub is_favorite: bool,
    pub price: PriceLabel,
    pub banner: Option<&'a str>,
    pub background: CardBackground,
}

pub fn render<'a>(item: &'a DisplayItem, favorites: &FavoritesRegistry) -> Card<'a> {
    Card {
        item,
        is_favorite: favorites.is_favorite(&item.id),
        price: PriceLabel::for_item(item),
        banner: item.banner_text.as_deref(),
        background: CardBackground::for_item(item),
    }
}

impl Card<'_> {
    pub fn on_click(&self) -> CardAction {
        CardAction::OpenDetail(self.item.id.clone())
    }

    pub fn on_favorite(&self) -> CardAction {
        CardAction::ToggleFavorite(self.item.id.clone())
    }

    /// Resolves a click at `column` (relative to the row start) to exactly
    /// one action. The favorite glyph never also opens the detail view.
    pub fn action_at(&self, column: u16) -> CardAction {
        if column < FAVORITE_HIT_WIDTH {
            self.on_favorite()
        } else {
            self.on_click()
        }
    }

    pub fn favorite_glyph(&self) -> &'static str {
        if self.is_favorite {
            FAVORITE_ON
        } else {
            FAVORITE_OFF
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryStore;

    fn item(id: &str) -> DisplayItem {
        DisplayItem {
            id: id.to_string(),
            display_name: "Item".to_string(),
            rarity: Rarity::Epic,
            ..Default::default()
        }
    }

    #[test]
    fn test_price_labels() {
        let mut it = item("a");
        assert_eq!(PriceLabel::for_item(&it), PriceLabel::Unavailable);

        it.price_final = Some(1200);
        it.price_regular = Some(1200);
        assert_eq!(
            PriceLabel::for_item(&it),
            PriceLabel::Offer {
                final_price: 1200,
                regular_price: None
            }
        );

        it.price_regular = Some(1500);
        assert_eq!(
            PriceLabel::for_item(&it),
            PriceLabel::Offer {
                final_price: 1200,
                regular_price: Some(1500)
            }
        );

        it.is_newly_added = true;
        assert_eq!(PriceLabel::for_item(&it), PriceLabel::New);
    }

    #[test]
    fn test_background_prefers_valid_gradient() {
        let mut it = item("a");
        assert_eq!(
            CardBackground::for_item(&it),
            CardBackground::Rarity(Rarity::Epic)
        );

        it.gradient_colors = Some(("ff0080".to_string(), "#00ff00".to_string()));
        assert_eq!(
            CardBackground::for_item(&it),
            CardBackground::Gradient((255, 0, 128), (0, 255, 0))
        );

        it.gradient_colors = Some(("zzzzzz".to_string(), "00ff00".to_string()));
        assert_eq!(
            CardBackground::for_item(&it),
            CardBackground::Rarity(Rarity::Epic)
        );
    }

    #[test]
    fn test_favorite_state_read_at_render_time() {
        let mut favorites = FavoritesRegistry::load(Box::new(MemoryStore::new()));
        let it = item("a");
        assert!(!render(&it, &favorites).is_favorite);

        favorites.toggle(&it).unwrap();
        let card = render(&it, &favorites);
        assert!(card.is_favorite);
        assert_eq!(card.favorite_glyph(), FAVORITE_ON);
    }

    #[test]
    fn test_action_at_splits_hit_regions() {
        let favorites = FavoritesRegistry::load(Box::new(MemoryStore::new()));
        let it = item("abc");
        let card = render(&it, &favorites);

        assert_eq!(card.action_at(0), CardAction::ToggleFavorite("abc".to_string()));
        assert_eq!(card.action_at(1), CardAction::ToggleFavorite("abc".to_string()));
        assert_eq!(card.action_at(2), CardAction::OpenDetail("abc".to_string()));
    }
}
