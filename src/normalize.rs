//! Converts heterogeneous upstream records into [`DisplayItem`]s.
//!
//! Normalization never fails: absent or malformed fields degrade to
//! defaults so one broken record cannot block the rest of a listing.

use std::fmt;
use std::hash::Hasher;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use twox_hash::XxHash64;

use crate::model::{RawCatalogEntry, ShopOffer};

/// Upstream category a [`DisplayItem`] was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Bundle,
    BrItem,
    Track,
    Car,
    Instrument,
    Lego,
    LegoKit,
    Bean,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Category {
    /// Stable machine key, matching the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Category::Bundle => "bundle",
            Category::BrItem => "brItem",
            Category::Track => "track",
            Category::Car => "car",
            Category::Instrument => "instrument",
            Category::Lego => "lego",
            Category::LegoKit => "legoKit",
            Category::Bean => "bean",
            Category::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Bundle => "Bundle",
            Category::BrItem => "Battle Royale",
            Category::Track => "Jam Track",
            Category::Car => "Car",
            Category::Instrument => "Instrument",
            Category::Lego => "LEGO",
            Category::LegoKit => "LEGO Kit",
            Category::Bean => "Bean",
            Category::Unknown => "Unknown",
        }
    }

    /// Name shown when the upstream record carries none.
    pub fn placeholder_name(self) -> &'static str {
        match self {
            Category::Bundle => "Bundle",
            Category::BrItem => "Cosmetic",
            Category::Track => "Jam Track",
            Category::Car => "Car",
            Category::Instrument => "Instrument",
            Category::Lego => "LEGO Item",
            Category::LegoKit => "LEGO Kit",
            Category::Bean => "Bean",
            Category::Unknown => "Unknown Item",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Icon,
    #[serde(other)]
    Unknown,
}

impl Rarity {
    /// Maps an upstream `rarity.value` string. Series rarities the card
    /// palette has no color for (marvel, dc, ...) become `Unknown`.
    pub fn from_upstream(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "common" => Rarity::Common,
            "uncommon" => Rarity::Uncommon,
            "rare" => Rarity::Rare,
            "epic" => Rarity::Epic,
            "legendary" => Rarity::Legendary,
            "icon" => Rarity::Icon,
            _ => Rarity::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Icon => "Icon Series",
            Rarity::Unknown => "Unknown",
        }
    }
}

/// The uniform record every view renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayItem {
    pub id: String,
    pub category: Category,
    pub display_name: String,
    pub image_url: Option<String>,
    pub rarity: Rarity,
    /// `None` means the item is not in the current shop rotation.
    pub price_final: Option<u32>,
    pub price_regular: Option<u32>,
    pub is_newly_added: bool,
    pub banner_text: Option<String>,
    pub added_date: Option<DateTime<Utc>>,
    /// Six-digit hex pair, overriding rarity styling when present.
    pub gradient_colors: Option<(String, String)>,
    pub description: Option<String>,
    /// Lower-cased `type.value` (outfit, emote, pickaxe...).
    pub item_type: Option<String>,
    pub type_label: Option<String>,
    pub set_text: Option<String>,
    pub introduction: Option<String>,
    pub artist: Option<String>,
}

/// Where an entry was encountered.
#[derive(Debug, Clone, Copy)]
pub enum EntryContext<'a> {
    Shop(&'a ShopOffer),
    NewItem,
    Catalog,
}

impl EntryContext<'_> {
    pub fn is_new_item(&self) -> bool {
        matches!(self, EntryContext::NewItem)
    }

    fn offer(&self) -> Option<&ShopOffer> {
        match self {
            EntryContext::Shop(offer) => Some(offer),
            _ => None,
        }
    }
}

/// Name, image and rarity resolved from one category shape.
struct Resolved {
    category: Category,
    id: Option<String>,
    name: Option<String>,
    image: Option<String>,
    rarity: Rarity,
}

pub fn normalize(entry: &RawCatalogEntry, context: &EntryContext<'_>) -> DisplayItem {
    let resolved = match entry {
        RawCatalogEntry::Bundle(v) => resolve_bundle(v, context.offer()),
        RawCatalogEntry::BrItem(v) => resolve_br_item(v),
        RawCatalogEntry::Track(v) => resolve_track(v),
        RawCatalogEntry::Car(v) => resolve_sized(v, Category::Car, rarity_of(v)),
        RawCatalogEntry::Instrument(v) => resolve_sized(v, Category::Instrument, rarity_of(v)),
        RawCatalogEntry::Lego(v) => resolve_sized(v, Category::Lego, Rarity::Common),
        RawCatalogEntry::LegoKit(v) => resolve_sized(v, Category::LegoKit, Rarity::Common),
        RawCatalogEntry::Bean(v) => resolve_sized(v, Category::Bean, Rarity::Common),
        RawCatalogEntry::Unrecognized(_) => Resolved {
            category: Category::Unknown,
            id: None,
            name: None,
            image: None,
            rarity: Rarity::Common,
        },
    };

    finish(resolved, entry.value(), context)
}

fn resolve_bundle(value: &Value, offer: Option<&ShopOffer>) -> Resolved {
    Resolved {
        category: Category::Bundle,
        id: offer.and_then(|o| o.offer_id.clone()),
        name: string_at(value, "/name"),
        image: string_at(value, "/image"),
        rarity: Rarity::Common,
    }
}

fn resolve_br_item(value: &Value) -> Resolved {
    Resolved {
        category: Category::BrItem,
        id: string_at(value, "/id"),
        name: string_at(value, "/name"),
        image: first_string(
            value,
            &["/images/featured", "/images/icon", "/images/smallIcon"],
        ),
        rarity: rarity_of(value),
    }
}

fn resolve_track(value: &Value) -> Resolved {
    Resolved {
        category: Category::Track,
        id: string_at(value, "/id"),
        name: string_at(value, "/title"),
        image: string_at(value, "/albumArt"),
        rarity: Rarity::Icon,
    }
}

/// Shapes with `images.large` / `images.small` (cars, instruments, lego, beans).
fn resolve_sized(value: &Value, category: Category, rarity: Rarity) -> Resolved {
    Resolved {
        category,
        id: string_at(value, "/id"),
        name: string_at(value, "/name"),
        image: first_string(value, &["/images/large", "/images/small"]),
        rarity,
    }
}

fn finish(resolved: Resolved, value: &Value, context: &EntryContext<'_>) -> DisplayItem {
    let Resolved {
        category,
        id,
        name,
        mut image,
        rarity,
    } = resolved;

    let display_name = name.unwrap_or_else(|| category.placeholder_name().to_string());
    let offer = context.offer();

    if let Some(render) = offer.and_then(|o| o.render_image.clone()) {
        image = Some(render);
    }

    let id = id.unwrap_or_else(|| fallback_id(category, &display_name, image.as_deref()));

    let gradient_colors = offer.and_then(|o| o.colors.as_ref()).map(|(c1, c3)| {
        (
            c1.chars().take(6).collect::<String>(),
            c3.chars().take(6).collect::<String>(),
        )
    });

    let is_newly_added = context.is_new_item();
    let banner_text = offer
        .and_then(|o| o.banner.clone())
        .or_else(|| is_newly_added.then(|| "NEW".to_string()));

    DisplayItem {
        id,
        category,
        display_name,
        image_url: image,
        rarity,
        price_final: offer.and_then(|o| o.final_price),
        price_regular: offer.and_then(|o| o.regular_price),
        is_newly_added,
        banner_text,
        added_date: string_at(value, "/added").and_then(|raw| parse_added(&raw)),
        gradient_colors,
        description: string_at(value, "/description"),
        item_type: string_at(value, "/type/value").map(|t| t.to_lowercase()),
        type_label: string_at(value, "/type/displayValue"),
        set_text: string_at(value, "/set/text"),
        introduction: string_at(value, "/introduction/text"),
        artist: string_at(value, "/artist"),
    }
}

/// Deterministic id for records without a natural one, so favorites keep
/// matching the same entry across fetches.
fn fallback_id(category: Category, name: &str, image: Option<&str>) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(category.key().as_bytes());
    hasher.write(&[0]);
    hasher.write(name.as_bytes());
    hasher.write(&[0]);
    hasher.write(image.unwrap_or_default().as_bytes());
    format!("{}-{:016x}", category.key(), hasher.finish())
}

fn parse_added(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn rarity_of(value: &Value) -> Rarity {
    string_at(value, "/rarity/value")
        .map(|r| Rarity::from_upstream(&r))
        .unwrap_or_default()
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_string(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| string_at(value, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShopEntry;
    use serde_json::json;

    fn shop_item(entry: Value) -> DisplayItem {
        let entry = ShopEntry::from_value(&entry);
        normalize(&entry.item, &EntryContext::Shop(&entry.offer))
    }

    #[test]
    fn test_br_item_fields() {
        let raw = RawCatalogEntry::BrItem(json!({
            "id": "CID_028_Athena_Commando_F",
            "name": "Renegade Raider",
            "description": "Rare renegade raider outfit.",
            "type": {"value": "Outfit", "displayValue": "Outfit"},
            "rarity": {"value": "Rare"},
            "set": {"text": "Part of the Raider set."},
            "introduction": {"text": "Introduced in Chapter 1, Season 1."},
            "images": {"icon": "icon.png", "smallIcon": "small.png"},
            "added": "2017-09-26T12:00:00Z"
        }));
        let item = normalize(&raw, &EntryContext::Catalog);

        assert_eq!(item.id, "CID_028_Athena_Commando_F");
        assert_eq!(item.category, Category::BrItem);
        assert_eq!(item.display_name, "Renegade Raider");
        assert_eq!(item.image_url.as_deref(), Some("icon.png"));
        assert_eq!(item.rarity, Rarity::Rare);
        assert_eq!(item.item_type.as_deref(), Some("outfit"));
        assert_eq!(item.set_text.as_deref(), Some("Part of the Raider set."));
        assert!(item.added_date.is_some());
        assert_eq!(item.price_final, None);
        assert!(!item.is_newly_added);
    }

    #[test]
    fn test_track_uses_title_and_icon_rarity() {
        let raw = RawCatalogEntry::Track(json!({
            "id": "sid_placeholder_1",
            "title": "Butter Barn Hoedown",
            "artist": "Epic Games",
            "albumArt": "art.png",
            "rarity": {"value": "common"}
        }));
        let item = normalize(&raw, &EntryContext::Catalog);
        assert_eq!(item.display_name, "Butter Barn Hoedown");
        assert_eq!(item.image_url.as_deref(), Some("art.png"));
        assert_eq!(item.rarity, Rarity::Icon);
        assert_eq!(item.artist.as_deref(), Some("Epic Games"));
    }

    #[test]
    fn test_lego_placeholder_and_common_rarity() {
        let raw = RawCatalogEntry::Lego(json!({
            "id": "lego_1",
            "cosmeticId": "CID_1",
            "images": {"small": "small.png"},
            "rarity": {"value": "legendary"}
        }));
        let item = normalize(&raw, &EntryContext::Catalog);
        assert_eq!(item.display_name, "LEGO Item");
        assert_eq!(item.rarity, Rarity::Common);
        assert_eq!(item.image_url.as_deref(), Some("small.png"));
    }

    #[test]
    fn test_every_shape_has_category_and_stable_id() {
        let offer = ShopOffer {
            offer_id: Some("v2:/offer-1".to_string()),
            ..Default::default()
        };
        let bare = ShopOffer::default();
        let with_id = json!({"id": "natural_1", "name": "Named", "title": "Named"});
        let without_id = json!({"name": "Nameless", "images": {"small": "s.png"}});

        let cases: Vec<(RawCatalogEntry, EntryContext<'_>, Option<&str>)> = vec![
            (RawCatalogEntry::Bundle(with_id.clone()), EntryContext::Shop(&offer), Some("v2:/offer-1")),
            (RawCatalogEntry::Bundle(without_id.clone()), EntryContext::Shop(&bare), None),
            (RawCatalogEntry::BrItem(with_id.clone()), EntryContext::Catalog, Some("natural_1")),
            (RawCatalogEntry::BrItem(without_id.clone()), EntryContext::Catalog, None),
            (RawCatalogEntry::Track(with_id.clone()), EntryContext::Catalog, Some("natural_1")),
            (RawCatalogEntry::Track(without_id.clone()), EntryContext::NewItem, None),
            (RawCatalogEntry::Car(with_id.clone()), EntryContext::Catalog, Some("natural_1")),
            (RawCatalogEntry::Car(without_id.clone()), EntryContext::Catalog, None),
            (RawCatalogEntry::Instrument(with_id.clone()), EntryContext::Catalog, Some("natural_1")),
            (RawCatalogEntry::Instrument(without_id.clone()), EntryContext::Catalog, None),
            (RawCatalogEntry::Lego(with_id.clone()), EntryContext::Catalog, Some("natural_1")),
            (RawCatalogEntry::Lego(without_id.clone()), EntryContext::Catalog, None),
            (RawCatalogEntry::LegoKit(with_id.clone()), EntryContext::Catalog, Some("natural_1")),
            (RawCatalogEntry::LegoKit(without_id.clone()), EntryContext::Catalog, None),
            (RawCatalogEntry::Bean(with_id.clone()), EntryContext::Catalog, Some("natural_1")),
            (RawCatalogEntry::Bean(without_id.clone()), EntryContext::Catalog, None),
            (RawCatalogEntry::Unrecognized(with_id.clone()), EntryContext::Catalog, None),
            (RawCatalogEntry::Unrecognized(json!({})), EntryContext::Catalog, None),
        ];

        for (raw, context, natural) in &cases {
            let first = normalize(raw, context);
            let second = normalize(raw, context);
            assert_eq!(first, second, "{raw:?}");
            assert!(!first.category.key().is_empty());
            assert!(!first.id.is_empty());
            assert!(!first.display_name.is_empty());
            match natural {
                Some(id) => assert_eq!(first.id, *id),
                None => assert!(
                    first.id.starts_with(&format!("{}-", first.category.key())),
                    "{}",
                    first.id
                ),
            }
        }
    }

    #[test]
    fn test_missing_rarity_defaults_to_common() {
        let raw = RawCatalogEntry::Car(json!({"id": "car_1", "name": "Octane"}));
        let item = normalize(&raw, &EntryContext::Catalog);
        assert_eq!(item.rarity, Rarity::Common);
        assert_eq!(item.image_url, None);
    }

    #[test]
    fn test_unknown_rarity_maps_to_unknown() {
        let raw = RawCatalogEntry::BrItem(json!({"id": "x", "rarity": {"value": "Marvel"}}));
        assert_eq!(normalize(&raw, &EntryContext::Catalog).rarity, Rarity::Unknown);
    }

    #[test]
    fn test_render_image_overrides_category_image() {
        let item = shop_item(json!({
            "newDisplayAsset": {"renderImages": [{"image": "render.png"}]},
            "brItems": [{"id": "CID_1", "images": {"featured": "featured.png"}}]
        }));
        assert_eq!(item.image_url.as_deref(), Some("render.png"));
    }

    #[test]
    fn test_gradient_truncated_to_six_digits() {
        let item = shop_item(json!({
            "colors": {"color1": "aa11ccff", "color3": "001122ff"},
            "brItems": [{"id": "CID_1"}]
        }));
        assert_eq!(
            item.gradient_colors,
            Some(("aa11cc".to_string(), "001122".to_string()))
        );
    }

    #[test]
    fn test_prices_only_in_shop_context() {
        let entry = ShopEntry::from_value(&json!({
            "finalPrice": 1200,
            "regularPrice": 1500,
            "brItems": [{"id": "CID_1", "name": "Outfit"}]
        }));

        let shop = normalize(&entry.item, &EntryContext::Shop(&entry.offer));
        assert_eq!(shop.price_final, Some(1200));
        assert_eq!(shop.price_regular, Some(1500));

        let catalog = normalize(&entry.item, &EntryContext::Catalog);
        assert_eq!(catalog.price_final, None);
        assert_eq!(catalog.price_regular, None);
        assert_eq!(catalog.id, shop.id);
    }

    #[test]
    fn test_new_item_gets_banner() {
        let raw = RawCatalogEntry::Bean(json!({"id": "bean_1", "name": "Jelly"}));
        let item = normalize(&raw, &EntryContext::NewItem);
        assert!(item.is_newly_added);
        assert_eq!(item.banner_text.as_deref(), Some("NEW"));
        assert_eq!(item.price_final, None);
    }

    #[test]
    fn test_bundle_uses_offer_id() {
        let item = shop_item(json!({
            "offerId": "v2:/bundle-offer",
            "bundle": {"name": "Starter Pack", "image": "bundle.png"},
            "banner": {"value": "Sale"}
        }));
        assert_eq!(item.id, "v2:/bundle-offer");
        assert_eq!(item.category, Category::Bundle);
        assert_eq!(item.banner_text.as_deref(), Some("Sale"));
    }

    #[test]
    fn test_fallback_id_is_deterministic() {
        let raw = RawCatalogEntry::Instrument(json!({
            "name": "Keytar",
            "images": {"large": "keytar.png"}
        }));
        let first = normalize(&raw, &EntryContext::Catalog);
        let second = normalize(&raw.clone(), &EntryContext::NewItem);
        assert_eq!(first.id, second.id);
        assert!(first.id.starts_with("instrument-"));

        let other = RawCatalogEntry::Instrument(json!({"name": "Drums"}));
        assert_ne!(normalize(&other, &EntryContext::Catalog).id, first.id);
    }

    #[test]
    fn test_unrecognized_never_fails() {
        let item = normalize(
            &RawCatalogEntry::Unrecognized(json!({"weird": true})),
            &EntryContext::Catalog,
        );
        assert_eq!(item.category, Category::Unknown);
        assert_eq!(item.display_name, "Unknown Item");
        assert!(!item.id.is_empty());
    }

    #[test]
    fn test_wrong_field_types_degrade() {
        let raw = RawCatalogEntry::BrItem(json!({
            "id": 42,
            "name": ["not", "a", "string"],
            "images": "nope",
            "added": "yesterday"
        }));
        let item = normalize(&raw, &EntryContext::Catalog);
        assert_eq!(item.display_name, "Cosmetic");
        assert!(item.id.starts_with("brItem-"));
        assert_eq!(item.added_date, None);
    }

    #[test]
    fn test_display_item_lenient_deserialization() {
        let item: DisplayItem = serde_json::from_value(json!({"id": "only-id"})).unwrap();
        assert_eq!(item.id, "only-id");
        assert_eq!(item.category, Category::Unknown);
        assert_eq!(item.rarity, Rarity::Common);

        let item: DisplayItem =
            serde_json::from_value(json!({"id": "x", "category": "spaceship", "rarity": "mythic"}))
                .unwrap();
        assert_eq!(item.category, Category::Unknown);
        assert_eq!(item.rarity, Rarity::Unknown);
    }
}
