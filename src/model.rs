//! Wire-level data model for the cosmetics API, shared by both runtimes.
//!
//! Upstream records are loosely typed: every field may be missing and the
//! item shape depends on the category. Item payloads stay as raw JSON inside
//! [`RawCatalogEntry`]; only the envelopes and listing wrappers are typed.

use serde::Deserialize;
use serde_json::Value;

/// One upstream catalog record, tagged by the category it was found under.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCatalogEntry {
    Bundle(Value),
    BrItem(Value),
    Track(Value),
    Car(Value),
    Instrument(Value),
    Lego(Value),
    LegoKit(Value),
    Bean(Value),
    /// A record that matched none of the known shapes.
    Unrecognized(Value),
}

impl RawCatalogEntry {
    /// The raw JSON payload of the entry.
    pub fn value(&self) -> &Value {
        match self {
            RawCatalogEntry::Bundle(v)
            | RawCatalogEntry::BrItem(v)
            | RawCatalogEntry::Track(v)
            | RawCatalogEntry::Car(v)
            | RawCatalogEntry::Instrument(v)
            | RawCatalogEntry::Lego(v)
            | RawCatalogEntry::LegoKit(v)
            | RawCatalogEntry::Bean(v)
            | RawCatalogEntry::Unrecognized(v) => v,
        }
    }
}

/// Keys checked on a shop entry, in resolution order.
const SHOP_ITEM_KEYS: &[&str] = &[
    "brItems",
    "tracks",
    "cars",
    "instruments",
    "lego",
    "legoKits",
    "beans",
];

/// Offer-level metadata attached to an entry of the daily shop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopOffer {
    pub offer_id: Option<String>,
    pub final_price: Option<u32>,
    pub regular_price: Option<u32>,
    pub banner: Option<String>,
    /// First 3D render image of `newDisplayAsset`, if any.
    pub render_image: Option<String>,
    /// `colors.color1` / `colors.color3`, both required.
    pub colors: Option<(String, String)>,
    pub section_name: Option<String>,
    pub section_rank: Option<i64>,
}

/// A daily shop entry split into its offer metadata and the item it sells.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopEntry {
    pub offer: ShopOffer,
    pub item: RawCatalogEntry,
}

impl ShopEntry {
    /// Classifies a raw shop entry. The first matching shape wins:
    /// bundle, then the item lists in [`SHOP_ITEM_KEYS`] order.
    pub fn from_value(value: &Value) -> Self {
        let offer = ShopOffer::from_value(value);

        if let Some(bundle) = value.get("bundle").filter(|b| b.is_object()) {
            return Self {
                offer,
                item: RawCatalogEntry::Bundle(bundle.clone()),
            };
        }

        for key in SHOP_ITEM_KEYS {
            if let Some(first) = value
                .get(*key)
                .and_then(|v| v.as_array())
                .and_then(|items| items.first())
            {
                let item = match *key {
                    "brItems" => RawCatalogEntry::BrItem(first.clone()),
                    "tracks" => RawCatalogEntry::Track(first.clone()),
                    "cars" => RawCatalogEntry::Car(first.clone()),
                    "instruments" => RawCatalogEntry::Instrument(first.clone()),
                    "lego" => RawCatalogEntry::Lego(first.clone()),
                    "legoKits" => RawCatalogEntry::LegoKit(first.clone()),
                    _ => RawCatalogEntry::Bean(first.clone()),
                };
                return Self { offer, item };
            }
        }

        Self {
            offer,
            item: RawCatalogEntry::Unrecognized(value.clone()),
        }
    }
}

impl ShopOffer {
    fn from_value(value: &Value) -> Self {
        let string_at = |pointer: &str| {
            value
                .pointer(pointer)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        let colors = match (string_at("/colors/color1"), string_at("/colors/color3")) {
            (Some(c1), Some(c3)) if !c1.is_empty() && !c3.is_empty() => Some((c1, c3)),
            _ => None,
        };

        Self {
            offer_id: string_at("/offerId"),
            final_price: price_at(value, "finalPrice"),
            regular_price: price_at(value, "regularPrice"),
            banner: string_at("/banner/value"),
            render_image: string_at("/newDisplayAsset/renderImages/0/image"),
            colors,
            section_name: string_at("/layout/name"),
            section_rank: value.pointer("/layout/rank").and_then(|v| v.as_i64()),
        }
    }
}

fn price_at(value: &Value, key: &str) -> Option<u32> {
    value
        .get(key)
        .and_then(|v| v.as_u64())
        .and_then(|p| u32::try_from(p).ok())
}

/// Response envelope wrapping every payload of the API.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// `data` of `/v2/shop`.
#[derive(Debug, Deserialize, Default)]
pub struct ShopData {
    /// Date of the current rotation.
    pub date: Option<String>,
    #[serde(default)]
    pub entries: Vec<Value>,
}

impl ShopData {
    pub fn shop_entries(&self) -> Vec<ShopEntry> {
        self.entries.iter().map(ShopEntry::from_value).collect()
    }
}

/// Cosmetics split by category, as returned by `/v2/cosmetics` and nested in
/// `/v2/cosmetics/new`.
#[derive(Debug, Deserialize, Default)]
pub struct CosmeticsByCategory {
    #[serde(default)]
    pub br: Vec<Value>,
    #[serde(default)]
    pub tracks: Vec<Value>,
    #[serde(default)]
    pub instruments: Vec<Value>,
    #[serde(default)]
    pub cars: Vec<Value>,
    #[serde(default)]
    pub lego: Vec<Value>,
    #[serde(default, rename = "legoKits")]
    pub lego_kits: Vec<Value>,
    #[serde(default)]
    pub beans: Vec<Value>,
}

/// Presentation group of a category listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryGroup {
    pub title: &'static str,
}

impl CosmeticsByCategory {
    /// Consumes the listing into titled groups, in display order.
    /// Empty groups are kept; callers decide whether to show them.
    pub fn into_groups(self) -> Vec<(CategoryGroup, Vec<RawCatalogEntry>)> {
        fn wrap(
            title: &'static str,
            values: Vec<Value>,
            tag: fn(Value) -> RawCatalogEntry,
        ) -> (CategoryGroup, Vec<RawCatalogEntry>) {
            (CategoryGroup { title }, values.into_iter().map(tag).collect())
        }

        vec![
            wrap("Battle Royale", self.br, RawCatalogEntry::BrItem),
            wrap("Jam Tracks", self.tracks, RawCatalogEntry::Track),
            wrap("Instruments", self.instruments, RawCatalogEntry::Instrument),
            wrap("Cars", self.cars, RawCatalogEntry::Car),
            wrap("LEGO", self.lego, RawCatalogEntry::Lego),
            wrap("LEGO Kits", self.lego_kits, RawCatalogEntry::LegoKit),
            wrap("Beans", self.beans, RawCatalogEntry::Bean),
        ]
    }

    /// Flattens every category into one list, in display order.
    pub fn into_entries(self) -> Vec<RawCatalogEntry> {
        self.into_groups()
            .into_iter()
            .flat_map(|(_, entries)| entries)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.br.len()
            + self.tracks.len()
            + self.instruments.len()
            + self.cars.len()
            + self.lego.len()
            + self.lego_kits.len()
            + self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `data` of `/v2/cosmetics/new`.
#[derive(Debug, Deserialize, Default)]
pub struct NewItemsData {
    pub date: Option<String>,
    #[serde(default)]
    pub items: CosmeticsByCategory,
}

/// `data` of `/v2/stats/br/v2`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    #[serde(default)]
    pub account: Account,
    #[serde(default)]
    pub battle_pass: BattlePass,
    #[serde(default)]
    pub stats: StatsByInput,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Account {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BattlePass {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub progress: u32,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StatsByInput {
    /// Aggregate over every input device.
    pub all: Option<StatsModes>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StatsModes {
    pub overall: Option<ModeStats>,
    pub solo: Option<ModeStats>,
    pub duo: Option<ModeStats>,
    pub squad: Option<ModeStats>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModeStats {
    pub wins: u64,
    pub win_rate: f64,
    pub kills: u64,
    pub kd: f64,
    pub matches: u64,
    pub top3: u64,
    pub top10: u64,
    pub top12: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shop_entry_prefers_bundle() {
        let entry = ShopEntry::from_value(&json!({
            "offerId": "v2:/offer",
            "finalPrice": 1800,
            "regularPrice": 2500,
            "bundle": {"name": "Starter Pack", "image": "bundle.png"},
            "brItems": [{"id": "CID_1", "name": "Outfit"}]
        }));

        assert!(matches!(entry.item, RawCatalogEntry::Bundle(_)));
        assert_eq!(entry.offer.offer_id.as_deref(), Some("v2:/offer"));
        assert_eq!(entry.offer.final_price, Some(1800));
        assert_eq!(entry.offer.regular_price, Some(2500));
    }

    #[test]
    fn test_shop_entry_skips_empty_lists() {
        let entry = ShopEntry::from_value(&json!({
            "brItems": [],
            "tracks": [{"id": "track_1", "title": "Song"}]
        }));
        assert!(matches!(entry.item, RawCatalogEntry::Track(_)));
    }

    #[test]
    fn test_shop_entry_unrecognized() {
        let entry = ShopEntry::from_value(&json!({"finalPrice": 500}));
        assert!(matches!(entry.item, RawCatalogEntry::Unrecognized(_)));
        assert_eq!(entry.offer.final_price, Some(500));
    }

    #[test]
    fn test_shop_offer_metadata() {
        let entry = ShopEntry::from_value(&json!({
            "banner": {"value": "Reactive"},
            "layout": {"name": "Jam Tracks", "rank": 4},
            "colors": {"color1": "ff00aaff", "color3": "112233ff"},
            "newDisplayAsset": {"renderImages": [{"image": "render.png"}]},
            "brItems": [{"id": "CID_2"}]
        }));

        assert_eq!(entry.offer.banner.as_deref(), Some("Reactive"));
        assert_eq!(entry.offer.section_name.as_deref(), Some("Jam Tracks"));
        assert_eq!(entry.offer.section_rank, Some(4));
        assert_eq!(entry.offer.render_image.as_deref(), Some("render.png"));
        assert_eq!(
            entry.offer.colors,
            Some(("ff00aaff".to_string(), "112233ff".to_string()))
        );
    }

    #[test]
    fn test_colors_require_both_ends() {
        let entry = ShopEntry::from_value(&json!({
            "colors": {"color1": "ff00aaff"},
            "brItems": [{"id": "CID_3"}]
        }));
        assert_eq!(entry.offer.colors, None);
    }

    #[test]
    fn test_cosmetics_flatten_order() {
        let data: CosmeticsByCategory = serde_json::from_value(json!({
            "beans": [{"id": "bean"}],
            "br": [{"id": "br"}],
            "legoKits": [{"id": "kit"}],
            "tracks": [{"id": "track"}]
        }))
        .unwrap();
        assert_eq!(data.len(), 4);

        let entries = data.into_entries();
        let ids: Vec<&str> = entries
            .iter()
            .map(|e| e.value()["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["br", "track", "kit", "bean"]);
        assert!(matches!(entries[2], RawCatalogEntry::LegoKit(_)));
    }

    #[test]
    fn test_stats_payload_defaults() {
        let data: StatsData = serde_json::from_value(json!({
            "account": {"id": "a1", "name": "Player"},
            "battlePass": {"level": 42, "progress": 17},
            "stats": {"all": {"overall": {"wins": 3, "winRate": 1.5, "kd": 0.75}}}
        }))
        .unwrap();

        assert_eq!(data.account.name, "Player");
        assert_eq!(data.battle_pass.level, 42);
        let all = data.stats.all.unwrap();
        let overall = all.overall.unwrap();
        assert_eq!(overall.wins, 3);
        assert_eq!(overall.kills, 0);
        assert!(all.solo.is_none());
    }
}
