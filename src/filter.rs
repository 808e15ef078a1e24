//! Text / type / sort filtering over a catalog of [`DisplayItem`]s.
//!
//! Everything here is pure: the input slice is never mutated and the same
//! criteria always yield the same ordering.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::normalize::{Category, DisplayItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Outfit,
    Emote,
    Pickaxe,
    Glider,
    Backpack,
    Track,
    Car,
    Instrument,
    /// Building blocks and kits together.
    Lego,
    Bean,
}

impl TypeFilter {
    pub const ALL: [TypeFilter; 11] = [
        TypeFilter::All,
        TypeFilter::Outfit,
        TypeFilter::Emote,
        TypeFilter::Pickaxe,
        TypeFilter::Glider,
        TypeFilter::Backpack,
        TypeFilter::Track,
        TypeFilter::Car,
        TypeFilter::Instrument,
        TypeFilter::Lego,
        TypeFilter::Bean,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TypeFilter::All => "All types",
            TypeFilter::Outfit => "Outfits",
            TypeFilter::Emote => "Emotes",
            TypeFilter::Pickaxe => "Pickaxes",
            TypeFilter::Glider => "Gliders",
            TypeFilter::Backpack => "Back Blings",
            TypeFilter::Track => "Jam Tracks",
            TypeFilter::Car => "Cars",
            TypeFilter::Instrument => "Instruments",
            TypeFilter::Lego => "LEGO",
            TypeFilter::Bean => "Beans",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn matches(self, item: &DisplayItem) -> bool {
        let sub_type = |expected: &str| item.item_type.as_deref() == Some(expected);
        match self {
            TypeFilter::All => true,
            TypeFilter::Outfit => sub_type("outfit"),
            TypeFilter::Emote => sub_type("emote"),
            TypeFilter::Pickaxe => sub_type("pickaxe"),
            TypeFilter::Glider => sub_type("glider"),
            TypeFilter::Backpack => sub_type("backpack"),
            TypeFilter::Track => item.category == Category::Track,
            TypeFilter::Car => item.category == Category::Car,
            TypeFilter::Instrument => item.category == Category::Instrument,
            TypeFilter::Lego => matches!(item.category, Category::Lego | Category::LegoKit),
            TypeFilter::Bean => item.category == Category::Bean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Upstream order.
    #[default]
    None,
    NameAsc,
    DateDesc,
    DateAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::None,
        SortKey::NameAsc,
        SortKey::DateDesc,
        SortKey::DateAsc,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::None => "Default order",
            SortKey::NameAsc => "Name (A-Z)",
            SortKey::DateDesc => "Newest first",
            SortKey::DateAsc => "Oldest first",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub text: String,
    pub type_filter: TypeFilter,
    pub sort_key: SortKey,
}

/// Returns the matching items in display order, as indices into `catalog`.
pub fn apply_indices(catalog: &[DisplayItem], criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.text.to_lowercase();

    let mut indices: Vec<usize> = catalog
        .iter()
        .enumerate()
        .filter(|(_, item)| criteria.type_filter.matches(item))
        .filter(|(_, item)| needle.is_empty() || item.display_name.to_lowercase().contains(&needle))
        .map(|(idx, _)| idx)
        .collect();

    // `sort_by` is stable, so ties keep upstream order.
    match criteria.sort_key {
        SortKey::None => {}
        // Cached keys are stable too; the exact name breaks ties between
        // names that collate equal.
        SortKey::NameAsc => indices.sort_by_cached_key(|&idx| {
            let name = &catalog[idx].display_name;
            (collation_key(name), name.clone())
        }),
        SortKey::DateDesc => indices.sort_by(|&a, &b| {
            compare_dates(&catalog[a], &catalog[b], true)
        }),
        SortKey::DateAsc => indices.sort_by(|&a, &b| {
            compare_dates(&catalog[a], &catalog[b], false)
        }),
    }

    indices
}

/// Same as [`apply_indices`], returning owned items.
pub fn apply(catalog: &[DisplayItem], criteria: &FilterCriteria) -> Vec<DisplayItem> {
    apply_indices(catalog, criteria)
        .into_iter()
        .map(|idx| catalog[idx].clone())
        .collect()
}

/// Accent- and case-insensitive sort key: canonical decomposition with
/// combining marks dropped, then letters without a decomposition folded to
/// their base spelling.
pub fn collation_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.nfd().filter(|c| !is_combining_mark(*c)) {
        match fold_letter(c) {
            Some(base) => key.push_str(base),
            None => key.extend(c.to_lowercase()),
        }
    }
    key
}

fn fold_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'Ø' | 'ø' => "o",
        'Æ' | 'æ' => "ae",
        'Œ' | 'œ' => "oe",
        'ß' | 'ẞ' => "ss",
        'Ð' | 'ð' | 'Đ' | 'đ' => "d",
        'Þ' | 'þ' => "th",
        'Ł' | 'ł' => "l",
        'ı' => "i",
        _ => return None,
    })
}

/// Undated items go after every dated item in both directions.
fn compare_dates(a: &DisplayItem, b: &DisplayItem, newest_first: bool) -> Ordering {
    match (a.added_date, b.added_date) {
        (Some(da), Some(db)) if newest_first => db.cmp(&da),
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, name: &str, category: Category) -> DisplayItem {
        DisplayItem {
            id: id.to_string(),
            display_name: name.to_string(),
            category,
            ..Default::default()
        }
    }

    fn dated(id: &str, day: Option<u32>) -> DisplayItem {
        DisplayItem {
            id: id.to_string(),
            display_name: id.to_string(),
            added_date: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn ids(items: &[DisplayItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_empty_criteria_preserves_order() {
        let catalog = vec![
            item("b", "Zeta", Category::Car),
            item("a", "Alpha", Category::Track),
        ];
        let result = apply(&catalog, &FilterCriteria::default());
        assert_eq!(ids(&result), vec!["b", "a"]);
    }

    #[test]
    fn test_text_filter_case_insensitive() {
        let catalog = vec![
            item("1", "Renegade Raider", Category::BrItem),
            item("2", "Black Knight", Category::BrItem),
            item("3", "RAIDER'S REVENGE", Category::BrItem),
        ];
        let criteria = FilterCriteria {
            text: "raider".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&catalog, &criteria)), vec!["1", "3"]);
    }

    #[test]
    fn test_type_filter_lego_bucket() {
        let catalog = vec![
            item("1", "Brick", Category::Lego),
            item("2", "Kit", Category::LegoKit),
            item("3", "Bean", Category::Bean),
        ];
        let criteria = FilterCriteria {
            type_filter: TypeFilter::Lego,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&catalog, &criteria)), vec!["1", "2"]);
    }

    #[test]
    fn test_type_filter_br_subtype() {
        let mut emote = item("1", "Floss", Category::BrItem);
        emote.item_type = Some("emote".to_string());
        let mut outfit = item("2", "Jonesy", Category::BrItem);
        outfit.item_type = Some("outfit".to_string());
        let catalog = vec![emote, outfit];

        let criteria = FilterCriteria {
            type_filter: TypeFilter::Emote,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&catalog, &criteria)), vec!["1"]);
    }

    #[test]
    fn test_name_sort_is_case_folded_and_stable() {
        let catalog = vec![
            item("1", "banana", Category::BrItem),
            item("2", "Apple", Category::BrItem),
            item("3", "apple", Category::BrItem),
            item("4", "Apple", Category::BrItem),
        ];
        let criteria = FilterCriteria {
            sort_key: SortKey::NameAsc,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&catalog, &criteria)), vec!["2", "4", "3", "1"]);
    }

    #[test]
    fn test_name_sort_ignores_accents() {
        let names = ["Zeta", "Éclair", "Alpha", "Øyvind", "Mango"];
        let catalog: Vec<DisplayItem> = names
            .iter()
            .map(|name| item(name, name, Category::BrItem))
            .collect();
        let criteria = FilterCriteria {
            sort_key: SortKey::NameAsc,
            ..Default::default()
        };
        assert_eq!(
            ids(&apply(&catalog, &criteria)),
            vec!["Alpha", "Éclair", "Mango", "Øyvind", "Zeta"]
        );
    }

    #[test]
    fn test_collation_key() {
        assert_eq!(collation_key("Éclair"), "eclair");
        assert_eq!(collation_key("Øyvind"), "oyvind");
        assert_eq!(collation_key("Straße"), "strasse");
        assert_eq!(collation_key("Mango"), "mango");
    }

    #[test]
    fn test_date_sorts_put_undated_last() {
        let catalog = vec![
            dated("none-a", None),
            dated("d2", Some(2)),
            dated("d1", Some(1)),
            dated("none-b", None),
            dated("d3", Some(3)),
        ];

        let desc = FilterCriteria {
            sort_key: SortKey::DateDesc,
            ..Default::default()
        };
        assert_eq!(
            ids(&apply(&catalog, &desc)),
            vec!["d3", "d2", "d1", "none-a", "none-b"]
        );

        let asc = FilterCriteria {
            sort_key: SortKey::DateAsc,
            ..Default::default()
        };
        assert_eq!(
            ids(&apply(&catalog, &asc)),
            vec!["d1", "d2", "d3", "none-a", "none-b"]
        );
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let catalog = vec![dated("b", Some(2)), dated("a", Some(1))];
        let before = catalog.clone();
        let criteria = FilterCriteria {
            sort_key: SortKey::DateAsc,
            ..Default::default()
        };
        let first = apply(&catalog, &criteria);
        let second = apply(&catalog, &criteria);
        assert_eq!(catalog, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cycles_wrap() {
        assert_eq!(TypeFilter::Bean.next(), TypeFilter::All);
        assert_eq!(TypeFilter::All.next(), TypeFilter::Outfit);
        assert_eq!(SortKey::DateAsc.next(), SortKey::None);
    }
}
