//! Folds fetch results into [`AppState`].
//!
//! Each listing is normalized here and every failure is turned into that
//! tab's message, so no error escapes a tab.

use log::{debug, info, warn};

use crate::api::FetchError;
use crate::app_core::state::{
    AppState, ItemSection, LoadStatus, NO_STATS, STATS_ERROR, StatsView, Tab,
};
use crate::model::{CosmeticsByCategory, NewItemsData, ShopData, StatsData};
use crate::normalize::{self, DisplayItem, EntryContext};
use crate::stats::StatsReport;

pub const SHOP_ERROR: &str = "Error loading shop. Try again later.";
pub const NEW_ITEMS_ERROR: &str = "Could not load new items.";
pub const CATALOG_ERROR: &str = "Error loading cosmetics.";

const DEFAULT_SECTION: &str = "Featured";
const DEFAULT_SECTION_RANK: i64 = 999;

/// Groups shop entries by layout name, ordered by layout rank. A section's
/// rank is taken from its first entry; ties keep first-seen order.
pub fn shop_sections(data: ShopData) -> Vec<ItemSection> {
    let mut sections: Vec<(i64, ItemSection)> = Vec::new();
    let mut by_name: foldhash::HashMap<String, usize> = foldhash::HashMap::default();

    for entry in data.shop_entries() {
        let item = normalize::normalize(&entry.item, &EntryContext::Shop(&entry.offer));
        let name = entry
            .offer
            .section_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SECTION.to_string());

        match by_name.get(&name) {
            Some(&idx) => sections[idx].1.items.push(item),
            None => {
                let rank = entry.offer.section_rank.unwrap_or(DEFAULT_SECTION_RANK);
                by_name.insert(name.clone(), sections.len());
                sections.push((
                    rank,
                    ItemSection {
                        title: name,
                        items: vec![item],
                    },
                ));
            }
        }
    }

    sections.sort_by_key(|(rank, _)| *rank);
    sections.into_iter().map(|(_, section)| section).collect()
}

/// New items grouped by category in display order; empty groups dropped.
pub fn new_item_sections(data: NewItemsData) -> Vec<ItemSection> {
    data.items
        .into_groups()
        .into_iter()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(group, entries)| ItemSection {
            title: group.title.to_string(),
            items: entries
                .iter()
                .map(|entry| normalize::normalize(entry, &EntryContext::NewItem))
                .collect(),
        })
        .collect()
}

/// The whole catalog flattened in category order.
pub fn catalog_items(data: CosmeticsByCategory) -> Vec<DisplayItem> {
    data.into_entries()
        .iter()
        .map(|entry| normalize::normalize(entry, &EntryContext::Catalog))
        .collect()
}

pub fn apply_shop(app: &mut AppState, result: Result<ShopData, FetchError>) {
    match result {
        Ok(data) => {
            app.shop_date = data.date.clone();
            app.shop_sections = shop_sections(data);
            info!("Shop loaded: {} sections", app.shop_sections.len());
            app.set_status(Tab::Shop, LoadStatus::Ready);
            app.refresh_wishlist();
        }
        Err(err) => {
            warn!("Shop fetch failed: {err}");
            app.set_status(Tab::Shop, LoadStatus::Failed(SHOP_ERROR.to_string()));
        }
    }
    app.clamp_selection();
}

pub fn apply_new_items(app: &mut AppState, result: Result<NewItemsData, FetchError>) {
    match result {
        Ok(data) => {
            app.new_sections = new_item_sections(data);
            info!("New items loaded: {} sections", app.new_sections.len());
            app.set_status(Tab::New, LoadStatus::Ready);
        }
        Err(err) => {
            warn!("New items fetch failed: {err}");
            app.set_status(Tab::New, LoadStatus::Failed(NEW_ITEMS_ERROR.to_string()));
        }
    }
    app.clamp_selection();
}

pub fn apply_catalog(app: &mut AppState, result: Result<CosmeticsByCategory, FetchError>) {
    match result {
        Ok(data) => {
            let items = catalog_items(data);
            info!("Catalog loaded: {} items", items.len());
            app.catalog.load(items);
            app.catalog.next_page();
            app.set_status(Tab::Catalog, LoadStatus::Ready);
        }
        Err(err) => {
            warn!("Catalog fetch failed: {err}");
            app.set_status(Tab::Catalog, LoadStatus::Failed(CATALOG_ERROR.to_string()));
        }
    }
    app.clamp_selection();
}

/// Results for a name other than the lookup in flight are dropped, so a slow
/// earlier response cannot replace a newer one.
pub fn apply_stats(app: &mut AppState, name: &str, result: Result<StatsData, FetchError>) {
    if !matches!(&app.stats_view, StatsView::Loading(pending) if pending == name) {
        debug!("Dropping stale stats result for {name}");
        return;
    }
    app.stats_view = match result {
        Ok(data) => match StatsReport::from_data(data) {
            Some(report) => StatsView::Report(report),
            None => StatsView::NoStats(NO_STATS.to_string()),
        },
        Err(err) => {
            warn!("Stats lookup for {name} failed: {err}");
            StatsView::Failed(STATS_ERROR.to_string())
        }
    };
}
