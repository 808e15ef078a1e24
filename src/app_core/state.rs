//! Shared application state, types, and state-mutation methods.
//!
//! This module is runtime-agnostic. Fetching happens in the runtimes, which
//! pick up [`AppState::pending_action`] after every event and feed results
//! back through [`crate::app_core::ingest`].

use std::str::FromStr;

use log::warn;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tui_scrollview::ScrollViewState;

use crate::app_core::text_input::TextInput;
use crate::card::{self, CardAction};
use crate::catalog::CatalogStore;
use crate::favorites::FavoritesRegistry;
use crate::filter::FilterCriteria;
use crate::normalize::DisplayItem;
use crate::stats::StatsReport;
use crate::theme::ThemeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Shop,
    New,
    Catalog,
    Stats,
    Wishlist,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Shop, Tab::New, Tab::Catalog, Tab::Stats, Tab::Wishlist];

    pub fn index(self) -> usize {
        match self {
            Tab::Shop => 0,
            Tab::New => 1,
            Tab::Catalog => 2,
            Tab::Stats => 3,
            Tab::Wishlist => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Shop => "Item Shop",
            Tab::New => "New Items",
            Tab::Catalog => "All Cosmetics",
            Tab::Stats => "Player Stats",
            Tab::Wishlist => "Wishlist",
        }
    }

    /// Tabs whose content comes from a listing endpoint.
    pub fn is_remote(self) -> bool {
        matches!(self, Tab::Shop | Tab::New | Tab::Catalog)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shop" => Ok(Tab::Shop),
            "new" => Ok(Tab::New),
            "catalog" | "all" => Ok(Tab::Catalog),
            "stats" => Ok(Tab::Stats),
            "wishlist" | "favorites" => Ok(Tab::Wishlist),
            other => Err(format!(
                "unknown tab '{other}' (expected shop, new, catalog, stats, wishlist)"
            )),
        }
    }
}

/// Per-tab fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Human-readable message shown in place of the tab content.
    Failed(String),
}

impl LoadStatus {
    /// Anything but `Idle` blocks an automatic fetch, including failures.
    pub fn is_populated(&self) -> bool {
        !matches!(self, LoadStatus::Idle)
    }
}

/// Current input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Typing into a text box
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Filter,
    PlayerName,
}

#[derive(Debug, Clone)]
pub struct ProgressStage {
    pub label: String,
    pub ratio: f64,
    pub done: bool,
}

/// Work the runtime performs after the reducer returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Load(Tab),
    LookupPlayer(String),
}

/// A titled group of items (shop section or new-items category).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSection {
    pub title: String,
    pub items: Vec<DisplayItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatsView {
    Idle,
    /// Submitted with an empty name.
    Prompt,
    Loading(String),
    Report(StatsReport),
    NoStats(String),
    Failed(String),
}

/// One rendered line of a list tab.
#[derive(Debug, Clone, PartialEq)]
pub enum ListRow<'a> {
    Header(&'a str),
    Item(&'a DisplayItem),
    LoadMore { remaining: usize },
    Message(&'a str),
}

impl ListRow<'_> {
    pub fn is_selectable(&self) -> bool {
        matches!(self, ListRow::Item(_) | ListRow::LoadMore { .. })
    }
}

pub const EMPTY_SHOP: &str = "The shop is empty right now.";
pub const NO_NEW_ITEMS: &str = "No new items reported.";
pub const NO_RESULTS: &str = "No results found.";
pub const EMPTY_WISHLIST: &str = "Your wishlist is empty. Press Space on any item to add it.";
pub const EMPTY_USERNAME: &str = "Please enter a username.";
pub const STATS_ERROR: &str = "Error searching for player";
pub const STATS_ERROR_HINT: &str = "Make sure the name is correct and the account is public.";
pub const NO_STATS: &str = "No stats available for this player.";

/// Application state for the Ratatui app.
pub struct AppState {
    pub active_tab: Tab,
    /// Indexed by [`Tab::index`].
    pub load_status: [LoadStatus; 5],
    pub shop_sections: Vec<ItemSection>,
    /// Rotation date reported by the shop endpoint.
    pub shop_date: Option<String>,
    pub new_sections: Vec<ItemSection>,
    pub catalog: CatalogStore,
    pub favorites: FavoritesRegistry,
    /// Favorites with today's shop prices applied; rebuilt on change.
    pub wishlist_view: Vec<DisplayItem>,
    pub catalog_filter: TextInput,
    pub player_name: TextInput,
    pub stats_view: StatsView,
    pub stats_scroll: ScrollViewState,
    /// One selection per tab, indexed by [`Tab::index`].
    pub list_states: [ListState; 5],
    pub input_mode: InputMode,
    pub focus: Focus,
    /// Item shown in the detail modal.
    pub detail: Option<DisplayItem>,
    pub theme: ThemeConfig,
    pub app_version: String,
    /// Transient one-line feedback (wishlist writes, reload hints).
    pub status_message: Option<String>,
    /// Flag to quit app
    pub should_quit: bool,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Whether progress modal is visible
    pub show_progress: bool,
    /// Progress modal title
    pub progress_title: String,
    /// Progress stages for modal display
    pub progress_stages: Vec<ProgressStage>,
    /// Pending action to execute after input handling
    pub pending_action: Option<AppAction>,
    /// Screen regions recorded during render, used for mouse hit-testing.
    pub tab_hitboxes: Vec<(Tab, Rect)>,
    pub list_area: Option<Rect>,
    pub list_content_area: Option<Rect>,
    pub filter_area: Option<Rect>,
    pub filter_input_area: Option<Rect>,
    pub player_input_area: Option<Rect>,
    pub stats_area: Option<Rect>,
    pub detail_area: Option<Rect>,
    pub detail_favorite_area: Option<Rect>,
}

impl AppState {
    pub fn new(theme: ThemeConfig, favorites: FavoritesRegistry, app_version: String) -> Self {
        let mut app = Self {
            active_tab: Tab::Shop,
            load_status: Default::default(),
            shop_sections: Vec::new(),
            shop_date: None,
            new_sections: Vec::new(),
            catalog: CatalogStore::new(),
            favorites,
            wishlist_view: Vec::new(),
            catalog_filter: TextInput::new(),
            player_name: TextInput::new(),
            stats_view: StatsView::Idle,
            stats_scroll: ScrollViewState::default(),
            list_states: Default::default(),
            input_mode: InputMode::Normal,
            focus: Focus::List,
            detail: None,
            theme,
            app_version,
            status_message: None,
            should_quit: false,
            show_help: false,
            show_progress: false,
            progress_title: String::new(),
            progress_stages: Vec::new(),
            pending_action: None,
            tab_hitboxes: Vec::new(),
            list_area: None,
            list_content_area: None,
            filter_area: None,
            filter_input_area: None,
            player_input_area: None,
            stats_area: None,
            detail_area: None,
            detail_favorite_area: None,
        };
        app.refresh_wishlist();
        app
    }

    pub fn status(&self, tab: Tab) -> &LoadStatus {
        &self.load_status[tab.index()]
    }

    pub fn set_status(&mut self, tab: Tab, status: LoadStatus) {
        self.load_status[tab.index()] = status;
    }

    /// Marks `tab` as loading if it has never been populated. Returns whether
    /// a fetch should start.
    pub fn begin_load(&mut self, tab: Tab) -> bool {
        if !tab.is_remote() || self.status(tab).is_populated() {
            return false;
        }
        self.set_status(tab, LoadStatus::Loading);
        true
    }

    /// Switches tabs, queueing a fetch on the first visit of a remote tab.
    pub fn activate_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.detail = None;
        if self.begin_load(tab) {
            self.pending_action = Some(AppAction::Load(tab));
        }
        if tab == Tab::Stats {
            self.focus_input(Focus::PlayerName);
        } else {
            self.focus_input(Focus::List);
        }
        self.clamp_selection();
    }

    /// Forces a refetch of the active remote tab unless one is in flight.
    pub fn reload_active_tab(&mut self) {
        let tab = self.active_tab;
        if !tab.is_remote() {
            return;
        }
        if *self.status(tab) == LoadStatus::Loading {
            self.status_message = Some(format!("{} is already loading", tab.title()));
            return;
        }
        self.set_status(tab, LoadStatus::Loading);
        self.pending_action = Some(AppAction::Load(tab));
    }

    pub fn focus_input(&mut self, focus: Focus) {
        self.focus = focus;
        self.input_mode = if focus == Focus::List {
            InputMode::Normal
        } else {
            InputMode::Editing
        };
    }

    /// Rows of `tab` as they are drawn and hit-tested.
    pub fn rows(&self, tab: Tab) -> Vec<ListRow<'_>> {
        let status = self.status(tab);
        match (tab, status) {
            (_, LoadStatus::Failed(message)) => vec![ListRow::Message(message)],
            (Tab::Shop | Tab::New | Tab::Catalog, LoadStatus::Idle | LoadStatus::Loading) => {
                vec![ListRow::Message(loading_message(tab))]
            }
            (Tab::Shop, LoadStatus::Ready) => section_rows(&self.shop_sections, EMPTY_SHOP),
            (Tab::New, LoadStatus::Ready) => section_rows(&self.new_sections, NO_NEW_ITEMS),
            (Tab::Catalog, LoadStatus::Ready) => {
                if self.catalog.view_len() == 0 {
                    return vec![ListRow::Message(NO_RESULTS)];
                }
                let mut rows: Vec<ListRow<'_>> = self.catalog.rendered().map(ListRow::Item).collect();
                if self.catalog.has_more() {
                    rows.push(ListRow::LoadMore {
                        remaining: self.catalog.view_len() - self.catalog.rendered_len(),
                    });
                }
                rows
            }
            (Tab::Wishlist, _) => {
                if self.wishlist_view.is_empty() {
                    vec![ListRow::Message(EMPTY_WISHLIST)]
                } else {
                    self.wishlist_view.iter().map(ListRow::Item).collect()
                }
            }
            (Tab::Stats, _) => Vec::new(),
        }
    }

    pub fn selected_row(&self) -> Option<ListRow<'_>> {
        let selected = self.list_states[self.active_tab.index()].selected()?;
        self.rows(self.active_tab).into_iter().nth(selected)
    }

    /// Keeps the selection of the active tab on a selectable row.
    pub fn clamp_selection(&mut self) {
        let rows = self.rows(self.active_tab);
        let target = {
            let state = &self.list_states[self.active_tab.index()];
            let current = state.selected().unwrap_or(0).min(rows.len().saturating_sub(1));
            nearest_selectable(&rows, current)
        };
        self.list_states[self.active_tab.index()].select(target);
    }

    /// Moves the selection by `delta` rows, skipping headers and messages.
    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.rows(self.active_tab);
        let selectable: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_selectable())
            .map(|(idx, _)| idx)
            .collect();
        if selectable.is_empty() {
            self.list_states[self.active_tab.index()].select(None);
            return;
        }

        let Some(current) = self.list_states[self.active_tab.index()].selected() else {
            self.list_states[self.active_tab.index()].select(Some(selectable[0]));
            return;
        };
        let pos = selectable
            .iter()
            .position(|&idx| idx >= current)
            .unwrap_or(selectable.len() - 1) as isize;
        let new_pos = (pos + delta).clamp(0, selectable.len() as isize - 1) as usize;
        self.list_states[self.active_tab.index()].select(Some(selectable[new_pos]));
    }

    pub fn select_first(&mut self) {
        self.list_states[self.active_tab.index()].select(Some(0));
        self.clamp_selection();
    }

    pub fn select_last(&mut self) {
        let target = self
            .rows(self.active_tab)
            .iter()
            .rposition(ListRow::is_selectable);
        self.list_states[self.active_tab.index()].select(target);
    }

    /// Acts on the selected row: opens the item or loads the next page.
    pub fn activate_selected(&mut self) {
        let action = match self.selected_row() {
            Some(ListRow::Item(item)) => {
                Some(card::render(item, &self.favorites).on_click())
            }
            Some(ListRow::LoadMore { .. }) => None,
            _ => return,
        };
        match action {
            Some(action) => self.dispatch_card_action(action),
            None => self.load_more(),
        }
    }

    pub fn toggle_selected_favorite(&mut self) {
        let action = match self.selected_row() {
            Some(ListRow::Item(item)) => card::render(item, &self.favorites).on_favorite(),
            _ => return,
        };
        self.dispatch_card_action(action);
    }

    pub fn dispatch_card_action(&mut self, action: CardAction) {
        match action {
            CardAction::OpenDetail(id) => {
                self.detail = self.find_item(&id).cloned();
            }
            CardAction::ToggleFavorite(id) => {
                if let Some(item) = self.find_item(&id).cloned() {
                    self.toggle_favorite(&item);
                }
            }
        }
    }

    /// Looks an id up in every loaded listing, then the wishlist.
    pub fn find_item(&self, id: &str) -> Option<&DisplayItem> {
        if let Some(detail) = self.detail.as_ref().filter(|d| d.id == id) {
            return Some(detail);
        }
        self.shop_sections
            .iter()
            .chain(self.new_sections.iter())
            .flat_map(|section| section.items.iter())
            .chain(self.catalog.items().iter())
            .chain(self.wishlist_view.iter())
            .find(|item| item.id == id)
    }

    pub fn toggle_favorite(&mut self, item: &DisplayItem) {
        match self.favorites.toggle(item) {
            Ok(true) => {
                self.status_message = Some(format!("Added {} to wishlist", item.display_name));
            }
            Ok(false) => {
                self.status_message =
                    Some(format!("Removed {} from wishlist", item.display_name));
            }
            Err(err) => {
                warn!("Wishlist update failed: {err}");
                self.status_message = Some(format!("Could not save wishlist: {err}"));
            }
        }
        self.refresh_wishlist();
        self.clamp_selection();
    }

    /// Rebuilds the wishlist view from the registry and today's shop.
    pub fn refresh_wishlist(&mut self) {
        let live: Vec<DisplayItem> = self
            .shop_sections
            .iter()
            .flat_map(|section| section.items.iter().cloned())
            .collect();
        self.wishlist_view = self.favorites.list_with_live_prices(&live);
    }

    pub fn load_more(&mut self) {
        if self.catalog.next_page().is_empty() {
            return;
        }
        self.clamp_selection();
    }

    pub fn filter_criteria(&self) -> &FilterCriteria {
        self.catalog.criteria()
    }

    /// Re-applies the catalog criteria after an edit, restarting at page 1.
    pub fn update_catalog_filter(&mut self, criteria: FilterCriteria) {
        self.catalog.set_criteria(criteria);
        self.catalog.next_page();
        if self.active_tab == Tab::Catalog {
            self.select_first();
        } else {
            self.list_states[Tab::Catalog.index()].select(Some(0));
        }
    }

    /// Syncs the filter text box into the catalog criteria.
    pub fn apply_filter_text(&mut self) {
        let criteria = FilterCriteria {
            text: self.catalog_filter.text.clone(),
            ..self.catalog.criteria().clone()
        };
        self.update_catalog_filter(criteria);
    }

    pub fn cycle_type_filter(&mut self) {
        let current = self.catalog.criteria().clone();
        self.update_catalog_filter(FilterCriteria {
            type_filter: current.type_filter.next(),
            ..current
        });
    }

    pub fn cycle_sort_key(&mut self) {
        let current = self.catalog.criteria().clone();
        self.update_catalog_filter(FilterCriteria {
            sort_key: current.sort_key.next(),
            ..current
        });
    }

    /// Submits the player name box.
    pub fn submit_player_lookup(&mut self) {
        let name = self.player_name.text.trim().to_string();
        if name.is_empty() {
            self.stats_view = StatsView::Prompt;
            return;
        }
        self.stats_scroll = ScrollViewState::default();
        self.stats_view = StatsView::Loading(name.clone());
        self.pending_action = Some(AppAction::LookupPlayer(name));
        self.focus_input(Focus::List);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_area = None;
        self.detail_favorite_area = None;
    }

    pub fn start_progress(&mut self, title: impl Into<String>, stages: &[&str]) {
        self.show_progress = true;
        self.progress_title = title.into();
        self.progress_stages = stages
            .iter()
            .map(|label| ProgressStage {
                label: (*label).to_string(),
                ratio: 0.0,
                done: false,
            })
            .collect();
    }

    pub fn update_stage(&mut self, label: &str, ratio: f64) {
        if let Some(stage) = self
            .progress_stages
            .iter_mut()
            .find(|stage| stage.label == label)
        {
            stage.ratio = ratio.clamp(0.0, 1.0);
            if stage.ratio >= 1.0 {
                stage.done = true;
            }
        }
    }

    pub fn finish_stage(&mut self, label: &str) {
        self.update_stage(label, 1.0);
    }

    pub fn clear_progress(&mut self) {
        self.show_progress = false;
        self.progress_title.clear();
        self.progress_stages.clear();
    }
}

fn loading_message(tab: Tab) -> &'static str {
    match tab {
        Tab::Shop => "Loading the item shop...",
        Tab::New => "Loading new items...",
        _ => "Downloading cosmetics database... (This may take a few seconds)",
    }
}

fn section_rows<'a>(sections: &'a [ItemSection], empty: &'static str) -> Vec<ListRow<'a>> {
    if sections.is_empty() {
        return vec![ListRow::Message(empty)];
    }
    sections
        .iter()
        .flat_map(|section| {
            std::iter::once(ListRow::Header(section.title.as_str()))
                .chain(section.items.iter().map(ListRow::Item))
        })
        .collect()
}

/// First selectable row at or after `from`, else the last one before it.
fn nearest_selectable(rows: &[ListRow<'_>], from: usize) -> Option<usize> {
    rows.iter()
        .enumerate()
        .skip(from)
        .find(|(_, row)| row.is_selectable())
        .map(|(idx, _)| idx)
        .or_else(|| rows[..from.min(rows.len())].iter().rposition(ListRow::is_selectable))
}
