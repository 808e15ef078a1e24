//! Full catalog, its filtered view, and the "load more" pagination cursor.

use crate::filter::{self, FilterCriteria};
use crate::normalize::DisplayItem;

pub const PAGE_SIZE: usize = 50;

#[derive(Debug)]
pub struct CatalogStore {
    full: Vec<DisplayItem>,
    /// Indices into `full`, in display order.
    view: Vec<usize>,
    criteria: FilterCriteria,
    /// 1-based index of the next page to append.
    page_index: usize,
    rendered_len: usize,
    loaded: bool,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            full: Vec::new(),
            view: Vec::new(),
            criteria: FilterCriteria::default(),
            page_index: 1,
            rendered_len: 0,
            loaded: false,
        }
    }

    /// Replaces the catalog, keeping the current criteria. Pagination
    /// restarts with nothing rendered.
    pub fn load(&mut self, items: Vec<DisplayItem>) {
        self.full = items;
        self.loaded = true;
        self.refresh_view();
    }

    /// Recomputes the view and restarts pagination at page 1. Previously
    /// rendered pages are discarded, not appended to.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.view = filter::apply_indices(&self.full, &self.criteria);
        self.page_index = 1;
        self.rendered_len = 0;
    }

    /// Appends the next page. Returns the newly rendered items; past the end
    /// this is a no-op returning nothing.
    pub fn next_page(&mut self) -> Vec<&DisplayItem> {
        let start = self.rendered_len;
        let end = (start + PAGE_SIZE).min(self.view.len());
        if start >= end {
            return Vec::new();
        }
        self.rendered_len = end;
        self.page_index += 1;
        self.view[start..end].iter().map(|&i| &self.full[i]).collect()
    }

    pub fn has_more(&self) -> bool {
        self.rendered_len < self.view.len()
    }

    /// Everything rendered so far, in display order.
    pub fn rendered(&self) -> impl ExactSizeIterator<Item = &DisplayItem> + '_ {
        self.view[..self.rendered_len]
            .iter()
            .map(move |&i| &self.full[i])
    }

    pub fn rendered_len(&self) -> usize {
        self.rendered_len
    }

    pub fn rendered_item(&self, position: usize) -> Option<&DisplayItem> {
        self.view[..self.rendered_len]
            .get(position)
            .map(|&i| &self.full[i])
    }

    pub fn current_page_index(&self) -> usize {
        self.page_index
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn total_len(&self) -> usize {
        self.full.len()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.full
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SortKey;

    fn items(count: usize) -> Vec<DisplayItem> {
        (0..count)
            .map(|i| DisplayItem {
                id: format!("item_{i}"),
                display_name: format!("Item {i:03}"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_load_resets_pagination() {
        let mut store = CatalogStore::new();
        assert!(!store.is_loaded());
        store.load(items(120));

        assert!(store.is_loaded());
        assert_eq!(store.total_len(), 120);
        assert_eq!(store.rendered_len(), 0);
        assert_eq!(store.current_page_index(), 1);

        assert_eq!(store.next_page().len(), PAGE_SIZE);
        assert_eq!(store.current_page_index(), 2);
        assert!(store.has_more());
    }

    #[test]
    fn test_pagination_until_exhausted() {
        let mut store = CatalogStore::new();
        store.load(items(120));

        assert_eq!(store.next_page().len(), 50);
        assert_eq!(store.next_page().len(), 50);
        let last = store.next_page();
        assert_eq!(last.len(), 20);
        assert_eq!(last[0].id, "item_100");
        assert!(!store.has_more());
        assert_eq!(store.rendered_len(), 120);

        let page_index = store.current_page_index();
        assert!(store.next_page().is_empty());
        assert_eq!(store.current_page_index(), page_index);
        assert_eq!(store.rendered_len(), 120);
    }

    #[test]
    fn test_exact_multiple_has_no_more() {
        let mut store = CatalogStore::new();
        store.load(items(PAGE_SIZE));
        assert!(store.has_more());
        store.next_page();
        assert!(!store.has_more());
    }

    #[test]
    fn test_criteria_change_resets_pagination() {
        let mut store = CatalogStore::new();
        store.load(items(200));
        store.next_page();
        store.next_page();
        store.next_page();
        assert_eq!(store.rendered_len(), 150);

        store.set_criteria(FilterCriteria {
            text: "item 1".to_string(),
            sort_key: SortKey::NameAsc,
            ..Default::default()
        });

        // "Item 1xx" has 100 matches and nothing is rendered yet.
        assert_eq!(store.view_len(), 100);
        assert_eq!(store.rendered_len(), 0);
        assert_eq!(store.current_page_index(), 1);

        assert_eq!(store.next_page().len(), PAGE_SIZE);
        assert_eq!(store.rendered_item(0).map(|i| i.id.as_str()), Some("item_100"));
    }

    #[test]
    fn test_empty_view() {
        let mut store = CatalogStore::new();
        store.load(items(3));
        store.set_criteria(FilterCriteria {
            text: "nothing matches".to_string(),
            ..Default::default()
        });
        assert!(store.next_page().is_empty());
        assert_eq!(store.view_len(), 0);
        assert_eq!(store.rendered().len(), 0);
        assert!(!store.has_more());
    }
}
