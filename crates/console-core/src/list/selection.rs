//! Multi-select state for bulk actions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Record ids selected for a bulk action, scoped to the loaded page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }

    /// Selected ids in sorted order.
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Flips one id. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// "Select all" checkbox on the page header: clears when every id on
    /// the page is already selected, otherwise selects all of them.
    pub fn toggle_all(&mut self, page_ids: &[&str]) {
        if page_ids.is_empty() {
            return;
        }
        if page_ids.iter().all(|id| self.ids.contains(*id)) {
            self.ids.clear();
        } else {
            self.ids.extend(page_ids.iter().map(|id| id.to_string()));
        }
    }

    /// Removes the given ids and leaves the rest untouched.
    pub fn remove_all(&mut self, ids: &[String]) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    /// Keeps only ids that are present on the newly loaded page.
    pub fn retain_page<'a, I>(&mut self, page_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: BTreeSet<&str> = page_ids.into_iter().collect();
        self.ids.retain(|id| present.contains(id.as_str()));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("a"));
        assert!(selection.contains("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_twice_restores_prior_state() {
        let page = ["a", "b", "c"];

        let mut selection = SelectionSet::new();
        selection.toggle_all(&page);
        assert_eq!(selection.len(), 3);
        selection.toggle_all(&page);
        assert!(selection.is_empty());

        let mut full = SelectionSet::new();
        full.toggle_all(&page);
        let before = full.clone();
        full.toggle_all(&page);
        full.toggle_all(&page);
        assert_eq!(full, before);
    }

    #[test]
    fn test_toggle_all_completes_partial_selection() {
        let mut selection = SelectionSet::new();
        selection.toggle("b");
        selection.toggle_all(&["a", "b", "c"]);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_toggle_all_on_empty_page_is_noop() {
        let mut selection = SelectionSet::new();
        selection.toggle("x");
        selection.toggle_all(&[]);
        assert!(selection.contains("x"));
    }

    #[test]
    fn test_remove_all_leaves_unrelated_ids() {
        let mut selection = SelectionSet::new();
        for id in ["a", "b", "c"] {
            selection.toggle(id);
        }
        selection.remove_all(&["a".to_string(), "c".to_string(), "z".to_string()]);
        assert_eq!(selection.to_vec(), vec!["b".to_string()]);
    }

    #[test]
    fn test_retain_page_prunes_missing_ids() {
        let mut selection = SelectionSet::new();
        selection.toggle("a");
        selection.toggle("b");
        selection.retain_page(["b", "c"]);
        assert_eq!(selection.to_vec(), vec!["b".to_string()]);
    }
}
