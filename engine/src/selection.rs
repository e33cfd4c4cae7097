//! Row selection and the "select all" checkbox.
//!
//! Two policy knobs decide how selection behaves:
//!
//! - [`SelectAllMode`]: whether the header checkbox is a stored flag that
//!   flips on every click (`Tracked`) or is recomputed from the current page
//!   (`Derived`).
//! - [`SelectionRetention`]: whether selected ids outside the visible page
//!   survive page and filter changes (`Retain`) or are dropped (`Prune`).
//!   Under `Prune` the selection is always a subset of the visible page, so
//!   row toggles for ids that are not on it are ignored.

use crate::query::QueryState;
use crate::types::OrderId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the header checkbox state is determined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectAllMode {
    /// A stored flag toggled by each click, independent of row toggles
    Tracked,
    /// Checked exactly when the page is non-empty and every row on it is selected
    #[default]
    Derived,
}

/// What happens to selected ids when the visible page changes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionRetention {
    /// Keep every selected id
    Retain,
    /// Keep only ids on the new page
    #[default]
    Prune,
}

/// Combined selection behaviour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Header checkbox semantics
    pub select_all: SelectAllMode,
    /// Retention across page changes
    pub retention: SelectionRetention,
}

impl SelectionPolicy {
    /// Stored-flag checkbox with nothing pruned, as the dashboard first shipped
    pub const LEGACY: Self = Self {
        select_all: SelectAllMode::Tracked,
        retention: SelectionRetention::Retain,
    };
}

/// Error for an unrecognised mode name
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expected one of {expected}, got `{value}`")]
pub struct UnknownMode {
    /// Accepted spellings
    pub expected: &'static str,
    /// The rejected input
    pub value: String,
}

impl FromStr for SelectAllMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracked" => Ok(Self::Tracked),
            "derived" => Ok(Self::Derived),
            _ => Err(UnknownMode {
                expected: "tracked|derived",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SelectionRetention {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "prune" => Ok(Self::Prune),
            _ => Err(UnknownMode {
                expected: "retain|prune",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SelectAllMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tracked => "tracked",
            Self::Derived => "derived",
        })
    }
}

impl fmt::Display for SelectionRetention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Retain => "retain",
            Self::Prune => "prune",
        })
    }
}

/// Whether every id on a non-empty page is selected
#[must_use]
pub fn all_selected(query: &QueryState, page_ids: &[OrderId]) -> bool {
    !page_ids.is_empty() && page_ids.iter().all(|id| query.is_selected(id))
}

/// Header checkbox state under `mode`
#[must_use]
pub fn select_all_checked(query: &QueryState, page_ids: &[OrderId], mode: SelectAllMode) -> bool {
    match mode {
        SelectAllMode::Tracked => query.select_all,
        SelectAllMode::Derived => all_selected(query, page_ids),
    }
}

/// Click on the header checkbox
///
/// Selecting replaces the whole selection with exactly the page's ids.
pub fn toggle_select_all(query: &mut QueryState, page_ids: &[OrderId], mode: SelectAllMode) {
    let checked = select_all_checked(query, page_ids, mode);
    if checked {
        query.selected_ids.clear();
    } else {
        query.selected_ids = page_ids.to_vec();
    }
    query.select_all = !checked;
}

/// Click on a row checkbox; never touches the header flag
pub fn toggle_select_one(query: &mut QueryState, id: OrderId) {
    if let Some(position) = query.selected_ids.iter().position(|s| *s == id) {
        query.selected_ids.remove(position);
    } else {
        query.selected_ids.push(id);
    }
}

/// Click on a row checkbox while `page_ids` are visible
///
/// Returns `false` when the click was ignored: under `Prune` an id that is
/// not on the page cannot be selected.
pub fn toggle_row(
    query: &mut QueryState,
    id: OrderId,
    page_ids: &[OrderId],
    retention: SelectionRetention,
) -> bool {
    if retention == SelectionRetention::Prune && !page_ids.contains(&id) {
        return false;
    }
    toggle_select_one(query, id);
    true
}

/// Apply `retention` after the visible page changed to `page_ids`
pub fn retain_for_page(query: &mut QueryState, page_ids: &[OrderId], policy: SelectionPolicy) {
    if policy.retention == SelectionRetention::Retain {
        return;
    }
    query.selected_ids.retain(|id| page_ids.contains(id));
    if policy.select_all == SelectAllMode::Tracked {
        query.select_all = query.select_all && all_selected(query, page_ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<OrderId> {
        raw.iter().copied().map(OrderId::from).collect()
    }

    #[test]
    fn tracked_select_all_toggles_between_page_and_nothing() {
        let mut query = QueryState::default();
        let page = ids(&["ORD001", "ORD002"]);

        toggle_select_all(&mut query, &page, SelectAllMode::Tracked);
        assert_eq!(query.selected_ids, page);
        assert!(query.select_all);

        toggle_select_all(&mut query, &page, SelectAllMode::Tracked);
        assert!(query.selected_ids.is_empty());
        assert!(!query.select_all);
    }

    #[test]
    fn tracked_flag_ignores_row_toggles() {
        let mut query = QueryState::default();
        let page = ids(&["ORD001", "ORD002"]);

        toggle_select_all(&mut query, &page, SelectAllMode::Tracked);
        toggle_select_one(&mut query, OrderId::from("ORD001"));
        assert!(query.select_all, "flag is stale by construction");

        // The next click clears, because the flag says "all"
        toggle_select_all(&mut query, &page, SelectAllMode::Tracked);
        assert!(query.selected_ids.is_empty());
    }

    #[test]
    fn derived_select_all_follows_rows() {
        let mut query = QueryState::default();
        let page = ids(&["ORD001", "ORD002"]);

        toggle_select_one(&mut query, OrderId::from("ORD001"));
        toggle_select_one(&mut query, OrderId::from("ORD002"));
        assert!(select_all_checked(&query, &page, SelectAllMode::Derived));

        toggle_select_one(&mut query, OrderId::from("ORD001"));
        assert!(!select_all_checked(&query, &page, SelectAllMode::Derived));

        // Partially selected: the click selects the whole page
        toggle_select_all(&mut query, &page, SelectAllMode::Derived);
        assert_eq!(query.selected_ids.len(), 2);
        assert!(select_all_checked(&query, &page, SelectAllMode::Derived));
    }

    #[test]
    fn derived_is_unchecked_on_empty_page() {
        let query = QueryState::default();
        assert!(!select_all_checked(&query, &[], SelectAllMode::Derived));
    }

    #[test]
    fn row_toggle_is_symmetric() {
        let mut query = QueryState::default();
        let id = OrderId::from("ORD007");
        toggle_select_one(&mut query, id.clone());
        assert!(query.is_selected(&id));
        toggle_select_one(&mut query, id.clone());
        assert!(!query.is_selected(&id));
    }

    #[test]
    fn off_page_rows_are_ignored_only_when_pruning() {
        let page = ids(&["ORD001", "ORD002"]);

        let mut pruned = QueryState::default();
        assert!(!toggle_row(&mut pruned, OrderId::from("ORD012"), &page, SelectionRetention::Prune));
        assert!(toggle_row(&mut pruned, OrderId::from("ORD002"), &page, SelectionRetention::Prune));
        assert_eq!(pruned.selected_ids, ids(&["ORD002"]));

        let mut retained = QueryState::default();
        assert!(toggle_row(&mut retained, OrderId::from("ORD012"), &page, SelectionRetention::Retain));
        assert_eq!(retained.selected_ids, ids(&["ORD012"]));
    }

    #[test]
    fn prune_keeps_only_page_ids() {
        let mut query = QueryState::default();
        query.selected_ids = ids(&["ORD001", "ORD011"]);
        query.select_all = true;

        retain_for_page(
            &mut query,
            &ids(&["ORD011", "ORD012"]),
            SelectionPolicy {
                select_all: SelectAllMode::Tracked,
                retention: SelectionRetention::Prune,
            },
        );

        assert_eq!(query.selected_ids, ids(&["ORD011"]));
        assert!(!query.select_all);
    }

    #[test]
    fn retain_leaves_selection_alone() {
        let mut query = QueryState::default();
        query.selected_ids = ids(&["ORD001"]);
        retain_for_page(&mut query, &ids(&["ORD011"]), SelectionPolicy::LEGACY);
        assert_eq!(query.selected_ids, ids(&["ORD001"]));
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("Tracked".parse(), Ok(SelectAllMode::Tracked));
        assert_eq!(" prune ".parse(), Ok(SelectionRetention::Prune));
        assert!("sometimes".parse::<SelectionRetention>().is_err());
    }
}
