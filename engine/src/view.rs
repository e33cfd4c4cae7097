//! Render-ready projection of the order list state.
//!
//! The view is recomputed from state on every read. Filtering and pagination
//! only run once a non-empty collection has loaded.

use crate::pagination::{PageButton, clamp_page, page_window, paginate, total_pages};
use crate::query::apply_filters;
use crate::selection::{SelectAllMode, select_all_checked};
use crate::state::{LoadStatus, OrderListState};
use crate::types::{Order, OrderId};
use chrono::NaiveDate;
use serde::Serialize;

/// Which of the four mutually exclusive displays applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    /// A load is in flight or has not started
    Loading,
    /// The last load failed
    Error,
    /// Loaded, but the collection has no orders
    Empty,
    /// Loaded with at least one order
    Ready,
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRow {
    /// The order itself
    #[serde(flatten)]
    pub order: Order,
    /// Row checkbox state
    pub selected: bool,
    /// CSS classes for the status badge
    pub badge_class: String,
}

/// Table, pager and footer for a loaded collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadyView {
    /// Orders passing the current filters
    pub filtered_count: usize,
    /// Page count for display, at least 1
    pub total_pages: usize,
    /// Page being shown, 1-indexed
    pub current_page: usize,
    /// Rows on this page, in collection order
    pub rows: Vec<OrderRow>,
    /// 1-indexed position of the first row
    pub range_start: usize,
    /// 1-indexed position of the last row
    pub range_end: usize,
    /// Selected ids, in selection order
    pub selected_ids: Vec<OrderId>,
    /// Header checkbox state
    pub select_all: bool,
    /// Number of selected ids
    pub selection_count: usize,
    /// Numbered pager buttons
    pub page_buttons: Vec<PageButton>,
    /// "Previous" is enabled
    pub has_previous: bool,
    /// "Next" is enabled
    pub has_next: bool,
    /// Pager is shown at all
    pub show_pagination: bool,
    /// `"{n} total orders | Page {p} of {t}"`
    pub header_summary: String,
    /// Selection banner, or the "Showing a-b of n orders" line
    pub footer_summary: String,
}

impl ReadyView {
    fn build(state: &OrderListState, today: NaiveDate, mode: SelectAllMode) -> Self {
        let query = &state.query;
        let filtered = apply_filters(&state.orders, query, today);
        let pages = total_pages(filtered.len(), query.page_size);
        let current_page = clamp_page(query.current_page, pages);
        let page = paginate(&filtered, current_page, query.page_size);

        let page_ids: Vec<OrderId> = page.items.iter().map(|order| order.id.clone()).collect();
        let rows = page
            .items
            .iter()
            .map(|order| OrderRow {
                order: (*order).clone(),
                selected: query.is_selected(&order.id),
                badge_class: order.status.badge_class(),
            })
            .collect();

        let display_pages = page.display_total_pages();
        let selection_count = query.selected_ids.len();
        let header_summary = format!(
            "{} total orders | Page {current_page} of {display_pages}",
            filtered.len()
        );
        let footer_summary = if selection_count > 0 {
            format!("{selection_count} order(s) selected")
        } else {
            format!(
                "Showing {}-{} of {} orders",
                page.range_start(),
                page.range_end(),
                filtered.len()
            )
        };

        Self {
            filtered_count: filtered.len(),
            total_pages: display_pages,
            current_page,
            rows,
            range_start: page.range_start(),
            range_end: page.range_end(),
            selected_ids: query.selected_ids.clone(),
            select_all: select_all_checked(query, &page_ids, mode),
            selection_count,
            page_buttons: page_window(current_page, pages),
            has_previous: current_page > 1,
            has_next: current_page < display_pages,
            show_pagination: pages > 1,
            header_summary,
            footer_summary,
        }
    }

    /// Ids of the rows on this page
    #[must_use]
    pub fn page_ids(&self) -> Vec<&OrderId> {
        self.rows.iter().map(|row| &row.order.id).collect()
    }
}

/// What the order list should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "display", rename_all = "snake_case")]
pub enum OrderListView {
    /// Spinner
    Loading,
    /// Error panel with a retry prompt
    Error {
        /// User-facing message
        message: String,
    },
    /// "No orders" panel
    Empty,
    /// The table
    Ready(ReadyView),
}

impl OrderListView {
    /// Project `state` as of `today`, with the header checkbox computed per `mode`
    #[must_use]
    pub fn build(state: &OrderListState, today: NaiveDate, mode: SelectAllMode) -> Self {
        match &state.status {
            LoadStatus::Idle | LoadStatus::Loading => Self::Loading,
            LoadStatus::Failed(message) => Self::Error {
                message: message.clone(),
            },
            LoadStatus::Loaded if state.orders.is_empty() => Self::Empty,
            LoadStatus::Loaded => Self::Ready(ReadyView::build(state, today, mode)),
        }
    }

    /// The display discriminant
    #[must_use]
    pub const fn display_state(&self) -> DisplayState {
        match self {
            Self::Loading => DisplayState::Loading,
            Self::Error { .. } => DisplayState::Error,
            Self::Empty => DisplayState::Empty,
            Self::Ready(_) => DisplayState::Ready,
        }
    }

    /// The table view, if there is one
    #[must_use]
    pub const fn ready(&self) -> Option<&ReadyView> {
        match self {
            Self::Ready(view) => Some(view),
            _ => None,
        }
    }
}
