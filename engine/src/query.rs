//! Query state and the filter predicate.
//!
//! A query is the combination of search term, status filter and date filter
//! plus the pagination and selection state that rides along with it. The
//! filter pass is a stable sub-sequence of the collection: it never reorders
//! and never drops an order that matches all three clauses.

use crate::types::{DateFilter, Order, OrderId, StatusFilter};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::num::NonZeroUsize;

/// Rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// User-controlled query over the order collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryState {
    /// Free-text search, matched case-insensitively
    pub search_term: String,
    /// Status dropdown
    pub status_filter: StatusFilter,
    /// Date dropdown
    pub date_filter: DateFilter,
    /// 1-indexed page
    pub current_page: usize,
    /// Rows per page
    pub page_size: NonZeroUsize,
    /// Selected order ids, in the order they were selected
    pub selected_ids: Vec<OrderId>,
    /// "Select all" checkbox flag, used when select-all is tracked
    pub select_all: bool,
}

impl QueryState {
    /// A fresh query: no search, `All`/`All`, page 1, nothing selected
    #[must_use]
    pub const fn new(page_size: NonZeroUsize) -> Self {
        Self {
            search_term: String::new(),
            status_filter: StatusFilter::All,
            date_filter: DateFilter::All,
            current_page: 1,
            page_size,
            selected_ids: Vec::new(),
            select_all: false,
        }
    }

    /// Whether an order passes search, status and date clauses
    #[must_use]
    pub fn matches(&self, order: &Order, today: NaiveDate) -> bool {
        order.matches_search(&self.search_term)
            && self.status_filter.matches(order.status)
            && classify_date(order.date, today, self.date_filter)
    }

    /// Whether `id` is currently selected
    #[must_use]
    pub fn is_selected(&self, id: &OrderId) -> bool {
        self.selected_ids.contains(id)
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Filter `orders` by `query`, preserving collection order
#[must_use]
pub fn apply_filters<'a>(orders: &'a [Order], query: &QueryState, today: NaiveDate) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|order| query.matches(order, today))
        .collect()
}

/// Sunday on or before `today`
#[must_use]
pub fn week_start(today: NaiveDate) -> NaiveDate {
    let since_sunday = u64::from(today.weekday().num_days_from_sunday());
    today - Days::new(since_sunday)
}

/// Whether an order placed on `date` falls in `bucket` relative to `today`
///
/// Weeks run Sunday through Saturday. Comparisons are on calendar dates only.
#[must_use]
pub fn classify_date(date: NaiveDate, today: NaiveDate, bucket: DateFilter) -> bool {
    match bucket {
        DateFilter::All => true,
        DateFilter::Today => date == today,
        DateFilter::ThisWeek => {
            let start = week_start(today);
            let end = start + Days::new(6);
            (start..=end).contains(&date)
        },
        DateFilter::ThisMonth => date.year() == today.year() && date.month() == today.month(),
    }
}
