//! State and actions of the order list reducer.

use crate::query::{DEFAULT_PAGE_SIZE, QueryState};
use crate::types::{DateFilter, Order, OrderId, StatusFilter};
use std::num::NonZeroUsize;

/// Where the collection is in its load lifecycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A load is in flight; any previous collection is still held
    Loading,
    /// The latest load succeeded
    Loaded,
    /// The latest load failed with this user-facing message
    Failed(String),
}

/// Complete order list state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderListState {
    /// The loaded collection, in source order
    pub orders: Vec<Order>,
    /// Load lifecycle
    pub status: LoadStatus,
    /// Generation of the most recent load; older results are stale
    pub generation: u64,
    /// Search, filters, page and selection
    pub query: QueryState,
}

impl OrderListState {
    /// Empty, not-yet-loaded state
    #[must_use]
    pub const fn new(page_size: NonZeroUsize) -> Self {
        Self {
            orders: Vec::new(),
            status: LoadStatus::Idle,
            generation: 0,
            query: QueryState::new(page_size),
        }
    }

    /// Whether a load is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading)
    }
}

impl Default for OrderListState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Everything that can happen to the order list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderListAction {
    // Commands
    /// Initial load
    Load,
    /// Replace the collection with a fresh load; also the retry after a failure
    Refresh,
    /// Search box changed
    SetSearchTerm(String),
    /// Status dropdown changed
    SetStatusFilter(StatusFilter),
    /// Date dropdown changed
    SetDateFilter(DateFilter),
    /// Numbered page button; out-of-range pages are clamped
    GoToPage(usize),
    /// "Previous" button
    PreviousPage,
    /// "Next" button
    NextPage,
    /// Header checkbox
    ToggleSelectAll,
    /// Row checkbox
    ToggleSelectOrder(OrderId),

    // Load feedback
    /// A load finished
    OrdersLoaded {
        /// Generation the load was started with
        generation: u64,
        /// The new collection
        orders: Vec<Order>,
    },
    /// A load failed
    LoadFailed {
        /// Generation the load was started with
        generation: u64,
        /// User-facing message
        message: String,
    },
}

impl OrderListAction {
    /// Variant name for logs, without the payload
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Load => "Load",
            Self::Refresh => "Refresh",
            Self::SetSearchTerm(_) => "SetSearchTerm",
            Self::SetStatusFilter(_) => "SetStatusFilter",
            Self::SetDateFilter(_) => "SetDateFilter",
            Self::GoToPage(_) => "GoToPage",
            Self::PreviousPage => "PreviousPage",
            Self::NextPage => "NextPage",
            Self::ToggleSelectAll => "ToggleSelectAll",
            Self::ToggleSelectOrder(_) => "ToggleSelectOrder",
            Self::OrdersLoaded { .. } => "OrdersLoaded",
            Self::LoadFailed { .. } => "LoadFailed",
        }
    }

    /// Whether this is the outcome of a load
    #[must_use]
    pub const fn is_load_result(&self) -> bool {
        matches!(self, Self::OrdersLoaded { .. } | Self::LoadFailed { .. })
    }
}
