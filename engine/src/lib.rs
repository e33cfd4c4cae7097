//! Order list engine for the analytics dashboard.
//!
//! Search, status and date filters, pagination with a windowed pager, and
//! row selection over a collection of orders loaded from a JSON source.
//!
//! # Architecture
//!
//! The engine is a reducer over [`OrderListState`]:
//!
//! 1. **Actions** ([`OrderListAction`]) are control events (search box,
//!    dropdowns, pager, checkboxes, refresh) plus load results
//! 2. **The reducer** ([`OrderListReducer`]) applies them; the only effect is
//!    the asynchronous load
//! 3. **The view** ([`OrderListView`]) is derived from state on every read
//!
//! # Example Usage
//!
//! ```no_run
//! use orderlist_core::environment::SystemClock;
//! use orderlist_engine::{
//!     BundledOrderSource, OrderListAction, OrderListConfig, OrderListEnvironment, OrderListReducer,
//! };
//! use orderlist_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = OrderListEnvironment::new(
//!     Arc::new(SystemClock),
//!     Arc::new(BundledOrderSource),
//!     OrderListConfig::from_env()?,
//! );
//! let store = Store::new(env.initial_state(), OrderListReducer::new(), env.clone());
//!
//! // Wait for the load (and the reduction of its result) to finish
//! store.send(OrderListAction::Load).await?.wait().await;
//!
//! store.send(OrderListAction::SetSearchTerm("landing".into())).await?;
//! let view = store.state(|state| env.view(state)).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod metrics;
pub mod pagination;
pub mod query;
pub mod reducer;
pub mod selection;
pub mod source;
pub mod state;
pub mod types;
pub mod view;

pub use config::{ConfigError, Environment, OrderListConfig};
pub use pagination::{Page, PageButton, clamp_page, page_window, paginate, total_pages};
pub use query::{QueryState, apply_filters, classify_date, week_start};
pub use reducer::{LOAD_FAILED_MESSAGE, OrderListEnvironment, OrderListReducer};
pub use selection::{SelectAllMode, SelectionPolicy, SelectionRetention};
pub use source::{
    BundledOrderSource, InMemoryOrderSource, JsonFileOrderSource, LoadError, OrderSource,
    parse_orders,
};
pub use state::{LoadStatus, OrderListAction, OrderListState};
pub use types::{DateFilter, Order, OrderId, OrderStatus, StatusFilter};
pub use view::{DisplayState, OrderListView, OrderRow, ReadyView};
