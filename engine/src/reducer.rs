//! Order list reducer.
//!
//! All state changes happen here. The only effect is the load: a future that
//! waits out the configured delay, asks the [`OrderSource`] for the
//! collection and resolves to `OrdersLoaded` or `LoadFailed`. Each load gets a
//! fresh generation, and results carrying any other generation are dropped.

use crate::config::OrderListConfig;
use crate::metrics::{LOADS_FAILED, LOADS_STALE, LOADS_TOTAL};
use crate::pagination::{clamp_page, paginate, total_pages};
use crate::query::apply_filters;
use crate::selection::{retain_for_page, toggle_row, toggle_select_all};
use crate::source::OrderSource;
use crate::state::{LoadStatus, OrderListAction, OrderListState};
use crate::types::OrderId;
use crate::view::OrderListView;
use chrono::{FixedOffset, NaiveDate};
use orderlist_core::effect::Effect;
use orderlist_core::environment::Clock;
use orderlist_core::reducer::Reducer;
use orderlist_core::{SmallVec, async_effect, smallvec};
use std::sync::Arc;

/// Message shown when a load fails; details go to the log
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load orders data. Please try again later.";

/// Dependencies of the order list reducer
#[derive(Clone)]
pub struct OrderListEnvironment {
    /// Source of "now"
    pub clock: Arc<dyn Clock>,
    /// Where orders come from
    pub source: Arc<dyn OrderSource>,
    /// Settings
    pub config: OrderListConfig,
}

impl OrderListEnvironment {
    /// Creates a new environment
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, source: Arc<dyn OrderSource>, config: OrderListConfig) -> Self {
        Self {
            clock,
            source,
            config,
        }
    }

    /// Calendar offset in effect now, resolved on every call
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        self.config.utc_offset_at(self.clock.now())
    }

    /// Today's calendar date
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.utc_offset())
    }

    /// Fresh state sized by the configured page size
    #[must_use]
    pub const fn initial_state(&self) -> OrderListState {
        OrderListState::new(self.config.page_size)
    }

    /// Render `state` as of today
    #[must_use]
    pub fn view(&self, state: &OrderListState) -> OrderListView {
        OrderListView::build(state, self.today(), self.config.selection.select_all)
    }
}

/// Reducer for the order list
#[derive(Clone, Debug, Default)]
pub struct OrderListReducer;

impl OrderListReducer {
    /// Creates a new order list reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Number of pages under the current filters
    fn page_count(state: &OrderListState, today: NaiveDate) -> usize {
        let filtered = apply_filters(&state.orders, &state.query, today);
        total_pages(filtered.len(), state.query.page_size)
    }

    /// Ids on the current page under the current filters
    fn page_ids(state: &OrderListState, today: NaiveDate) -> Vec<OrderId> {
        let filtered = apply_filters(&state.orders, &state.query, today);
        paginate(&filtered, state.query.current_page, state.query.page_size)
            .items
            .iter()
            .map(|order| order.id.clone())
            .collect()
    }

    /// Apply the retention policy after the visible page changed
    fn page_changed(state: &mut OrderListState, env: &OrderListEnvironment) {
        let page_ids = Self::page_ids(state, env.today());
        retain_for_page(&mut state.query, &page_ids, env.config.selection);
    }

    /// Store a filter value; a real change returns to page 1
    fn set_filter<T: PartialEq>(
        state: &mut OrderListState,
        env: &OrderListEnvironment,
        select: impl FnOnce(&mut OrderListState) -> &mut T,
        value: T,
    ) {
        let slot = select(state);
        if *slot == value {
            return;
        }
        *slot = value;
        state.query.current_page = 1;
        Self::page_changed(state, env);
    }

    fn start_load(state: &mut OrderListState, env: &OrderListEnvironment) -> Effect<OrderListAction> {
        state.generation += 1;
        state.status = LoadStatus::Loading;
        let generation = state.generation;
        tracing::info!(generation, source = env.source.name(), "Loading orders");

        let source = Arc::clone(&env.source);
        let delay = env.config.load_delay;
        async_effect! {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            metrics::counter!(LOADS_TOTAL).increment(1);

            let action = match source.load().await {
                Ok(orders) => {
                    tracing::info!(generation, count = orders.len(), "Orders data loaded");
                    OrderListAction::OrdersLoaded { generation, orders }
                },
                Err(error) => {
                    tracing::error!(generation, source = source.name(), %error, "Error loading orders");
                    metrics::counter!(LOADS_FAILED).increment(1);
                    OrderListAction::LoadFailed {
                        generation,
                        message: LOAD_FAILED_MESSAGE.to_string(),
                    }
                },
            };
            Some(action)
        }
    }

    /// Whether a load result belongs to the load in flight
    fn is_current(state: &OrderListState, generation: u64) -> bool {
        if generation == state.generation {
            return true;
        }
        tracing::debug!(
            generation,
            current = state.generation,
            "Discarding stale load result"
        );
        metrics::counter!(LOADS_STALE).increment(1);
        false
    }
}

impl Reducer for OrderListReducer {
    type State = OrderListState;
    type Action = OrderListAction;
    type Environment = OrderListEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::debug!(action = action.name(), "Reducing");

        match action {
            OrderListAction::Load | OrderListAction::Refresh => {
                return smallvec![Self::start_load(state, env)];
            },

            OrderListAction::SetSearchTerm(term) => {
                Self::set_filter(state, env, |s| &mut s.query.search_term, term);
            },
            OrderListAction::SetStatusFilter(filter) => {
                Self::set_filter(state, env, |s| &mut s.query.status_filter, filter);
            },
            OrderListAction::SetDateFilter(filter) => {
                Self::set_filter(state, env, |s| &mut s.query.date_filter, filter);
            },

            OrderListAction::GoToPage(page) => {
                let pages = Self::page_count(state, env.today());
                state.query.current_page = clamp_page(page, pages);
                Self::page_changed(state, env);
            },
            OrderListAction::PreviousPage => {
                if state.query.current_page > 1 {
                    state.query.current_page -= 1;
                    Self::page_changed(state, env);
                }
            },
            OrderListAction::NextPage => {
                if state.query.current_page < Self::page_count(state, env.today()) {
                    state.query.current_page += 1;
                    Self::page_changed(state, env);
                }
            },

            OrderListAction::ToggleSelectAll => {
                let page_ids = Self::page_ids(state, env.today());
                toggle_select_all(&mut state.query, &page_ids, env.config.selection.select_all);
            },
            OrderListAction::ToggleSelectOrder(id) => {
                let page_ids = Self::page_ids(state, env.today());
                let retention = env.config.selection.retention;
                if !toggle_row(&mut state.query, id.clone(), &page_ids, retention) {
                    tracing::debug!(id = %id, "Ignoring selection of an order not on the visible page");
                }
            },

            OrderListAction::OrdersLoaded { generation, orders } => {
                if Self::is_current(state, generation) {
                    state.orders = orders;
                    state.status = LoadStatus::Loaded;
                    let pages = Self::page_count(state, env.today());
                    state.query.current_page = clamp_page(state.query.current_page, pages);
                    Self::page_changed(state, env);
                }
            },
            OrderListAction::LoadFailed {
                generation,
                message,
            } => {
                if Self::is_current(state, generation) {
                    tracing::warn!(generation, "Order load failed, waiting for refresh");
                    state.orders.clear();
                    state.status = LoadStatus::Failed(message);
                    state.query.current_page = 1;
                    Self::page_changed(state, env);
                }
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionPolicy;
    use crate::source::InMemoryOrderSource;
    use crate::types::{DateFilter, Order, OrderStatus, StatusFilter};
    use orderlist_testing::{ReducerTest, assertions, clock_on};
    use std::time::Duration;

    fn orders(count: usize) -> Vec<Order> {
        (1..=count)
            .map(|n| Order {
                id: OrderId::new(format!("ORD{n:03}")),
                user: format!("User {n}"),
                project: "Client Project".to_string(),
                address: "Larry San Francisco".to_string(),
                date: NaiveDate::from_ymd_opt(2023, 9, 20).unwrap(),
                status: OrderStatus::ALL[n % 4],
            })
            .collect()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn config() -> OrderListConfig {
        OrderListConfig::new()
            .with_load_delay(Duration::ZERO)
            .with_utc_offset(utc())
    }

    fn env_with(source: InMemoryOrderSource, config: OrderListConfig) -> OrderListEnvironment {
        OrderListEnvironment::new(Arc::new(clock_on(2023, 9, 20)), Arc::new(source), config)
    }

    fn env() -> OrderListEnvironment {
        env_with(InMemoryOrderSource::new(orders(23)), config())
    }

    fn legacy_env() -> OrderListEnvironment {
        env_with(
            InMemoryOrderSource::new(orders(23)),
            config().with_selection(SelectionPolicy::LEGACY),
        )
    }

    fn loaded(count: usize) -> OrderListState {
        let mut state = OrderListState::default();
        state.orders = orders(count);
        state.status = LoadStatus::Loaded;
        state.generation = 1;
        state
    }

    fn ids(raw: &[&str]) -> Vec<OrderId> {
        raw.iter().copied().map(OrderId::from).collect()
    }

    fn run_effect(effect: Effect<OrderListAction>) -> Option<OrderListAction> {
        let Effect::Future(fut) = effect else {
            unreachable!("load is always a future effect");
        };
        tokio_test::block_on(fut)
    }

    #[test]
    fn load_starts_generation_and_emits_future() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(OrderListState::default())
            .when_action(OrderListAction::Load)
            .then_state(|state| {
                assert_eq!(state.status, LoadStatus::Loading);
                assert_eq!(state.generation, 1);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn load_effect_resolves_to_orders_loaded() {
        let env = env();
        let mut state = OrderListState::default();
        let mut effects = OrderListReducer::new().reduce(&mut state, OrderListAction::Load, &env);

        let action = run_effect(effects.remove(0)).unwrap();
        let OrderListAction::OrdersLoaded { generation, orders } = action else {
            panic!("expected OrdersLoaded, got {action:?}");
        };
        assert_eq!(generation, 1);
        assert_eq!(orders.len(), 23);
    }

    #[test]
    fn failing_source_resolves_to_generic_message() {
        let env = env_with(InMemoryOrderSource::failing("disk on fire"), config());
        let mut state = OrderListState::default();
        let mut effects = OrderListReducer::new().reduce(&mut state, OrderListAction::Refresh, &env);

        assert_eq!(
            run_effect(effects.remove(0)),
            Some(OrderListAction::LoadFailed {
                generation: 1,
                message: LOAD_FAILED_MESSAGE.to_string(),
            })
        );
    }

    #[test]
    fn loaded_result_replaces_collection() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(OrderListState::default())
            .when_action(OrderListAction::Load)
            .when_action(OrderListAction::OrdersLoaded {
                generation: 1,
                orders: orders(2),
            })
            .then_state(|state| {
                assert_eq!(state.status, LoadStatus::Loaded);
                assert_eq!(state.orders.len(), 2);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn stale_result_is_discarded() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(OrderListState::default())
            .when_action(OrderListAction::Load)
            .when_action(OrderListAction::Refresh)
            .when_action(OrderListAction::OrdersLoaded {
                generation: 1,
                orders: orders(5),
            })
            .then_state(|state| {
                assert_eq!(state.generation, 2);
                assert!(state.is_loading());
                assert!(state.orders.is_empty());
            })
            .run();
    }

    #[test]
    fn failure_clears_collection_and_refresh_retries() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::Refresh)
            .when_action(OrderListAction::LoadFailed {
                generation: 2,
                message: LOAD_FAILED_MESSAGE.to_string(),
            })
            .then_state(|state| {
                assert!(state.orders.is_empty());
                assert_eq!(
                    state.status,
                    LoadStatus::Failed(LOAD_FAILED_MESSAGE.to_string())
                );
            })
            .run();

        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(0))
            .when_action(OrderListAction::LoadFailed {
                generation: 1,
                message: LOAD_FAILED_MESSAGE.to_string(),
            })
            .when_action(OrderListAction::Refresh)
            .then_state(|state| assert!(state.is_loading()))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn filter_change_resets_page() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::GoToPage(3))
            .when_action(OrderListAction::SetSearchTerm("ord".to_string()))
            .then_state(|state| {
                assert_eq!(state.query.current_page, 1);
                assert_eq!(state.query.search_term, "ord");
            })
            .run();

        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::GoToPage(2))
            .when_action(OrderListAction::SetDateFilter(DateFilter::ThisMonth))
            .then_state(|state| assert_eq!(state.query.current_page, 1))
            .run();
    }

    #[test]
    fn unchanged_filter_keeps_page() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::GoToPage(2))
            .when_action(OrderListAction::SetStatusFilter(StatusFilter::All))
            .when_action(OrderListAction::SetSearchTerm(String::new()))
            .then_state(|state| assert_eq!(state.query.current_page, 2))
            .run();
    }

    #[test]
    fn page_requests_are_clamped() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::GoToPage(9))
            .then_state(|state| assert_eq!(state.query.current_page, 3))
            .run();

        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::GoToPage(0))
            .then_state(|state| assert_eq!(state.query.current_page, 1))
            .run();
    }

    #[test]
    fn previous_and_next_stop_at_bounds() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::PreviousPage)
            .when_action(OrderListAction::NextPage)
            .when_action(OrderListAction::NextPage)
            .when_action(OrderListAction::NextPage)
            .then_state(|state| assert_eq!(state.query.current_page, 3))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn reload_reclamps_page() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::GoToPage(3))
            .when_action(OrderListAction::Refresh)
            .when_action(OrderListAction::OrdersLoaded {
                generation: 2,
                orders: orders(12),
            })
            .then_state(|state| assert_eq!(state.query.current_page, 2))
            .run();
    }

    #[test]
    fn tracked_select_all_toggles() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(legacy_env())
            .given_state(loaded(23))
            .when_action(OrderListAction::ToggleSelectAll)
            .then_state(|state| {
                assert!(state.query.select_all);
                assert_eq!(state.query.selected_ids.len(), 10);
                assert_eq!(state.query.selected_ids[0].as_str(), "ORD001");
            })
            .run();

        ReducerTest::new(OrderListReducer::new())
            .with_env(legacy_env())
            .given_state(loaded(23))
            .when_action(OrderListAction::ToggleSelectAll)
            .when_action(OrderListAction::ToggleSelectAll)
            .then_state(|state| {
                assert!(!state.query.select_all);
                assert!(state.query.selected_ids.is_empty());
            })
            .run();
    }

    #[test]
    fn retained_selection_survives_paging() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(legacy_env())
            .given_state(loaded(23))
            .when_action(OrderListAction::ToggleSelectOrder(OrderId::from("ORD002")))
            .when_action(OrderListAction::NextPage)
            .then_state(|state| {
                assert_eq!(state.query.selected_ids, ids(&["ORD002"]));
            })
            .run();
    }

    #[test]
    fn pruned_selection_follows_page() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::ToggleSelectAll)
            .when_action(OrderListAction::NextPage)
            .then_state(|state| {
                assert!(state.query.selected_ids.is_empty());
                assert_eq!(state.query.current_page, 2);
            })
            .run();

        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::ToggleSelectOrder(OrderId::from("ORD003")))
            .when_action(OrderListAction::ToggleSelectOrder(OrderId::from("ORD010")))
            .when_action(OrderListAction::SetSearchTerm("ORD00".to_string()))
            .then_state(|state| {
                assert_eq!(state.query.selected_ids, ids(&["ORD003"]));
            })
            .run();
    }

    #[test]
    fn pruned_selection_ignores_rows_off_the_page() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(23))
            .when_action(OrderListAction::ToggleSelectOrder(OrderId::from("ORD012")))
            .when_action(OrderListAction::ToggleSelectOrder(OrderId::from("ORD004")))
            .then_state(|state| {
                assert_eq!(state.query.selected_ids, ids(&["ORD004"]));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn retained_selection_accepts_rows_off_the_page() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(legacy_env())
            .given_state(loaded(23))
            .when_action(OrderListAction::ToggleSelectOrder(OrderId::from("ORD012")))
            .then_state(|state| {
                assert_eq!(state.query.selected_ids, ids(&["ORD012"]));
            })
            .run();
    }

    #[test]
    fn derived_select_all_after_row_toggles() {
        ReducerTest::new(OrderListReducer::new())
            .with_env(env())
            .given_state(loaded(2))
            .when_action(OrderListAction::ToggleSelectOrder(OrderId::from("ORD001")))
            .when_action(OrderListAction::ToggleSelectAll)
            .then_state(|state| {
                assert_eq!(state.query.selected_ids, ids(&["ORD001", "ORD002"]));
            })
            .run();
    }

    #[test]
    fn today_uses_clock_and_offset() {
        let env = env();
        assert_eq!(env.today(), NaiveDate::from_ymd_opt(2023, 9, 20).unwrap());
        assert_eq!(env.utc_offset(), utc());
    }

    #[test]
    fn system_offset_follows_the_clock() {
        use chrono::{Local, TimeZone};

        let clock = Arc::new(clock_on(2024, 7, 15));
        let env = OrderListEnvironment::new(
            Arc::clone(&clock) as Arc<dyn Clock>,
            Arc::new(InMemoryOrderSource::new(Vec::new())),
            OrderListConfig::new(),
        );

        let expected = Local.offset_from_utc_datetime(&clock.now().naive_utc());
        assert_eq!(env.utc_offset(), expected);
        assert_eq!(env.today(), clock.now().with_timezone(&expected).date_naive());
    }
}
