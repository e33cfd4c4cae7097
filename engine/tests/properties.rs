//! Property-based tests for the filter, pagination and selection invariants.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Datelike, Days, NaiveDate, Weekday};
use orderlist_engine::pagination::{PageButton, page_window, paginate, total_pages};
use orderlist_engine::selection::{SelectAllMode, toggle_select_all, toggle_select_one};
use orderlist_engine::{
    DateFilter, Order, OrderId, OrderStatus, QueryState, StatusFilter, apply_filters,
    classify_date, week_start,
};
use proptest::prelude::*;
use std::num::NonZeroUsize;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

/// Generates an order with an index-derived id so ids stay unique.
fn arb_order() -> impl Strategy<Value = (String, String, OrderStatus, u64)> {
    (
        prop::sample::select(vec!["John Doe", "Jane Smith", "Natali Craig", "Drew Cano", "Andi Lane"]),
        prop::sample::select(vec!["Landing Page", "CRM Admin pages", "Client Project", "App Landing"]),
        prop::sample::select(OrderStatus::ALL.to_vec()),
        0u64..730,
    )
        .prop_map(|(user, project, status, day)| (user.to_string(), project.to_string(), status, day))
}

fn arb_orders() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec(arb_order(), 0..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (user, project, status, day))| Order {
                id: OrderId::new(format!("ORD{:03}", i + 1)),
                user,
                project,
                address: "Washburn Baton Rouge".to_string(),
                date: base_date() + Days::new(day),
                status,
            })
            .collect()
    })
}

fn arb_status_filter() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        prop::sample::select(OrderStatus::ALL.to_vec()).prop_map(StatusFilter::Only),
    ]
}

fn arb_date_filter() -> impl Strategy<Value = DateFilter> {
    prop::sample::select(vec![
        DateFilter::All,
        DateFilter::Today,
        DateFilter::ThisWeek,
        DateFilter::ThisMonth,
    ])
}

fn arb_term() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", "o", "JOHN", "landing", "ord01", "crm", "zzz"]).prop_map(String::from)
}

fn arb_today() -> impl Strategy<Value = NaiveDate> {
    (0u64..730).prop_map(|day| base_date() + Days::new(day))
}

proptest! {
    #[test]
    fn filtering_is_an_ordered_subsequence(
        orders in arb_orders(),
        term in arb_term(),
        status in arb_status_filter(),
        date in arb_date_filter(),
        today in arb_today(),
    ) {
        let mut query = QueryState::default();
        query.search_term = term;
        query.status_filter = status;
        query.date_filter = date;

        let filtered = apply_filters(&orders, &query, today);

        // Exactly the matching orders, in collection order
        let expected: Vec<&Order> = orders.iter().filter(|o| query.matches(o, today)).collect();
        prop_assert_eq!(&filtered, &expected);

        // Positions in the collection are strictly increasing
        let positions: Vec<usize> = filtered
            .iter()
            .map(|f| orders.iter().position(|o| o.id == f.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn narrowing_a_filter_never_adds_orders(
        orders in arb_orders(),
        status in prop::sample::select(OrderStatus::ALL.to_vec()),
        date in arb_date_filter(),
        today in arb_today(),
    ) {
        let broad = QueryState::default();
        let mut narrow = QueryState::default();
        narrow.status_filter = StatusFilter::Only(status);
        narrow.date_filter = date;

        let all = apply_filters(&orders, &broad, today);
        let some = apply_filters(&orders, &narrow, today);
        prop_assert!(some.len() <= all.len());
        prop_assert!(some.iter().all(|o| all.contains(o)));
        prop_assert!(some.iter().all(|o| o.status == status));
    }

    #[test]
    fn search_ignores_case(orders in arb_orders(), term in arb_term(), today in arb_today()) {
        let mut lower = QueryState::default();
        lower.search_term = term.to_lowercase();
        let mut upper = QueryState::default();
        upper.search_term = term.to_uppercase();

        prop_assert_eq!(
            apply_filters(&orders, &lower, today),
            apply_filters(&orders, &upper, today)
        );
    }

    #[test]
    fn pages_partition_the_sequence(len in 0usize..200, size in 1usize..25) {
        let items: Vec<usize> = (0..len).collect();
        let page_size = NonZeroUsize::new(size).unwrap();
        let pages = total_pages(len, page_size);

        let mut seen = Vec::new();
        for page in 1..=pages {
            let slice = paginate(&items, page, page_size);
            prop_assert!(!slice.items.is_empty());
            prop_assert!(slice.items.len() <= size);
            prop_assert_eq!(slice.range_end() - slice.range_start() + 1, slice.items.len());
            seen.extend_from_slice(slice.items);
        }
        prop_assert_eq!(seen, items.clone());
        prop_assert!(paginate(&items, pages + 1, page_size).items.is_empty());
    }

    #[test]
    fn page_window_is_bounded_and_contains_current(total in 1usize..60, pick in 0usize..60) {
        let current = pick % total + 1;
        let buttons = page_window(current, total);
        let numbered: Vec<usize> = buttons.iter().filter_map(|b| b.number()).collect();

        prop_assert!(numbered.iter().all(|&n| (1..=total).contains(&n)));
        prop_assert!(numbered.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(numbered.contains(&current));
        prop_assert!(numbered.len() <= 6);

        let currents = buttons
            .iter()
            .filter(|b| matches!(b, PageButton::Page { current: true, .. }))
            .count();
        prop_assert_eq!(currents, 1);

        let has_ellipsis = buttons.contains(&PageButton::Ellipsis);
        prop_assert_eq!(has_ellipsis, total > 5 && current < total - 2);
        if has_ellipsis {
            prop_assert_eq!(numbered.last().copied(), Some(total));
        }
    }

    #[test]
    fn this_week_is_the_sunday_to_saturday_span(today in arb_today(), offset in 0u64..21) {
        let date = today - Days::new(10) + Days::new(offset);
        let start = week_start(today);

        prop_assert_eq!(start.weekday(), Weekday::Sun);
        prop_assert!(start <= today && today < start + Days::new(7));
        prop_assert_eq!(
            classify_date(date, today, DateFilter::ThisWeek),
            start <= date && date <= start + Days::new(6)
        );
    }

    #[test]
    fn tracked_select_all_twice_clears(count in 0usize..15) {
        let page: Vec<OrderId> = (1..=count).map(|n| OrderId::new(format!("ORD{n:03}"))).collect();
        let mut query = QueryState::default();

        toggle_select_all(&mut query, &page, SelectAllMode::Tracked);
        prop_assert_eq!(&query.selected_ids, &page);
        toggle_select_all(&mut query, &page, SelectAllMode::Tracked);
        prop_assert!(query.selected_ids.is_empty());
        prop_assert!(!query.select_all);
    }

    #[test]
    fn row_toggles_twice_are_identity(picks in prop::collection::vec(0usize..10, 0..20)) {
        let mut query = QueryState::default();
        for &n in &picks {
            toggle_select_one(&mut query, OrderId::new(format!("ORD{n:03}")));
        }
        let once = query.selected_ids.clone();
        for &n in &picks {
            toggle_select_one(&mut query, OrderId::new(format!("ORD{n:03}")));
            toggle_select_one(&mut query, OrderId::new(format!("ORD{n:03}")));
        }
        let mut before = once.clone();
        let mut after = query.selected_ids.clone();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }
}
