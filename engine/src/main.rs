//! Order list demo.
//!
//! Loads the bundled fixture (or the file named by `ORDERLIST_DATA`) through
//! the Store, replays a scripted session of control events and prints the
//! table after each step.
//!
//! # Running
//!
//! ```bash
//! cargo run --bin orderlist
//! ORDERLIST_ENV=production ORDERLIST_METRICS=1 cargo run --bin orderlist
//! RUST_LOG=orderlist_engine=trace cargo run --bin orderlist
//! ```
//!
//! See [`orderlist_engine::config`] for the remaining variables.

use anyhow::Context;
use orderlist_core::environment::SystemClock;
use orderlist_engine::{
    BundledOrderSource, DateFilter, JsonFileOrderSource, OrderListAction, OrderListConfig,
    OrderListEnvironment, OrderListReducer, OrderListView, OrderSource, OrderStatus, PageButton,
    StatusFilter,
};
use orderlist_runtime::Store;
use orderlist_runtime::metrics::PrometheusRecorder;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type OrderListStore = Store<
    orderlist_engine::OrderListState,
    OrderListAction,
    OrderListEnvironment,
    OrderListReducer,
>;

fn render(step: &str, view: &OrderListView) {
    println!("\n== {step} ==");
    match view {
        OrderListView::Loading => println!("Loading orders..."),
        OrderListView::Error { message } => println!("{message} [Refresh to retry]"),
        OrderListView::Empty => println!("No orders found."),
        OrderListView::Ready(table) => {
            println!("{}", table.header_summary);
            println!(
                "[{}] {:<8} {:<16} {:<18} {:<22} {:<10} status",
                if table.select_all { "x" } else { " " },
                "id",
                "user",
                "project",
                "address",
                "date",
            );
            for row in &table.rows {
                println!(
                    "[{}] {:<8} {:<16} {:<18} {:<22} {:<10} {} ({})",
                    if row.selected { "x" } else { " " },
                    row.order.id,
                    row.order.user,
                    row.order.project,
                    row.order.address,
                    row.order.date,
                    row.order.status,
                    row.badge_class,
                );
            }
            let mut footer = table.footer_summary.clone();
            if table.show_pagination {
                let buttons: Vec<String> = table
                    .page_buttons
                    .iter()
                    .map(|button| match button {
                        PageButton::Page { number, current: true } => format!("[{number}]"),
                        PageButton::Page { number, .. } => number.to_string(),
                        PageButton::Ellipsis => "...".to_string(),
                    })
                    .collect();
                footer.push_str(&format!(
                    "   {} {} {}",
                    if table.has_previous { "<Prev" } else { " -- " },
                    buttons.join(" "),
                    if table.has_next { "Next>" } else { " -- " },
                ));
            }
            println!("{footer}");
        },
    }
}

/// Send a control event and print the resulting view
async fn step(
    store: &OrderListStore,
    env: &OrderListEnvironment,
    label: &str,
    action: OrderListAction,
) -> anyhow::Result<()> {
    store.send(action).await?;
    let view = store.state(|state| env.view(state)).await;
    render(label, &view);
    Ok(())
}

/// Send a load action and print the view once its result has been applied
async fn load(
    store: &OrderListStore,
    env: &OrderListEnvironment,
    label: &str,
    action: OrderListAction,
) -> anyhow::Result<()> {
    let mut handle = store.send(action).await?;
    render(label, &store.state(|state| env.view(state)).await);
    handle
        .wait_with_timeout(Duration::from_secs(10))
        .await
        .context("load did not finish")?;
    render(label, &store.state(|state| env.view(state)).await);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orderlist_engine=debug,orderlist_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut recorder = PrometheusRecorder::new();
    if std::env::var("ORDERLIST_METRICS").is_ok_and(|v| v == "1") {
        recorder.install()?;
        orderlist_engine::metrics::describe();
    }

    let config = OrderListConfig::from_env().context("invalid ORDERLIST_* configuration")?;
    tracing::info!(
        page_size = config.page_size.get(),
        load_delay_ms = config.load_delay.as_millis(),
        select_all = %config.selection.select_all,
        retention = %config.selection.retention,
        "Starting order list demo"
    );

    let source: Arc<dyn OrderSource> = match &config.data_path {
        Some(path) => Arc::new(JsonFileOrderSource::new(path)),
        None => Arc::new(BundledOrderSource),
    };
    let env = OrderListEnvironment::new(Arc::new(SystemClock), source, config);
    let store = Store::new(env.initial_state(), OrderListReducer::new(), env.clone());

    load(&store, &env, "Load", OrderListAction::Load).await?;
    step(&store, &env, "Next page", OrderListAction::NextPage).await?;
    step(&store, &env, "Select all on page 2", OrderListAction::ToggleSelectAll).await?;
    step(&store, &env, "Jump to last page", OrderListAction::GoToPage(usize::MAX)).await?;
    step(
        &store,
        &env,
        "Search \"landing\"",
        OrderListAction::SetSearchTerm("landing".to_string()),
    )
    .await?;
    step(
        &store,
        &env,
        "Only completed",
        OrderListAction::SetStatusFilter(StatusFilter::Only(OrderStatus::Completed)),
    )
    .await?;
    step(
        &store,
        &env,
        "Placed this month",
        OrderListAction::SetDateFilter(DateFilter::ThisMonth),
    )
    .await?;
    step(
        &store,
        &env,
        "Clear filters",
        OrderListAction::SetDateFilter(DateFilter::All),
    )
    .await?;
    step(
        &store,
        &env,
        "All statuses",
        OrderListAction::SetStatusFilter(StatusFilter::All),
    )
    .await?;
    load(&store, &env, "Refresh", OrderListAction::Refresh).await?;

    store.shutdown(Duration::from_secs(5)).await?;

    if let Some(text) = recorder.render() {
        println!("\n== Metrics ==\n{text}");
    }

    Ok(())
}
