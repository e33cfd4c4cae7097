//! Declarative macros for ergonomic effect construction
//!
//! Reduces the boilerplate of boxing and pinning an async block into an
//! `Effect::Future`.

/// Create an `Effect::Future` from an async block
///
/// The block is wrapped in `async move`, so it owns everything it captures.
///
/// # Example
///
/// ```rust,ignore
/// use orderlist_core::async_effect;
///
/// let source = Arc::clone(&env.source);
/// async_effect! {
///     let orders = source.load().await.ok()?;
///     Some(OrderListAction::OrdersLoaded { generation, orders })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
