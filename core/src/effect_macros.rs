//! Declarative macros for ergonomic effect construction
//!
//! Reducers build most of their effects from an async block that calls a
//! collaborator and maps the outcome to a follow-up action, or from a delayed
//! action. These macros remove the boxing boilerplate for both.

/// Create an `Effect::Future` from an async block
///
/// The block must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use waymark_core::async_effect;
///
/// let store = Arc::clone(&env.store);
/// async_effect! {
///     match store.delete_by_id(&id).await {
///         Ok(()) => Some(MarkerAction::MarkerDeleted { index, id }),
///         Err(error) => Some(MarkerAction::DeleteFailed { id, error }),
///     }
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

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use waymark_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(5),
///     action: MarkerAction::DismissNotice { id: 3 }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}
