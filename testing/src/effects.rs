//! Resolve effects outside a store.
//!
//! Reducer tests usually want to know what an effect *would* feed back, for
//! example which event a create request against a mock store produces. The
//! runner executes the effect tree in place and returns those actions.

use futures::future::{BoxFuture, join_all};
use waymark_core::effect::Effect;

/// Execute effects and collect the actions they produce
///
/// - `Future` effects are awaited in order
/// - `Sequential` children run in order, `Parallel` children concurrently
/// - `Delay` effects yield their action immediately (time is skipped)
///
/// Unlike the store, produced actions are *not* reduced; the caller decides
/// what to do with them.
pub async fn run_effects<A, I>(effects: I) -> Vec<A>
where
    A: Send + 'static,
    I: IntoIterator<Item = Effect<A>>,
{
    let mut produced = Vec::new();
    for effect in effects {
        produced.extend(resolve(effect).await);
    }
    produced
}

fn resolve<A>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>>
where
    A: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => Vec::new(),
            Effect::Future(fut) => fut.await.into_iter().collect(),
            Effect::Delay { action, .. } => vec![*action],
            Effect::Sequential(effects) => {
                let mut produced = Vec::new();
                for effect in effects {
                    produced.extend(resolve(effect).await);
                }
                produced
            },
            Effect::Parallel(effects) => join_all(effects.into_iter().map(resolve))
                .await
                .into_iter()
                .flatten()
                .collect(),
        }
    })
}
