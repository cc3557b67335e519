//! Cross-cutting decorators for effects
//!
//! A decorator takes an effect and returns an effect with the same value and
//! error types, adding behavior around it. Decorators compose; when stacked,
//! the conventional order from innermost to outermost is transaction, cache,
//! metrics, logging, so that a cache hit skips the transaction and the log
//! line reports the total elapsed time including cache and transaction work.
//!
//! None of the decorators change what the inner effect resolves to, with two
//! exceptions spelled out below: [`with_cache`] may skip the inner effect
//! entirely on a hit, and [`with_timeout`] replaces a too-slow execution's
//! outcome with the caller's timeout error.

use std::sync::Arc;
use std::time::Duration;

use crate::capability::{Database, HasCache, HasClock, HasDatabase, HasLogger};
use crate::error::StoreError;
use crate::Effect;

/// Log start, success, and failure around an effect
///
/// Emits `{name} started` before the inner effect runs, the caller-supplied
/// success line on success, and `{name} failed` with the debug-formatted
/// error on failure. The outcome passes through untouched either way.
///
/// # Examples
///
/// ```
/// use millrace::decorator::with_logging;
/// use millrace::testing::TestEnv;
/// use millrace::Effect;
///
/// # tokio_test::block_on(async {
/// let env = TestEnv::new();
/// let effect = with_logging(
///     "answer",
///     |n| format!("answer computed: {}", n),
///     Effect::<_, String, TestEnv>::pure(42),
/// );
///
/// assert_eq!(effect.run(&env).await, Ok(42));
/// assert!(env.logger.contains("answer started"));
/// assert!(env.logger.contains("answer computed: 42"));
/// # });
/// ```
pub fn with_logging<T, E, Env, F>(
    name: &'static str,
    success_msg: F,
    inner: Effect<T, E, Env>,
) -> Effect<T, E, Env>
where
    T: Send + 'static,
    E: std::fmt::Debug + Send + 'static,
    Env: HasLogger + Sync + 'static,
    F: FnOnce(&T) -> String + Send + 'static,
{
    Effect::from_env_async(move |env: &Env| {
        Box::pin(async move {
            env.logger().info(&format!("{} started", name));
            match inner.run(env).await {
                Ok(value) => {
                    env.logger().info(&success_msg(&value));
                    Ok(value)
                }
                Err(error) => {
                    let cause = format!("{:?}", error);
                    env.logger().error(&format!("{} failed", name), Some(&cause));
                    Err(error)
                }
            }
        })
    })
}

/// Record the wall-clock duration of an effect
///
/// Reads the clock capability before and after the inner effect and reports
/// the elapsed time through the logger, on success and on failure alike. The
/// outcome passes through untouched.
pub fn with_metrics<T, E, Env>(name: &'static str, inner: Effect<T, E, Env>) -> Effect<T, E, Env>
where
    T: Send + 'static,
    E: Send + 'static,
    Env: HasClock + HasLogger + Sync + 'static,
{
    Effect::from_env_async(move |env: &Env| {
        Box::pin(async move {
            let started = env.clock().now();
            let result = inner.run(env).await;
            // A clock stepping backwards reports zero rather than failing
            let elapsed = env
                .clock()
                .now()
                .duration_since(started)
                .unwrap_or_default();
            let outcome = if result.is_ok() { "ok" } else { "err" };
            env.logger().info(&format!(
                "{} completed in {}ms ({})",
                name,
                elapsed.as_millis(),
                outcome
            ));
            result
        })
    })
}

/// Discards the open transaction level if the bracket never resolved it
///
/// Armed between `begin` and the matching `commit`/`rollback`; if the
/// bracket's future is dropped in that window, the level is released
/// through [`Database::abandon`] instead of leaking.
struct TxGuard<'a> {
    database: &'a dyn Database,
    armed: bool,
}

impl<'a> TxGuard<'a> {
    fn new(database: &'a dyn Database) -> Self {
        TxGuard {
            database,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TxGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.database.abandon();
        }
    }
}

/// Run an effect inside a store transaction
///
/// Opens a transaction, runs the inner effect, then commits on success or
/// rolls back on failure. The inner failure propagates verbatim; a rollback
/// failure is logged and never masks it. Nesting is safe: the store
/// depth-counts, so only the outermost wrapper opens and resolves a real
/// transaction. The bracket is also drop-safe: if its future is abandoned
/// between `begin` and resolution, the open level is discarded through
/// [`Database::abandon`], so a racing timeout cannot leak a transaction or
/// leave a partial write visible.
pub fn with_transaction<T, E, Env>(inner: Effect<T, E, Env>) -> Effect<T, E, Env>
where
    T: Send + 'static,
    E: From<StoreError> + Send + 'static,
    Env: HasDatabase + Sync + 'static,
{
    Effect::from_env_async(move |env: &Env| {
        Box::pin(async move {
            env.database().begin().await.map_err(E::from)?;
            let mut guard = TxGuard::new(env.database());
            match inner.run(env).await {
                Ok(value) => {
                    env.database().commit().await.map_err(E::from)?;
                    guard.disarm();
                    Ok(value)
                }
                Err(error) => {
                    if let Err(rollback_err) = env.database().rollback().await {
                        tracing::warn!("rollback failed: {}", rollback_err);
                    }
                    guard.disarm();
                    Err(error)
                }
            }
        })
    })
}

/// Cache-aside wrapper around an effect
///
/// On a live cache hit the inner effect never runs and the cached value is
/// returned. On a miss the inner effect runs; its success value is stored
/// with an absolute expiry of now plus `ttl` before being returned. Failures
/// are never cached, and a wrong-typed or expired entry counts as a miss.
pub fn with_cache<T, E, Env>(
    key: impl Into<String>,
    ttl: Duration,
    inner: Effect<T, E, Env>,
) -> Effect<T, E, Env>
where
    T: Clone + Send + Sync + 'static,
    E: Send + 'static,
    Env: HasCache + HasClock + Sync + 'static,
{
    let key = key.into();
    Effect::from_env_async(move |env: &Env| {
        Box::pin(async move {
            let now = env.clock().now();
            if let Some(hit) = env.cache().lookup(&key, now) {
                if let Ok(value) = hit.downcast::<T>() {
                    return Ok((*value).clone());
                }
            }
            let value = inner.run(env).await?;
            // A ttl past the end of representable time skips caching
            if let Some(expires_at) = now.checked_add(ttl) {
                env.cache().store(&key, Arc::new(value.clone()), expires_at);
            }
            Ok(value)
        })
    })
}

/// Bound an effect's execution time
///
/// If the inner effect does not resolve within `duration`, its execution is
/// dropped and the effect fails with the caller-supplied error. Work the
/// inner effect completed before the deadline is not undone here; stack this
/// inside [`with_transaction`] when partial writes must roll back, so the
/// expiry surfaces as a failure the bracket handles. A timeout stacked
/// outside a transaction still cannot leak it: the dropped bracket discards
/// its open level on the way down.
pub fn with_timeout<T, E, Env, F>(
    duration: Duration,
    on_timeout: F,
    inner: Effect<T, E, Env>,
) -> Effect<T, E, Env>
where
    T: Send + 'static,
    E: Send + 'static,
    Env: Sync + 'static,
    F: FnOnce() -> E + Send + 'static,
{
    Effect::from_env_async(move |env: &Env| {
        Box::pin(async move {
            match tokio::time::timeout(duration, inner.run(env)).await {
                Ok(result) => result,
                Err(_) => Err(on_timeout()),
            }
        })
    })
}
