//! Effect type for composing async computations over a capability bundle
//!
//! This module provides the `Effect` type, which represents a composable, async
//! computation that reads capabilities from an environment and may fail with a
//! typed error. Effects are inert values: nothing runs until [`Effect::run`] is
//! called with a concrete capability bundle.
//!
//! # Core Concepts
//!
//! - **Capability bundle**: dependencies (database, logger, clock, ...) are
//!   injected explicitly through the environment parameter
//! - **Lazy resolution**: a capability is touched only when the step that
//!   needs it is actually reached
//! - **Short-circuit**: the first failure anywhere in a chain aborts all
//!   subsequent `and_then` steps and propagates untouched
//! - **Composability**: effects compose with `map`, `and_then`, `or_else`, etc.
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```
//! use millrace::Effect;
//!
//! # tokio_test::block_on(async {
//! // A pure effect
//! let effect = Effect::<_, String, ()>::pure(42);
//! assert_eq!(effect.run(&()).await, Ok(42));
//!
//! // A failed effect
//! let effect = Effect::<i32, _, ()>::fail("error");
//! assert_eq!(effect.run(&()).await, Err("error"));
//! # });
//! ```
//!
//! ## Composing effects
//!
//! ```
//! use millrace::Effect;
//!
//! # tokio_test::block_on(async {
//! let effect = Effect::<_, String, ()>::pure(5)
//!     .map(|x| x * 2)
//!     .and_then(|x| Effect::pure(x + 10));
//!
//! assert_eq!(effect.run(&()).await, Ok(20));
//! # });
//! ```
//!
//! ## Reading the environment
//!
//! ```
//! use millrace::Effect;
//!
//! # tokio_test::block_on(async {
//! struct Env {
//!     multiplier: i32,
//! }
//!
//! let effect = Effect::from_fn(|env: &Env| {
//!     Ok::<_, String>(env.multiplier * 2)
//! });
//!
//! let env = Env { multiplier: 21 };
//! assert_eq!(effect.run(&env).await, Ok(42));
//! # });
//! ```

use futures::future::BoxFuture;
use std::future::Future;

use crate::Validation;

/// Function type for Effect internals
type EffectFn<T, E, Env> = Box<dyn FnOnce(&Env) -> BoxFuture<'_, Result<T, E>> + Send>;

/// An async computation over a capability bundle that may fail
///
/// `Effect<T, E, Env>` represents an async computation that:
/// - Produces a value of type `T` on success
/// - Fails with an error of type `E`
/// - Reads capabilities from an environment of type `Env`
///
/// Effects are lazy - they don't execute until `run()` is called. An effect
/// never performs I/O outside of what the environment's capabilities provide,
/// so swapping the bundle (production vs. test) changes no calling code.
///
/// # Type Parameters
///
/// * `T` - The type of the success value
/// * `E` - The type of the error value (defaults to `std::convert::Infallible`)
/// * `Env` - The type of the capability bundle (defaults to `()`)
///
/// # Examples
///
/// ```
/// use millrace::Effect;
///
/// # tokio_test::block_on(async {
/// let effect: Effect<_, String> = Effect::pure(42);
/// assert_eq!(effect.run(&()).await, Ok(42));
///
/// let effect: Effect<i32, String> = Effect::fail("error".to_string());
/// assert_eq!(effect.run(&()).await, Err("error".to_string()));
/// # });
/// ```
pub struct Effect<T, E = std::convert::Infallible, Env = ()> {
    run_fn: EffectFn<T, E, Env>,
}

// Manual Debug implementation since FnOnce is not Debug
impl<T, E, Env> std::fmt::Debug for Effect<T, E, Env> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("run_fn", &"<function>")
            .finish()
    }
}

impl<T, E, Env> Effect<T, E, Env>
where
    T: Send + 'static,
    E: Send + 'static,
    Env: Sync + 'static,
{
    /// Create a pure value (no effects)
    ///
    /// This creates an effect that always succeeds with the given value,
    /// touching no capability.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<_, String, ()>::pure(42);
    /// assert_eq!(effect.run(&()).await, Ok(42));
    /// # });
    /// ```
    pub fn pure(value: T) -> Self {
        Effect {
            run_fn: Box::new(move |_| Box::pin(async move { Ok(value) })),
        }
    }

    /// Create a failing effect
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<i32, _, ()>::fail("error");
    /// assert_eq!(effect.run(&()).await, Err("error"));
    /// # });
    /// ```
    pub fn fail(error: E) -> Self {
        Effect {
            run_fn: Box::new(move |_| Box::pin(async move { Err(error) })),
        }
    }

    /// Create from a synchronous function over the environment
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::from_fn(|_: &()| Ok::<_, String>(42));
    /// assert_eq!(effect.run(&()).await, Ok(42));
    /// # });
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce(&Env) -> Result<T, E> + Send + 'static,
    {
        Effect {
            run_fn: Box::new(move |env| {
                let result = f(env);
                Box::pin(async move { result })
            }),
        }
    }

    /// Create from an async function
    ///
    /// The returned future must be `'static`; use [`Effect::from_env_async`]
    /// when the future needs to borrow the environment for the duration of a
    /// capability call.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::from_async(|_: &()| async {
    ///     Ok::<_, String>(42)
    /// });
    /// assert_eq!(effect.run(&()).await, Ok(42));
    /// # });
    /// ```
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: FnOnce(&Env) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Effect {
            run_fn: Box::new(move |env| Box::pin(f(env))),
        }
    }

    /// Create from an async function that borrows the environment
    ///
    /// This is the constructor capability calls are built from: the closure
    /// receives the bundle by reference and the returned future may keep
    /// borrowing it while a capability operation is in flight.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// struct Env {
    ///     base: i32,
    /// }
    ///
    /// let effect = Effect::from_env_async(|env: &Env| {
    ///     Box::pin(async move { Ok::<_, String>(env.base + 1) })
    /// });
    ///
    /// assert_eq!(effect.run(&Env { base: 41 }).await, Ok(42));
    /// # });
    /// ```
    pub fn from_env_async<F>(f: F) -> Self
    where
        F: FnOnce(&Env) -> BoxFuture<'_, Result<T, E>> + Send + 'static,
    {
        Effect { run_fn: Box::new(f) }
    }

    /// Create from a Result
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<_, String, ()>::from_result(Ok(42));
    /// assert_eq!(effect.run(&()).await, Ok(42));
    /// # });
    /// ```
    pub fn from_result(result: Result<T, E>) -> Self {
        Effect {
            run_fn: Box::new(move |_| Box::pin(async move { result })),
        }
    }

    /// Convert a Validation to an Effect
    ///
    /// Lifts an accumulated validation outcome into the effect chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::{Effect, Validation};
    ///
    /// # tokio_test::block_on(async {
    /// let validation = Validation::<_, String>::success(42);
    /// let effect = Effect::from_validation(validation);
    /// assert_eq!(effect.run(&()).await, Ok(42));
    /// # });
    /// ```
    pub fn from_validation(validation: Validation<T, E>) -> Self {
        match validation {
            Validation::Success(value) => Effect::pure(value),
            Validation::Failure(error) => Effect::fail(error),
        }
    }

    /// Chain effects
    ///
    /// If the current effect succeeds, apply the function to its result to
    /// produce the next effect. On failure, short-circuit: the continuation is
    /// never invoked and the failure propagates untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<_, String, ()>::pure(5)
    ///     .and_then(|x| Effect::pure(x * 2));
    /// assert_eq!(effect.run(&()).await, Ok(10));
    ///
    /// // Error propagation
    /// let effect = Effect::<_, String, ()>::fail("error".to_string())
    ///     .and_then(|x: i32| Effect::pure(x * 2));
    /// assert_eq!(effect.run(&()).await, Err("error".to_string()));
    /// # });
    /// ```
    pub fn and_then<U, F>(self, f: F) -> Effect<U, E, Env>
    where
        F: FnOnce(T) -> Effect<U, E, Env> + Send + 'static,
        U: Send + 'static,
    {
        Effect {
            run_fn: Box::new(move |env| {
                Box::pin(async move {
                    let value = (self.run_fn)(env).await?;
                    let next = f(value);
                    (next.run_fn)(env).await
                })
            }),
        }
    }

    /// Transform the success value
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<_, String, ()>::pure(5)
    ///     .map(|x| x * 2);
    /// assert_eq!(effect.run(&()).await, Ok(10));
    /// # });
    /// ```
    pub fn map<U, F>(self, f: F) -> Effect<U, E, Env>
    where
        F: FnOnce(T) -> U + Send + 'static,
        U: Send + 'static,
    {
        Effect {
            run_fn: Box::new(move |env| Box::pin(async move { (self.run_fn)(env).await.map(f) })),
        }
    }

    /// Transform the error value
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<i32, _, ()>::fail("error")
    ///     .map_err(|e| format!("Failed: {}", e));
    /// assert_eq!(effect.run(&()).await, Err("Failed: error".to_string()));
    /// # });
    /// ```
    pub fn map_err<E2, F>(self, f: F) -> Effect<T, E2, Env>
    where
        F: FnOnce(E) -> E2 + Send + 'static,
        E2: Send + 'static,
    {
        Effect {
            run_fn: Box::new(move |env| {
                Box::pin(async move { (self.run_fn)(env).await.map_err(f) })
            }),
        }
    }

    /// Recover from errors
    ///
    /// If the effect fails, apply the recovery function to the error to
    /// produce a new effect. If it succeeds, return the value unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<i32, _, ()>::fail("error")
    ///     .or_else(|_| Effect::pure(42));
    /// assert_eq!(effect.run(&()).await, Ok(42));
    /// # });
    /// ```
    pub fn or_else<F>(self, f: F) -> Self
    where
        F: FnOnce(E) -> Effect<T, E, Env> + Send + 'static,
    {
        Effect {
            run_fn: Box::new(move |env| {
                Box::pin(async move {
                    match (self.run_fn)(env).await {
                        Ok(value) => Ok(value),
                        Err(err) => {
                            let recovery = f(err);
                            (recovery.run_fn)(env).await
                        }
                    }
                })
            }),
        }
    }

    /// Fail with an error if the predicate is false
    ///
    /// A declarative guard: if the predicate returns true, the value passes
    /// through unchanged; otherwise the error function produces the failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<_, String, ()>::pure(25)
    ///     .check(|age| *age >= 18, || "too young".to_string());
    /// assert_eq!(effect.run(&()).await, Ok(25));
    /// # });
    /// ```
    #[inline]
    pub fn check<P, F>(self, predicate: P, error_fn: F) -> Self
    where
        P: FnOnce(&T) -> bool + Send + 'static,
        F: FnOnce() -> E + Send + 'static,
    {
        self.and_then(move |value| {
            if predicate(&value) {
                Effect::pure(value)
            } else {
                Effect::fail(error_fn())
            }
        })
    }

    /// Perform a side effect and return the original value
    ///
    /// Useful for logging or metrics hooks that don't affect the main
    /// computation. If the side effect fails, the entire computation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<_, String, ()>::pure(42)
    ///     .tap(|value| {
    ///         println!("Value: {}", value);
    ///         Effect::pure(())
    ///     });
    ///
    /// assert_eq!(effect.run(&()).await, Ok(42));
    /// # });
    /// ```
    #[inline]
    pub fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&T) -> Effect<(), E, Env> + Send + 'static,
        T: Clone,
    {
        self.and_then(move |value| {
            let value_clone = value.clone();
            f(&value).map(move |_| value_clone)
        })
    }

    /// Run the effect against a capability bundle
    ///
    /// This is the runner: it executes the effect and resolves to a `Result`.
    /// Capabilities are resolved lazily, only when the step that declares them
    /// is actually reached; branches never taken never touch their
    /// capabilities.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<_, String, ()>::pure(42);
    /// let result = effect.run(&()).await;
    /// assert_eq!(result, Ok(42));
    /// # });
    /// ```
    pub async fn run(self, env: &Env) -> Result<T, E> {
        (self.run_fn)(env).await
    }
}
