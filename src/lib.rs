//! Capability-scoped effect composition with accumulating validation
//!
//! Millrace models side-effecting work as inert [`Effect`] values: async
//! computations that read narrow capabilities (database, logger, clock,
//! cancellation, cache) from an environment and resolve to a typed
//! `Result`. Nothing runs until [`Effect::run`] is handed a concrete
//! capability bundle, so the same composition executes against production
//! capabilities or in-process test doubles without changing a line.
//!
//! Three layers build on the core type:
//!
//! - **Capabilities** ([`capability`]) — small traits with one production and
//!   one test implementation each, accessed through `Has*` bounds on the
//!   environment. A bundle missing a required capability fails to type-check.
//! - **Decorators** ([`decorator`]) — `Effect -> Effect` wrappers for logging,
//!   timing, transactions, cache-aside, and timeouts.
//! - **Operations** ([`ops`]) — a worked todo domain (list, get, create,
//!   update, toggle, delete) with field validation that accumulates every
//!   violation instead of stopping at the first.
//!
//! # Quick Start
//!
//! ```
//! use millrace::ops;
//! use millrace::testing::TestEnv;
//!
//! # tokio_test::block_on(async {
//! let env = TestEnv::new();
//!
//! let todo = ops::create("Write the docs".to_string(), None)
//!     .run(&env)
//!     .await
//!     .unwrap();
//!
//! let toggled = ops::toggle_complete(todo.id).run(&env).await.unwrap();
//! assert!(toggled.is_completed);
//! # });
//! ```
//!
//! # Design
//!
//! The library follows a pure-core, imperative-shell split: validation and
//! composition are pure, and every side effect goes through a capability the
//! host injected. Failures short-circuit a chain the moment they occur and
//! propagate untouched through the decorators; validation is the deliberate
//! exception, accumulating field errors across independent checks before the
//! chain continues.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod capability;
pub mod decorator;
pub mod effect;
pub mod error;
pub mod ops;
pub mod semigroup;
pub mod testing;
pub mod todo;
pub mod validation;

pub use capability::{
    Cache, CacheValue, CancellationToken, CapturedLogger, Clock, Database, HasCache,
    HasCancellation, HasClock, HasDatabase, HasLogger, LogLevel, Logger, ManualClock,
    MemoryCache, MemoryStore, SystemClock, TracingLogger,
};
pub use effect::Effect;
pub use error::{FieldError, StoreError, TodoError};
pub use semigroup::Semigroup;
pub use todo::{Todo, TodoId, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
pub use validation::{ValidateAll, Validation};

/// Commonly used types, for glob import
pub mod prelude {
    pub use crate::capability::{
        Cache, CancellationToken, Clock, Database, HasCache, HasCancellation, HasClock,
        HasDatabase, HasLogger, Logger,
    };
    pub use crate::effect::Effect;
    pub use crate::error::{FieldError, StoreError, TodoError};
    pub use crate::semigroup::Semigroup;
    pub use crate::todo::{Todo, TodoId};
    pub use crate::validation::Validation;
}
