//! Test doubles and assertion helpers
//!
//! [`TestEnv`] bundles the in-process capability implementations into one
//! environment that satisfies every `Has*` bound the operations ask for.
//! Fields are public so tests seed the store, advance the clock, fire the
//! token, and inspect captured logs directly.
//!
//! # Examples
//!
//! ```
//! use millrace::ops;
//! use millrace::testing::TestEnv;
//!
//! # tokio_test::block_on(async {
//! let env = TestEnv::new();
//! let todos = ops::list().run(&env).await.unwrap();
//! assert!(todos.is_empty());
//! # });
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use crate::capability::{
    Cache, CancellationToken, CapturedLogger, Clock, Database, HasCache, HasCancellation,
    HasClock, HasDatabase, HasLogger, Logger, ManualClock, MemoryCache, MemoryStore,
};

/// Complete capability bundle for tests
#[derive(Debug)]
pub struct TestEnv {
    /// In-process store, inspectable and seedable
    pub store: Arc<MemoryStore>,
    /// Captures every log entry for assertions
    pub logger: Arc<CapturedLogger>,
    /// Frozen clock, moved explicitly
    pub clock: Arc<ManualClock>,
    /// In-process lookaside cache
    pub cache: Arc<MemoryCache>,
    /// This execution's cancellation token
    pub token: CancellationToken,
}

impl TestEnv {
    /// Fresh bundle with an empty store and the clock at the epoch
    pub fn new() -> Self {
        Self::at(SystemTime::UNIX_EPOCH)
    }

    /// Fresh bundle with the clock at the given instant
    pub fn at(start: SystemTime) -> Self {
        TestEnv {
            store: Arc::new(MemoryStore::new()),
            logger: Arc::new(CapturedLogger::new()),
            clock: Arc::new(ManualClock::new(start)),
            cache: Arc::new(MemoryCache::new()),
            token: CancellationToken::new(),
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl HasDatabase for TestEnv {
    fn database(&self) -> &dyn Database {
        self.store.as_ref()
    }
}

impl HasLogger for TestEnv {
    fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }
}

impl HasClock for TestEnv {
    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl HasCancellation for TestEnv {
    fn cancellation(&self) -> &CancellationToken {
        &self.token
    }
}

impl HasCache for TestEnv {
    fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }
}

/// Assert a result is `Ok` and unwrap the value
///
/// ```
/// use millrace::assert_success;
///
/// let result: Result<i32, String> = Ok(42);
/// let value = assert_success!(result);
/// assert_eq!(value, 42);
/// ```
#[macro_export]
macro_rules! assert_success {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => panic!("expected success, got failure: {:?}", err),
        }
    };
}

/// Assert a result is `Err` and unwrap the error
///
/// ```
/// use millrace::assert_failure;
///
/// let result: Result<i32, String> = Err("nope".to_string());
/// let err = assert_failure!(result);
/// assert_eq!(err, "nope");
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("expected failure, got success: {:?}", value),
            Err(err) => err,
        }
    };
}
