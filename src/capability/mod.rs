//! Capability set: narrow, swappable dependencies for effects
//!
//! Each capability is a small trait with one production implementation and
//! one test implementation; swapping them changes no calling code. Effects
//! declare what they need through the `Has*` accessor traits bounded on the
//! environment type - a bundle that cannot supply a required capability does
//! not type-check, so a misconfigured bundle is rejected before any domain
//! logic runs.
//!
//! Capabilities are resolved once per execution and are immutable for its
//! duration. Per-request capabilities (cancellation token) are constructed at
//! the execution boundary; process-wide ones (clock, store) live for the
//! process and must be individually safe for concurrent use.

pub mod cache;
pub mod cancel;
pub mod clock;
pub mod database;
pub mod logger;

pub use cache::{Cache, CacheValue, MemoryCache};
pub use cancel::CancellationToken;
pub use clock::{Clock, ManualClock, SystemClock};
pub use database::{Database, MemoryStore};
pub use logger::{CapturedLogger, LogLevel, Logger, TracingLogger};

/// Environment provides a database capability
pub trait HasDatabase {
    /// Access the database
    fn database(&self) -> &dyn Database;
}

/// Environment provides a logger capability
pub trait HasLogger {
    /// Access the logger
    fn logger(&self) -> &dyn Logger;
}

/// Environment provides a clock capability
pub trait HasClock {
    /// Access the clock
    fn clock(&self) -> &dyn Clock;
}

/// Environment provides the execution's cancellation token
pub trait HasCancellation {
    /// Access the cancellation token for this execution
    fn cancellation(&self) -> &CancellationToken;
}

/// Environment provides a cache capability
pub trait HasCache {
    /// Access the cache
    fn cache(&self) -> &dyn Cache;
}
