//! Database capability and the in-process store
//!
//! The trait is the boundary the domain operations see; the backing store is
//! opaque. Every call takes the execution's cancellation token so a cancelled
//! request stops at the next capability boundary instead of finishing silently.
//!
//! `begin`/`commit`/`rollback` are reentrant: implementations depth-count so
//! that only the outermost transactional wrapper in a composition opens (and
//! later resolves) a real transaction. Inner wrappers are no-ops.

use std::sync::Mutex;
use std::time::SystemTime;

use futures::future::BoxFuture;

use crate::capability::CancellationToken;
use crate::error::StoreError;
use crate::todo::{Todo, TodoId};

/// Async persistent store for todos
///
/// Methods return boxed futures so the trait stays object-safe without an
/// async-trait dependency. Implementations must be safe to share across
/// concurrent executions; each execution treats retrieved entities as local
/// copies.
pub trait Database: Send + Sync {
    /// Fetch every todo, in no particular order
    fn fetch_all<'a>(
        &'a self,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Todo>, StoreError>>;

    /// Fetch one todo by id
    fn fetch_by_id<'a>(
        &'a self,
        id: TodoId,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Option<Todo>, StoreError>>;

    /// Insert a todo, assigning its identity; returns the persisted entity
    ///
    /// The id on the way in is ignored.
    fn insert<'a>(
        &'a self,
        todo: Todo,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Todo, StoreError>>;

    /// Replace the stored todo with the same id
    fn update<'a>(
        &'a self,
        todo: Todo,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Todo, StoreError>>;

    /// Remove the todo with the given id
    fn remove<'a>(
        &'a self,
        id: TodoId,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Open a transaction, or join the one already open (depth-counted)
    fn begin(&self) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Commit the current transaction level; real only at the outermost level
    fn commit(&self) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Roll back the current transaction level; restores the pre-`begin`
    /// state only at the outermost level
    fn rollback(&self) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Synchronously discard the current transaction level, if one is open
    ///
    /// Called from drop glue when a transactional bracket is abandoned after
    /// `begin` without reaching `commit` or `rollback`, e.g. when a timeout
    /// races past it. Behaves like `rollback` but must not fail and must
    /// tolerate no transaction being open. Implementations whose teardown
    /// requires I/O should schedule it here rather than block.
    fn abandon(&self);
}

/// Transaction bookkeeping for [`MemoryStore`]
#[derive(Debug, Default)]
struct TxState {
    depth: usize,
    snapshot: Option<(Vec<Todo>, i64)>,
}

#[derive(Debug)]
struct StoreInner {
    rows: Vec<Todo>,
    next_id: i64,
    tx: TxState,
}

/// In-process, mutex-guarded store
///
/// Serves as the test implementation and as an in-process store for demos.
/// Transactions snapshot the whole table - fine at this scale, deliberately
/// single-threaded in semantics. Not a vehicle for validating concurrent
/// access behavior.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    /// Create an empty store; identities start at 1
    pub fn new() -> Self {
        MemoryStore {
            inner: Mutex::new(StoreInner {
                rows: Vec::new(),
                next_id: 1,
                tx: TxState::default(),
            }),
        }
    }

    /// Number of rows currently stored (test convenience)
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    /// Whether the store is empty (test convenience)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all rows, for assertions
    pub fn rows(&self) -> Vec<Todo> {
        self.lock().rows.clone()
    }

    /// Insert a row directly, bypassing the capability boundary
    ///
    /// Test seeding helper: assigns an identity like `insert` but lets the
    /// caller pick the creation timestamp.
    pub fn seed(&self, title: &str, created_at: SystemTime) -> Todo {
        let mut inner = self.lock();
        let todo = Todo {
            id: TodoId(inner.next_id),
            title: title.to_string(),
            description: None,
            is_completed: false,
            created_at,
            completed_at: None,
        };
        inner.next_id += 1;
        inner.rows.push(todo.clone());
        todo
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned store mutex means a panic mid-mutation; propagating the
        // panic is the only sound option here.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => panic!("memory store mutex poisoned: {}", poisoned),
        }
    }

    fn guard(cancel: &CancellationToken) -> Result<(), StoreError> {
        if cancel.is_cancelled() {
            Err(StoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Database for MemoryStore {
    fn fetch_all<'a>(
        &'a self,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Todo>, StoreError>> {
        Box::pin(async move {
            Self::guard(cancel)?;
            Ok(self.lock().rows.clone())
        })
    }

    fn fetch_by_id<'a>(
        &'a self,
        id: TodoId,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Option<Todo>, StoreError>> {
        Box::pin(async move {
            Self::guard(cancel)?;
            Ok(self.lock().rows.iter().find(|t| t.id == id).cloned())
        })
    }

    fn insert<'a>(
        &'a self,
        todo: Todo,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Todo, StoreError>> {
        Box::pin(async move {
            Self::guard(cancel)?;
            let mut inner = self.lock();
            let persisted = Todo {
                id: TodoId(inner.next_id),
                ..todo
            };
            inner.next_id += 1;
            inner.rows.push(persisted.clone());
            Ok(persisted)
        })
    }

    fn update<'a>(
        &'a self,
        todo: Todo,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Todo, StoreError>> {
        Box::pin(async move {
            Self::guard(cancel)?;
            let mut inner = self.lock();
            match inner.rows.iter_mut().find(|t| t.id == todo.id) {
                Some(row) => {
                    *row = todo.clone();
                    Ok(todo)
                }
                None => Err(StoreError::Unavailable(format!(
                    "no row with id {} to update",
                    todo.id
                ))),
            }
        })
    }

    fn remove<'a>(
        &'a self,
        id: TodoId,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            Self::guard(cancel)?;
            let mut inner = self.lock();
            let before = inner.rows.len();
            inner.rows.retain(|t| t.id != id);
            if inner.rows.len() == before {
                Err(StoreError::Unavailable(format!(
                    "no row with id {} to remove",
                    id
                )))
            } else {
                Ok(())
            }
        })
    }

    fn begin(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.tx.depth += 1;
            if inner.tx.depth == 1 {
                inner.tx.snapshot = Some((inner.rows.clone(), inner.next_id));
            }
            Ok(())
        })
    }

    fn commit(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let mut inner = self.lock();
            if inner.tx.depth == 0 {
                return Err(StoreError::Unavailable(
                    "commit without open transaction".to_string(),
                ));
            }
            inner.tx.depth -= 1;
            if inner.tx.depth == 0 {
                inner.tx.snapshot = None;
            }
            Ok(())
        })
    }

    fn rollback(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let mut inner = self.lock();
            if inner.tx.depth == 0 {
                return Err(StoreError::Unavailable(
                    "rollback without open transaction".to_string(),
                ));
            }
            inner.tx.depth -= 1;
            if inner.tx.depth == 0 {
                if let Some((rows, next_id)) = inner.tx.snapshot.take() {
                    inner.rows = rows;
                    inner.next_id = next_id;
                }
            }
            Ok(())
        })
    }

    fn abandon(&self) {
        let mut inner = self.lock();
        if inner.tx.depth == 0 {
            return;
        }
        inner.tx.depth -= 1;
        if inner.tx.depth == 0 {
            if let Some((rows, next_id)) = inner.tx.snapshot.take() {
                inner.rows = rows;
                inner.next_id = next_id;
            }
        }
    }
}
