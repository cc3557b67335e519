//! Todo operations built from effect primitives and decorators
//!
//! Each operation is an inert [`Effect`] over whatever capability bundle the
//! host supplies; nothing here names a concrete store, logger, or clock. Reads
//! carry logging and metrics; mutations additionally run inside a store
//! transaction. The decorators stack innermost to outermost as transaction,
//! metrics, logging.
//!
//! # Examples
//!
//! ```
//! use millrace::ops;
//! use millrace::testing::TestEnv;
//!
//! # tokio_test::block_on(async {
//! let env = TestEnv::new();
//!
//! let created = ops::create("Buy milk".to_string(), None)
//!     .run(&env)
//!     .await
//!     .unwrap();
//! let fetched = ops::get(created.id).run(&env).await.unwrap();
//! assert_eq!(fetched.title, "Buy milk");
//! # });
//! ```

use crate::capability::{HasCancellation, HasClock, HasDatabase, HasLogger};
use crate::decorator::{with_logging, with_metrics, with_transaction};
use crate::error::TodoError;
use crate::todo::{validate_draft, Todo, TodoId};
use crate::Effect;

/// Fetch a todo that must exist, converting absence to `NotFound`
fn fetch_existing<Env>(id: TodoId) -> Effect<Todo, TodoError, Env>
where
    Env: HasDatabase + HasCancellation + Sync + 'static,
{
    Effect::from_env_async(move |env: &Env| {
        Box::pin(async move {
            let found = env
                .database()
                .fetch_by_id(id, env.cancellation())
                .await
                .map_err(TodoError::from)?;
            found.ok_or(TodoError::NotFound { id })
        })
    })
}

/// List every todo, newest first
///
/// Ordering is by `created_at` descending, ties broken by id descending so
/// same-instant creations still list the later insert first.
pub fn list<Env>() -> Effect<Vec<Todo>, TodoError, Env>
where
    Env: HasDatabase + HasLogger + HasClock + HasCancellation + Sync + 'static,
{
    let inner = Effect::from_env_async(|env: &Env| {
        Box::pin(async move {
            let mut todos = env
                .database()
                .fetch_all(env.cancellation())
                .await
                .map_err(TodoError::from)?;
            todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(todos)
        })
    });
    with_logging(
        "list_todos",
        |todos: &Vec<Todo>| format!("listed {} todo(s)", todos.len()),
        with_metrics("list_todos", inner),
    )
}

/// Fetch one todo by id
///
/// Fails with `NotFound` when no todo has the id.
pub fn get<Env>(id: TodoId) -> Effect<Todo, TodoError, Env>
where
    Env: HasDatabase + HasLogger + HasClock + HasCancellation + Sync + 'static,
{
    with_logging(
        "get_todo",
        move |todo: &Todo| format!("fetched todo {}", todo.id),
        with_metrics("get_todo", fetch_existing(id)),
    )
}

/// Create a todo from a title and optional description
///
/// Both fields are validated up front and violations accumulate, so a bad
/// title and a bad description are reported together. On success the entity
/// is persisted with `created_at` from the clock capability and the
/// store-assigned id is returned. A validation failure persists nothing.
pub fn create<Env>(title: String, description: Option<String>) -> Effect<Todo, TodoError, Env>
where
    Env: HasDatabase + HasLogger + HasClock + HasCancellation + Sync + 'static,
{
    let validated = validate_draft(&title, description.as_deref()).map_err(TodoError::from);
    let inner = Effect::from_validation(validated).and_then(|(title, description)| {
        Effect::from_env_async(move |env: &Env| {
            Box::pin(async move {
                let draft = Todo {
                    id: TodoId(0),
                    title,
                    description,
                    is_completed: false,
                    created_at: env.clock().now(),
                    completed_at: None,
                };
                env.database()
                    .insert(draft, env.cancellation())
                    .await
                    .map_err(TodoError::from)
            })
        })
    });
    with_logging(
        "create_todo",
        |todo: &Todo| format!("created todo {}", todo.id),
        with_metrics("create_todo", with_transaction(inner)),
    )
}

/// Replace a todo's title and description
///
/// Propagates `NotFound` for a missing id, re-validates both fields with
/// accumulation, and preserves the completion state and creation timestamp.
pub fn update<Env>(
    id: TodoId,
    title: String,
    description: Option<String>,
) -> Effect<Todo, TodoError, Env>
where
    Env: HasDatabase + HasLogger + HasClock + HasCancellation + Sync + 'static,
{
    let inner = fetch_existing(id).and_then(move |existing| {
        let validated = validate_draft(&title, description.as_deref()).map_err(TodoError::from);
        Effect::from_validation(validated).and_then(move |(title, description)| {
            Effect::from_env_async(move |env: &Env| {
                Box::pin(async move {
                    let updated = Todo {
                        title,
                        description,
                        ..existing
                    };
                    env.database()
                        .update(updated, env.cancellation())
                        .await
                        .map_err(TodoError::from)
                })
            })
        })
    });
    with_logging(
        "update_todo",
        |todo: &Todo| format!("updated todo {}", todo.id),
        with_metrics("update_todo", with_transaction(inner)),
    )
}

/// Flip a todo's completion flag
///
/// Completion stamps `completed_at` from the clock; un-completion clears it.
/// Toggling twice restores the original completion state.
pub fn toggle_complete<Env>(id: TodoId) -> Effect<Todo, TodoError, Env>
where
    Env: HasDatabase + HasLogger + HasClock + HasCancellation + Sync + 'static,
{
    let inner = fetch_existing(id).and_then(move |existing| {
        Effect::from_env_async(move |env: &Env| {
            Box::pin(async move {
                let now_completed = !existing.is_completed;
                let toggled = Todo {
                    is_completed: now_completed,
                    completed_at: now_completed.then(|| env.clock().now()),
                    ..existing
                };
                env.database()
                    .update(toggled, env.cancellation())
                    .await
                    .map_err(TodoError::from)
            })
        })
    });
    with_logging(
        "toggle_todo",
        |todo: &Todo| {
            format!(
                "todo {} is now {}",
                todo.id,
                if todo.is_completed { "done" } else { "open" }
            )
        },
        with_metrics("toggle_todo", with_transaction(inner)),
    )
}

/// Delete a todo by id
///
/// Propagates `NotFound` for a missing id; resolves to `()` on success.
pub fn delete<Env>(id: TodoId) -> Effect<(), TodoError, Env>
where
    Env: HasDatabase + HasLogger + HasClock + HasCancellation + Sync + 'static,
{
    let inner = fetch_existing(id).and_then(move |existing| {
        Effect::from_env_async(move |env: &Env| {
            Box::pin(async move {
                env.database()
                    .remove(existing.id, env.cancellation())
                    .await
                    .map_err(TodoError::from)
            })
        })
    });
    with_logging(
        "delete_todo",
        move |_| format!("deleted todo {}", id),
        with_metrics("delete_todo", with_transaction(inner)),
    )
}
