//! Decorator behavior composed over the test bundle

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use millrace::decorator::{with_cache, with_logging, with_metrics, with_timeout, with_transaction};
use millrace::testing::TestEnv;
use millrace::{assert_failure, assert_success, ops, Effect, TodoError};

#[tokio::test]
async fn failed_effect_never_invokes_the_continuation() {
    let touched = Arc::new(AtomicUsize::new(0));
    let probe = touched.clone();

    let effect = Effect::<i32, TodoError, TestEnv>::fail(TodoError::Cancelled)
        .and_then(move |n| {
            probe.fetch_add(1, Ordering::SeqCst);
            Effect::pure(n + 1)
        })
        .map(|n| n * 2);

    let env = TestEnv::new();
    assert_eq!(
        assert_failure!(effect.run(&env).await),
        TodoError::Cancelled
    );
    assert_eq!(touched.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cached_list_runs_its_side_effects_once_within_ttl() {
    let env = TestEnv::new();
    assert_success!(ops::create("cached".to_string(), None).run(&env).await);
    let log_lines_before_reads = env.logger.messages().len();

    let first = with_cache("todos:list", Duration::from_secs(60), ops::list());
    let todos = assert_success!(first.run(&env).await);
    assert_eq!(todos.len(), 1);
    let log_lines_after_first = env.logger.messages().len();
    assert!(log_lines_after_first > log_lines_before_reads);

    // Second read hits the cache: the inner operation, and its logging, never run
    let second = with_cache("todos:list", Duration::from_secs(60), ops::list());
    let cached = assert_success!(second.run(&env).await);
    assert_eq!(cached, todos);
    assert_eq!(env.logger.messages().len(), log_lines_after_first);
}

#[tokio::test]
async fn cached_read_goes_stale_after_ttl() {
    let env = TestEnv::new();

    let first = with_cache("todos:list", Duration::from_secs(60), ops::list());
    assert_eq!(assert_success!(first.run(&env).await).len(), 0);

    assert_success!(ops::create("new arrival".to_string(), None).run(&env).await);

    // Within the ttl the stale empty list is still served
    let stale = with_cache("todos:list", Duration::from_secs(60), ops::list());
    assert_eq!(assert_success!(stale.run(&env).await).len(), 0);

    env.clock.advance(Duration::from_secs(61));
    let fresh = with_cache("todos:list", Duration::from_secs(60), ops::list());
    assert_eq!(assert_success!(fresh.run(&env).await).len(), 1);
}

#[tokio::test]
async fn transaction_rollback_leaves_the_store_unchanged() {
    let env = TestEnv::new();
    assert_success!(ops::create("survivor".to_string(), None).run(&env).await);
    let before = env.store.rows();

    let failing = with_transaction(
        ops::create("doomed".to_string(), None)
            .and_then(|_| Effect::<(), TodoError, TestEnv>::fail(TodoError::fault("mid-flight"))),
    );

    let err = assert_failure!(failing.run(&env).await);
    // The inner failure comes back verbatim
    assert_eq!(err, TodoError::fault("mid-flight"));
    assert_eq!(env.store.rows(), before);
}

#[tokio::test]
async fn metrics_logs_duration_on_failure() {
    let env = TestEnv::new();

    let effect = with_metrics(
        "doomed_read",
        Effect::<i32, TodoError, TestEnv>::fail(TodoError::fault("backend down")),
    );

    assert_failure!(effect.run(&env).await);
    assert!(env.logger.contains("doomed_read completed in 0ms (err)"));
}

#[tokio::test]
async fn logging_preserves_the_failure_value() {
    let env = TestEnv::new();

    let effect = with_logging(
        "doomed",
        |_: &i32| String::new(),
        Effect::<i32, TodoError, TestEnv>::fail(TodoError::fault("backend down")),
    );

    let err = assert_failure!(effect.run(&env).await);
    assert_eq!(err, TodoError::fault("backend down"));
    assert!(env.logger.contains("doomed started"));
    assert!(env.logger.contains("doomed failed"));
}

#[tokio::test]
async fn timeout_yields_the_deadline_error() {
    let env = TestEnv::new();

    let effect = with_timeout(
        Duration::from_millis(20),
        || TodoError::DeadlineExceeded,
        Effect::<i32, TodoError, TestEnv>::from_async(|_| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(1)
        }),
    );

    assert_eq!(
        assert_failure!(effect.run(&env).await),
        TodoError::DeadlineExceeded
    );
}

#[tokio::test]
async fn timeout_leaves_a_fast_operation_untouched() {
    let env = TestEnv::new();

    let effect = with_timeout(
        Duration::from_secs(10),
        || TodoError::DeadlineExceeded,
        ops::create("quick".to_string(), None),
    );

    let created = assert_success!(effect.run(&env).await);
    assert_eq!(created.title, "quick");
}

#[tokio::test]
async fn nested_transactions_commit_only_at_the_outermost_layer() {
    let env = TestEnv::new();

    // create() already wraps its insert in a transaction; wrapping it again
    // must not double-open or double-commit
    let effect = with_transaction(ops::create("nested".to_string(), None));
    assert_success!(effect.run(&env).await);
    assert_eq!(env.store.len(), 1);
}

#[tokio::test]
async fn outer_rollback_discards_inner_committed_work() {
    let env = TestEnv::new();

    let effect = with_transaction(
        ops::create("inner".to_string(), None)
            .and_then(|_| Effect::<(), TodoError, TestEnv>::fail(TodoError::fault("after inner"))),
    );

    assert_failure!(effect.run(&env).await);
    // The inner create's own transaction joined the outer one, so its write
    // rolled back with it
    assert!(env.store.is_empty());
}

#[tokio::test]
async fn timeout_around_a_transaction_discards_the_partial_write() {
    let env = TestEnv::new();

    let effect = with_timeout(
        Duration::from_millis(20),
        || TodoError::DeadlineExceeded,
        with_transaction(ops::create("doomed".to_string(), None).and_then(|todo| {
            Effect::from_async(move |_: &TestEnv| async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(todo)
            })
        })),
    );

    assert_eq!(
        assert_failure!(effect.run(&env).await),
        TodoError::DeadlineExceeded
    );
    assert!(env.store.is_empty());
}

#[tokio::test]
async fn expired_transaction_does_not_poison_later_ones() {
    let env = TestEnv::new();

    let expired = with_timeout(
        Duration::from_millis(20),
        || TodoError::DeadlineExceeded,
        with_transaction(ops::create("doomed".to_string(), None).and_then(|todo| {
            Effect::from_async(move |_: &TestEnv| async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(todo)
            })
        })),
    );
    assert_failure!(expired.run(&env).await);

    // A later transactional failure still rolls back from a clean slate
    let later = with_transaction(
        ops::create("also doomed".to_string(), None)
            .and_then(|_| Effect::<(), TodoError, TestEnv>::fail(TodoError::fault("late"))),
    );
    assert_failure!(later.run(&env).await);
    assert!(env.store.is_empty());

    // And a later success commits normally
    let kept = assert_success!(ops::create("kept".to_string(), None).run(&env).await);
    assert_eq!(env.store.rows(), vec![kept]);
}

#[tokio::test]
async fn cancellation_passes_through_the_full_decorator_stack() {
    let env = TestEnv::new();
    env.token.cancel();

    let effect = with_logging(
        "stacked",
        |_: &Vec<millrace::Todo>| "listed".to_string(),
        with_metrics(
            "stacked",
            with_cache("stacked:list", Duration::from_secs(60), ops::list()),
        ),
    );

    assert_eq!(
        assert_failure!(effect.run(&env).await),
        TodoError::Cancelled
    );
    // Nothing was cached for the cancelled execution
    assert!(env.cache.is_empty());
}
