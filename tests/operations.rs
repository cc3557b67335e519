//! End-to-end behavior of the todo operations against the test bundle

use std::time::Duration;

use millrace::testing::TestEnv;
use millrace::{assert_failure, assert_success, ops, Clock, TodoError, TodoId};

#[tokio::test]
async fn listing_an_empty_store_succeeds_with_no_todos() {
    let env = TestEnv::new();
    let todos = assert_success!(ops::list().run(&env).await);
    assert!(todos.is_empty());
}

#[tokio::test]
async fn created_todo_is_retrievable_with_assigned_identity() {
    let env = TestEnv::new();

    let created = assert_success!(
        ops::create("Buy milk".to_string(), Some("Semi-skimmed".to_string()))
            .run(&env)
            .await
    );
    assert_eq!(created.id, TodoId(1));
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.description.as_deref(), Some("Semi-skimmed"));
    assert!(!created.is_completed);
    assert_eq!(created.completed_at, None);
    assert_eq!(created.created_at, env.clock.now());

    let fetched = assert_success!(ops::get(created.id).run(&env).await);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn invalid_create_reports_both_fields_and_persists_nothing() {
    let env = TestEnv::new();
    let oversize = "d".repeat(millrace::DESCRIPTION_MAX_LEN + 1);

    let err = assert_failure!(ops::create(String::new(), Some(oversize)).run(&env).await);
    match err {
        TodoError::Validation(errors) => {
            assert!(errors.len() >= 2);
            assert!(errors.iter().any(|e| e.field == "title"));
            assert!(errors.iter().any(|e| e.field == "description"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }

    assert!(env.store.is_empty());
    let todos = assert_success!(ops::list().run(&env).await);
    assert!(todos.is_empty());
}

#[tokio::test]
async fn list_orders_newest_first() {
    let env = TestEnv::new();

    assert_success!(ops::create("first".to_string(), None).run(&env).await);
    env.clock.advance(Duration::from_secs(60));
    assert_success!(ops::create("second".to_string(), None).run(&env).await);
    env.clock.advance(Duration::from_secs(60));
    assert_success!(ops::create("third".to_string(), None).run(&env).await);

    let todos = assert_success!(ops::list().run(&env).await);
    let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn same_instant_creations_list_later_insert_first() {
    let env = TestEnv::new();

    assert_success!(ops::create("earlier".to_string(), None).run(&env).await);
    assert_success!(ops::create("later".to_string(), None).run(&env).await);

    let todos = assert_success!(ops::list().run(&env).await);
    let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["later", "earlier"]);
}

#[tokio::test]
async fn missing_id_fails_identically_across_operations() {
    let env = TestEnv::new();
    let id = TodoId(99);
    let expected = TodoError::NotFound { id };

    assert_eq!(assert_failure!(ops::get(id).run(&env).await), expected);
    assert_eq!(
        assert_failure!(ops::update(id, "t".to_string(), None).run(&env).await),
        expected
    );
    assert_eq!(
        assert_failure!(ops::toggle_complete(id).run(&env).await),
        expected
    );
    assert_eq!(assert_failure!(ops::delete(id).run(&env).await), expected);
}

#[tokio::test]
async fn update_replaces_fields_but_preserves_completion() {
    let env = TestEnv::new();

    let created = assert_success!(ops::create("original".to_string(), None).run(&env).await);
    let completed = assert_success!(ops::toggle_complete(created.id).run(&env).await);
    assert!(completed.is_completed);

    let updated = assert_success!(
        ops::update(
            created.id,
            "renamed".to_string(),
            Some("now with notes".to_string())
        )
        .run(&env)
        .await
    );

    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.description.as_deref(), Some("now with notes"));
    assert!(updated.is_completed);
    assert_eq!(updated.completed_at, completed.completed_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_with_invalid_fields_leaves_the_stored_row_untouched() {
    let env = TestEnv::new();

    let created = assert_success!(ops::create("keep me".to_string(), None).run(&env).await);
    let err = assert_failure!(
        ops::update(created.id, String::new(), None).run(&env).await
    );
    assert!(matches!(err, TodoError::Validation(_)));

    let fetched = assert_success!(ops::get(created.id).run(&env).await);
    assert_eq!(fetched.title, "keep me");
}

#[tokio::test]
async fn toggle_stamps_and_clears_completed_at() {
    let env = TestEnv::new();

    let created = assert_success!(ops::create("task".to_string(), None).run(&env).await);

    env.clock.advance(Duration::from_secs(30));
    let done = assert_success!(ops::toggle_complete(created.id).run(&env).await);
    assert!(done.is_completed);
    assert_eq!(done.completed_at, Some(env.clock.now()));

    let reopened = assert_success!(ops::toggle_complete(created.id).run(&env).await);
    assert!(!reopened.is_completed);
    assert_eq!(reopened.completed_at, None);
}

#[tokio::test]
async fn delete_removes_the_row() {
    let env = TestEnv::new();

    let created = assert_success!(ops::create("gone soon".to_string(), None).run(&env).await);
    assert_success!(ops::delete(created.id).run(&env).await);

    assert!(env.store.is_empty());
    assert_eq!(
        assert_failure!(ops::get(created.id).run(&env).await),
        TodoError::NotFound { id: created.id }
    );
}

#[tokio::test]
async fn cancelled_token_surfaces_as_cancelled() {
    let env = TestEnv::new();
    let created = assert_success!(ops::create("pending".to_string(), None).run(&env).await);

    env.token.cancel();

    assert_eq!(
        assert_failure!(ops::get(created.id).run(&env).await),
        TodoError::Cancelled
    );
    assert_eq!(
        assert_failure!(ops::create("never".to_string(), None).run(&env).await),
        TodoError::Cancelled
    );
    // The write the cancelled create never made is not in the store
    assert_eq!(env.store.len(), 1);
}

#[tokio::test]
async fn prelude_glob_exposes_the_capability_traits() {
    use millrace::prelude::*;

    let env = TestEnv::new();
    assert_eq!(env.clock.now(), std::time::SystemTime::UNIX_EPOCH);
    env.logger.info("wired up");
    assert!(env.logger.contains("wired up"));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn double_toggle_restores_completion_state(title in "[a-zA-Z0-9 ]{1,40}") {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            runtime.block_on(async {
                let env = TestEnv::new();
                let created = ops::create(title, None).run(&env).await.unwrap();

                env.clock.advance(Duration::from_secs(1));
                ops::toggle_complete(created.id).run(&env).await.unwrap();
                env.clock.advance(Duration::from_secs(1));
                let back = ops::toggle_complete(created.id).run(&env).await.unwrap();

                prop_assert_eq!(back.is_completed, created.is_completed);
                prop_assert_eq!(back.completed_at, created.completed_at);
                Ok(())
            })?;
        }
    }
}
