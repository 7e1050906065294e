use typestore::batch::{BatchState, SetOptions, WriteBatch};
use typestore::collection::{Collection, RawRef, Ref};
use typestore::common::{increment, Object};
use typestore::errors::{ErrorKind, StoreError, StoreResult};
use typestore::obj;
use typestore::transport::memory::InMemoryTransportConfig;
use typestore_int_test::test_util::{
    cleanup, create_limited_test_context, create_test_context, create_test_context_with, run_test,
};

#[test]
fn test_batch_states() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            assert_eq!(batch.state(), BatchState::Open);
            batch.set(&users.doc("a"), obj! { v: 1 })?;
            batch.commit()?;
            assert_eq!(batch.state(), BatchState::Committed);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_committed_batch_cannot_be_reused() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            batch.set(&users.doc("a"), obj! { v: 1 })?;
            batch.commit()?;

            let err = batch.set(&users.doc("b"), obj! { v: 2 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            let err = batch.update(&users.doc("a"), obj! { v: 3 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            let err = batch.clear(&users.doc("a")).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            let err = batch.commit().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

            assert!(store.get(&users.doc("b"))?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failed_batch_cannot_be_retried() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            ctx.memory().config().fail_next_commit(StoreError::new(
                "deadline exceeded",
                ErrorKind::TransportError,
            ));

            let mut batch = store.batch()?;
            batch.set(&users.doc("a"), obj! { v: 1 })?;
            assert!(batch.commit().is_err());
            assert_eq!(batch.state(), BatchState::Failed);
            assert_eq!(batch.commit().unwrap_err().kind(), &ErrorKind::InvalidOperation);

            // a fresh batch goes through once the fault is consumed
            let mut batch = store.batch()?;
            batch.set(&users.doc("a"), obj! { v: 1 })?;
            batch.commit()?;
            assert!(store.get(&users.doc("a"))?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_read_only_transport_rejects_commit() {
    run_test(
        || {
            let config = InMemoryTransportConfig::new();
            config.set_read_only(true);
            create_test_context_with(config, None)
        },
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            batch.set(&users.doc("a"), obj! { v: 1 })?;
            let err = batch.commit().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CommitFailed);
            assert_eq!(
                err.cause().map(|c| c.kind().clone()),
                Some(ErrorKind::PermissionDenied)
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_batch_operation_limit() {
    run_test(
        || create_limited_test_context(3),
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            for id in ["a", "b", "c"] {
                batch.set(&users.doc(id), obj! { v: 1 })?;
            }
            let err = batch.set(&users.doc("d"), obj! { v: 1 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            assert_eq!(batch.len(), 3);

            batch.commit()?;
            assert_eq!(ctx.memory().document_count(users.path()), 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_bad_targets_fail_staging_only() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            let bad_collection: Ref<Object> = RawRef::new("users/u1", "x").typed();
            let err = batch.set(&bad_collection, obj! {}).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ResolutionError);

            let err = batch.clear((&users, "a/b")).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidId);

            let err = batch.update(&users.doc(""), obj! { v: 1 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidId);

            assert!(batch.is_empty());
            batch.set(&users.doc("ok"), obj! { v: 1 })?;
            batch.commit()?;
            assert!(store.get(&users.doc("ok"))?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_reference_and_located_targets_agree() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users: Collection<Object> = store.collection(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            let by_ref = batch.set(&users.doc("tati"), obj! { v: 1 })?;
            let by_location = batch.set((&users, "tati".to_string()), obj! { v: 2 })?;
            assert_eq!(by_ref.reference(), by_location.reference());
            batch.commit()?;

            let stored = store.get(by_ref.reference())?.expect("tati should exist");
            assert_eq!(stored.data(), &obj! { v: 2 });
            Ok(())
        },
        cleanup,
    )
}

fn stage_located(batch: &mut WriteBatch, users: &Collection<Object>, id: &str) -> StoreResult<()> {
    batch.set((users, id), obj! { name: "Tati", visits: 1 })?;
    batch.set_with_options((users, id), obj! { foo: true }, SetOptions::merge())?;
    batch.update((users, id), obj! { visits: (increment(2)) })?;
    batch.clear((users, format!("{}-old", id)))?;
    Ok(())
}

#[test]
fn test_located_targets_stage_every_operation() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users: Collection<Object> = store.collection(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            batch.set((&users, "tati-old"), obj! { v: 1 })?;
            batch.commit()?;

            let mut batch = store.batch()?;
            stage_located(&mut batch, &users, "tati")?;
            assert_eq!(batch.len(), 4);
            batch.commit()?;

            let stored = store.get(&users.doc("tati"))?.expect("tati should exist");
            assert_eq!(stored.data(), &obj! { name: "Tati", visits: 3, foo: true });
            assert!(store.get(&users.doc("tati-old"))?.is_none());
            assert_eq!(ctx.memory().document_count(users.path()), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_closed_store_refuses_new_batches() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            store.close()?;
            let err = store.batch().err().expect("closed store should refuse batches");
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        cleanup,
    )
}
