use typestore::common::{Object, Value};
use typestore::errors::{ErrorKind, StoreError};
use typestore::obj;
use typestore::update::field;
use typestore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_commit_applies_all_staged_sets() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            let refs: Vec<_> = ["tati", "ed", "kai"]
                .iter()
                .map(|id| users.doc(id))
                .collect();
            for (i, reference) in refs.iter().enumerate() {
                batch.set(reference, obj! { index: (i as i64) })?;
            }
            assert_eq!(batch.len(), 3);
            batch.commit()?;

            for (i, reference) in refs.iter().enumerate() {
                let doc = store.get(reference)?.expect("document should exist");
                assert_eq!(doc.data().get("index"), Some(&Value::from(i as i64)));
            }
            assert_eq!(ctx.memory().document_count(users.path()), 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nothing_is_written_before_commit() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            batch.set(&users.doc("a"), obj! { v: 1 })?;
            assert!(store.get(&users.doc("a"))?.is_none());

            batch.commit()?;
            assert!(store.get(&users.doc("a"))?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_rejected_operation_rolls_back_whole_batch() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            batch.set(&users.doc("a"), obj! { v: 1 })?;
            batch.set(&users.doc("b"), obj! { v: 2 })?;
            batch.update(&users.doc("missing"), vec![field("v", 3)])?;

            let err = batch.commit().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CommitFailed);
            assert_eq!(err.cause().map(|c| c.kind().clone()), Some(ErrorKind::NotFound));

            assert!(store.get(&users.doc("a"))?.is_none());
            assert!(store.get(&users.doc("b"))?.is_none());
            assert_eq!(ctx.memory().document_count(users.path()), 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transport_failure_applies_nothing() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            ctx.memory().config().fail_next_commit(StoreError::new(
                "network unreachable",
                ErrorKind::TransportError,
            ));

            let mut batch = store.batch()?;
            batch.set(&users.doc("a"), obj! { v: 1 })?;
            batch.clear(&users.doc("b"))?;

            let err = batch.commit().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CommitFailed);
            let cause = err.cause().expect("commit failure carries the transport error");
            assert_eq!(cause.kind(), &ErrorKind::TransportError);
            assert_eq!(cause.message(), "network unreachable");
            assert!(store.get(&users.doc("a"))?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_independent_batches_commit_from_threads() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let path = ctx.collection_path("users");

            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let store = store.clone();
                    let path = path.clone();
                    std::thread::spawn(move || -> typestore::errors::StoreResult<()> {
                        let users = store.collection::<Object>(&path)?;
                        let mut batch = store.batch()?;
                        for i in 0..10 {
                            batch.set(&users.doc(&format!("{}-{}", t, i)), obj! { t: t, i: i })?;
                        }
                        batch.commit()
                    })
                })
                .collect();

            for handle in handles {
                handle.join().expect("writer thread panicked")?;
            }
            assert_eq!(ctx.memory().document_count(&path), 40);
            Ok(())
        },
        cleanup,
    )
}
