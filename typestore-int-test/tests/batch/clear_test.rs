use typestore::common::Object;
use typestore::obj;
use typestore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_cleared_document_does_not_exist() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let ed = users.doc("ed");

            let mut batch = store.batch()?;
            batch.set(&ed, obj! { name: "Ed Tsech" })?;
            batch.commit()?;
            assert!(store.get(&ed)?.is_some());

            let mut batch = store.batch()?;
            batch.clear((&users, "ed"))?;
            batch.commit()?;
            assert!(store.get(&ed)?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_clear_of_missing_document_succeeds() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            batch.clear(&users.doc("nobody"))?;
            batch.commit()?;
            assert!(store.get(&users.doc("nobody"))?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_operations_apply_in_staging_order() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let a = users.doc("a");
            let b = users.doc("b");

            let mut batch = store.batch()?;
            batch.set(&a, obj! { v: 1 })?;
            batch.clear(&a)?;
            batch.clear(&b)?;
            batch.set(&b, obj! { v: 2 })?;
            batch.commit()?;

            assert!(store.get(&a)?.is_none());
            assert_eq!(store.get(&b)?.map(|d| d.into_data()), Some(obj! { v: 2 }));
            Ok(())
        },
        cleanup,
    )
}
