use typestore::batch::SetOptions;
use typestore::common::{delete_field, increment, server_timestamp, Object, Value};
use typestore::errors::ErrorKind;
use typestore::obj;
use typestore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_merge_set_keeps_unmentioned_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let tati = users.doc("tati");

            let mut batch = store.batch()?;
            batch.set(&tati, obj! { name: "Tati", foo: true, age: 31 })?;
            batch.commit()?;

            let mut batch = store.batch()?;
            batch.set_with_options(
                &tati,
                obj! { name: "Tati Shepeleva", foo: false },
                SetOptions::merge(),
            )?;
            batch.commit()?;

            let stored = store.get(&tati)?.expect("document should exist");
            assert_eq!(
                stored.data(),
                &obj! { name: "Tati Shepeleva", foo: false, age: 31 }
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_merge_set_overwrites_mentioned_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let tati = users.doc("tati");

            let mut batch = store.batch()?;
            batch.set(&tati, obj! { name: "Tati", foo: true })?;
            batch.commit()?;

            let mut batch = store.batch()?;
            batch.set_with_options(
                &tati,
                obj! { name: "Tati Shepeleva", foo: false },
                SetOptions { merge: true },
            )?;
            batch.commit()?;

            let stored = store.get(&tati)?.expect("document should exist");
            assert_eq!(stored.data(), &obj! { name: "Tati Shepeleva", foo: false });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_replace_set_drops_prior_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let ed = users.doc("ed");

            let mut batch = store.batch()?;
            batch.set(&ed, obj! { name: "Ed", city: "Tallinn", meta: { admin: true } })?;
            batch.commit()?;

            let mut batch = store.batch()?;
            batch.set(&ed, obj! { name: "Ed Tsech" })?;
            batch.commit()?;

            let stored = store.get(&ed)?.expect("document should exist");
            assert_eq!(stored.data(), &obj! { name: "Ed Tsech" });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_merge_set_is_deep() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let ed = users.doc("ed");

            let mut batch = store.batch()?;
            batch.set(&ed, obj! { meta: { createdBy: "ed", tags: ["a"] } })?;
            batch.set_with_options(&ed, obj! { meta: { updatedBy: "tati" } }, SetOptions::merge())?;
            batch.commit()?;

            let stored = store.get(&ed)?.expect("document should exist");
            assert_eq!(
                stored.data(),
                &obj! { meta: { createdBy: "ed", tags: ["a"], updatedBy: "tati" } }
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_set_returns_input_as_echo() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            batch.set(&users.doc("tati"), obj! { name: "Tati", foo: true })?;
            batch.commit()?;

            let input = obj! { name: "Tati Shepeleva", visits: (increment(1)) };
            let mut batch = store.batch()?;
            let doc = batch.set_with_options((&users, "tati"), input.clone(), SetOptions::merge())?;
            assert_eq!(doc.reference(), &users.doc("tati"));
            assert_eq!(doc.data(), &input);
            batch.commit()?;

            // the stored document is the merged result, not the echo
            let stored = store.get(doc.reference())?.expect("document should exist");
            assert_eq!(stored.data().get("foo"), Some(&Value::from(true)));
            assert_eq!(stored.data().get("visits"), Some(&Value::from(1)));
            assert_ne!(stored.data(), doc.data());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sentinels_in_set() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let tati = users.doc("tati");

            let mut batch = store.batch()?;
            batch.set(&tati, obj! { hits: 2, gone: "soon" })?;
            batch.commit()?;

            let mut batch = store.batch()?;
            batch.set_with_options(
                &tati,
                obj! { hits: (increment(3)), gone: (delete_field()), at: (server_timestamp()) },
                SetOptions::merge(),
            )?;
            batch.commit()?;

            let stored = store.get(&tati)?.expect("document should exist");
            let data = stored.data();
            assert_eq!(data.get("hits"), Some(&Value::from(5)));
            assert!(!data.contains_key("gone"));
            assert!(data.get("at").and_then(Value::as_timestamp).is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_field_rejected_in_replace_set() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            let err = batch
                .set(&users.doc("tati"), obj! { gone: (delete_field()) })
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            assert!(batch.is_empty());
            Ok(())
        },
        cleanup,
    )
}
