use chrono::{TimeZone, Utc};
use typestore::common::{array_remove, array_union, delete_field, increment, Object, Value};
use typestore::errors::ErrorKind;
use typestore::obj;
use typestore::update::{field, FieldPath, UpdateData};
use typestore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_object_and_list_forms_are_equivalent() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let counters = store.collection::<Object>(&ctx.collection_path("counters"))?;
            let a = counters.doc("a");
            let b = counters.doc("b");

            let mut batch = store.batch()?;
            batch.set(&a, obj! { count: 1, label: "x" })?;
            batch.set(&b, obj! { count: 1, label: "x" })?;
            batch.commit()?;

            let mut batch = store.batch()?;
            batch.update(&a, obj! { count: 5 })?;
            batch.update(&b, vec![field("count", 5)])?;
            batch.commit()?;

            let stored_a = store.get(&a)?.expect("a should exist");
            let stored_b = store.get(&b)?.expect("b should exist");
            assert_eq!(stored_a.data(), stored_b.data());
            assert_eq!(stored_a.data(), &obj! { count: 5, label: "x" });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_dotted_update_touches_only_nested_field() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let posts = store.collection::<Object>(&ctx.collection_path("posts"))?;
            let post = posts.doc("p1");
            let created = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
            let updated = Utc.timestamp_opt(1_700_000_000, 250_000_000).unwrap();

            let mut batch = store.batch()?;
            batch.set(&post, obj! { title: "Hello", meta: { createdAt: created, updatedAt: created } })?;
            batch.commit()?;

            let mut batch = store.batch()?;
            batch.update(&post, vec![field(["meta", "updatedAt"], updated)])?;
            batch.commit()?;

            let stored = store.get(&post)?.expect("post should exist");
            assert_eq!(
                stored.data(),
                &obj! { title: "Hello", meta: { createdAt: created, updatedAt: updated } }
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_single_dotted_key_targets_nested_field() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let posts = store.collection::<Object>(&ctx.collection_path("posts"))?;
            let post = posts.doc("p1");

            let mut batch = store.batch()?;
            batch.set(&post, obj! { meta: { views: 1, likes: 2 } })?;
            batch.update(&post, vec![field("meta.views", 10)])?;
            batch.commit()?;

            let stored = store.get(&post)?.expect("post should exist");
            assert_eq!(stored.data(), &obj! { meta: { views: 10, likes: 2 } });
            assert!(!stored.data().contains_key("meta.views"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_object_form_replaces_top_level_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let posts = store.collection::<Object>(&ctx.collection_path("posts"))?;
            let post = posts.doc("p1");

            let mut batch = store.batch()?;
            batch.set(&post, obj! { title: "Hello", meta: { views: 1, likes: 2 } })?;
            batch.update(&post, obj! { meta: { views: 10 } })?;
            batch.commit()?;

            let stored = store.get(&post)?.expect("post should exist");
            assert_eq!(stored.data(), &obj! { title: "Hello", meta: { views: 10 } });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_list_form_last_entry_wins() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let tati = users.doc("tati");

            let mut batch = store.batch()?;
            batch.set(&tati, obj! { name: "Tati" })?;
            batch.update(
                &tati,
                vec![
                    field(["profile", "city"], "Riga"),
                    field("profile.city", "Tallinn"),
                ],
            )?;
            batch.commit()?;

            let stored = store.get(&tati)?.expect("tati should exist");
            assert_eq!(
                stored.data().get_path(&["profile", "city"]),
                Some(&Value::from("Tallinn"))
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_with_sentinels() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let tati = users.doc("tati");

            let mut batch = store.batch()?;
            batch.set(&tati, obj! { score: 1.5, tags: ["a", "b"], meta: { stale: true, keep: 1 } })?;
            batch.update(
                &tati,
                vec![
                    field("score", increment(1)),
                    field("tags", array_union(vec!["b", "c"])),
                    field(FieldPath::new(["meta", "stale"]), delete_field()),
                ],
            )?;
            batch.update(&tati, vec![field("tags", array_remove(vec!["a"]))])?;
            batch.commit()?;

            let stored = store.get(&tati)?.expect("tati should exist");
            assert_eq!(
                stored.data(),
                &obj! { score: 2.5, tags: ["b", "c"], meta: { keep: 1 } }
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_update_is_still_staged() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            batch.update(&users.doc("ghost"), UpdateData::Fields(vec![]))?;
            assert_eq!(batch.len(), 1);

            // the staged write reaches the transport, which rejects the missing document
            let err = batch.commit().unwrap_err();
            assert_eq!(err.cause().map(|c| c.kind().clone()), Some(ErrorKind::NotFound));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_update_of_existing_document_keeps_it() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let tati = users.doc("tati");

            let mut batch = store.batch()?;
            batch.set(&tati, obj! { name: "Tati" })?;
            batch.update(&tati, obj! {})?;
            batch.commit()?;

            let stored = store.get(&tati)?.expect("tati should exist");
            assert_eq!(stored.data(), &obj! { name: "Tati" });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_field_path_is_rejected_at_staging() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;

            let mut batch = store.batch()?;
            let err = batch
                .update(&users.doc("tati"), vec![field("meta..updatedAt", 1)])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            assert!(batch.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nested_delete_in_update_is_rejected() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let tati = users.doc("tati");

            let mut batch = store.batch()?;
            batch.set(&tati, obj! { meta: { keep: 1, gone: 2 } })?;
            batch.commit()?;

            let mut batch = store.batch()?;
            let err = batch
                .update(&tati, obj! { meta: { gone: (delete_field()) } })
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            let err = batch
                .update(&tati, vec![field("meta", obj! { gone: (delete_field()) })])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            assert!(batch.is_empty());

            batch.update(&tati, vec![field(["meta", "gone"], delete_field())])?;
            batch.commit()?;

            let stored = store.get(&tati)?.expect("tati should exist");
            assert_eq!(stored.data(), &obj! { meta: { keep: 1 } });
            Ok(())
        },
        cleanup,
    )
}
