use typestore::collection::{Collection, RawRef, Ref};
use typestore::common::{Object, Value};
use typestore::obj;
use typestore_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_subcollection_documents_are_written() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let rooms = store.collection::<Object>(&ctx.collection_path("rooms"))?;
            let room = rooms.doc("general");
            let messages: Collection<Object> = Collection::subcollection(&room, "messages")?;
            assert_eq!(messages.path(), format!("{}/general/messages", rooms.path()));

            let mut batch = store.batch()?;
            batch.set(&room, obj! { name: "General" })?;
            let first = batch.set(&messages.new_doc(), obj! { text: "hi" })?;
            let second = batch.set(&messages.new_doc(), obj! { text: "hello" })?;
            batch.commit()?;

            assert_ne!(first.id(), second.id());
            assert_eq!(first.id().len(), 20);
            assert_eq!(ctx.memory().document_count(messages.path()), 2);
            assert_eq!(ctx.memory().document_count(rooms.path()), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_references_inside_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = store.collection::<Object>(&ctx.collection_path("users"))?;
            let posts = store.collection::<Object>(&ctx.collection_path("posts"))?;
            let author = users.doc("tati");

            let mut batch = store.batch()?;
            batch.set(&author, obj! { name: "Tati" })?;
            let post = batch.set(&posts.doc("p1"), obj! { title: "Hello", author: (&author) })?;
            batch.commit()?;

            let stored = store.get(post.reference())?.expect("post should exist");
            let raw = stored
                .data()
                .get("author")
                .and_then(Value::as_reference)
                .cloned()
                .expect("author should be a reference");
            assert_eq!(raw, RawRef::new(users.path(), "tati"));

            let typed: Ref<Object> = raw.typed();
            assert_eq!(typed, author);
            assert!(store.get(&typed)?.is_some());
            Ok(())
        },
        cleanup,
    )
}
