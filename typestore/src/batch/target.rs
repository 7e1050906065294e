use crate::collection::{Collection, Ref};
use crate::errors::StoreResult;

/// The document a batch operation writes to.
///
/// A target is either a reference or a collection plus a document id. Both
/// forms resolve to the same [`Ref`].
///
/// # Examples
///
/// ```rust
/// use typestore::batch::Target;
/// use typestore::collection::Collection;
/// use typestore::common::Object;
///
/// let users: Collection<Object> = Collection::new("users").unwrap();
/// let by_ref = Target::from(users.doc("tati")).resolve().unwrap();
/// let by_id = Target::from((&users, "tati")).resolve().unwrap();
/// assert_eq!(by_ref, by_id);
/// ```
pub enum Target<'a, T> {
    Ref(Ref<T>),
    Located(&'a Collection<T>, String),
}

impl<T> Target<'_, T> {
    /// Resolves the target to a reference.
    ///
    /// Returns a `ResolutionError` when the collection path of the
    /// reference is malformed. Document ids are left to the transport.
    pub fn resolve(self) -> StoreResult<Ref<T>> {
        let reference = match self {
            Target::Ref(reference) => reference,
            Target::Located(collection, id) => collection.doc(&id),
        };
        reference.validate()?;
        Ok(reference)
    }
}

impl<T> From<Ref<T>> for Target<'_, T> {
    fn from(reference: Ref<T>) -> Self {
        Target::Ref(reference)
    }
}

impl<T> From<&Ref<T>> for Target<'_, T> {
    fn from(reference: &Ref<T>) -> Self {
        Target::Ref(reference.clone())
    }
}

impl<'a, T> From<(&'a Collection<T>, &str)> for Target<'a, T> {
    fn from((collection, id): (&'a Collection<T>, &str)) -> Self {
        Target::Located(collection, id.to_string())
    }
}

impl<'a, T> From<(&'a Collection<T>, String)> for Target<'a, T> {
    fn from((collection, id): (&'a Collection<T>, String)) -> Self {
        Target::Located(collection, id)
    }
}

/// Conversion into a [`Target`], implemented for every accepted target form.
pub trait IntoTarget<'a> {
    type Model;

    fn into_target(self) -> Target<'a, Self::Model>;
}

impl<'a, T> IntoTarget<'a> for Target<'a, T> {
    type Model = T;

    fn into_target(self) -> Target<'a, T> {
        self
    }
}

impl<'a, T> IntoTarget<'a> for Ref<T> {
    type Model = T;

    fn into_target(self) -> Target<'a, T> {
        Target::Ref(self)
    }
}

impl<'a, T> IntoTarget<'a> for &Ref<T> {
    type Model = T;

    fn into_target(self) -> Target<'a, T> {
        Target::Ref(self.clone())
    }
}

impl<'a, T> IntoTarget<'a> for (&'a Collection<T>, &str) {
    type Model = T;

    fn into_target(self) -> Target<'a, T> {
        Target::Located(self.0, self.1.to_string())
    }
}

impl<'a, T> IntoTarget<'a> for (&'a Collection<T>, String) {
    type Model = T;

    fn into_target(self) -> Target<'a, T> {
        Target::Located(self.0, self.1)
    }
}
