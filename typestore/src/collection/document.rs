use crate::collection::Ref;

/// A materialized document: a reference paired with its data.
///
/// A `Document` is never updated in place. A write that changes the stored
/// data produces a new `Document`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<T> {
    reference: Ref<T>,
    data: T,
}

impl<T> Document<T> {
    pub fn new(reference: Ref<T>, data: T) -> Self {
        Document { reference, data }
    }

    pub fn reference(&self) -> &Ref<T> {
        &self.reference
    }

    pub fn id(&self) -> &str {
        self.reference.id()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn into_parts(self) -> (Ref<T>, T) {
        (self.reference, self.data)
    }
}
