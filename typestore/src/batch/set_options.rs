use crate::transport::SetMode;

/// Options for [`WriteBatch::set_with_options`](crate::batch::WriteBatch::set_with_options).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetOptions {
    /// Keep the stored fields the new data does not mention.
    pub merge: bool,
}

impl SetOptions {
    pub fn merge() -> Self {
        SetOptions { merge: true }
    }

    pub(crate) fn mode(&self) -> SetMode {
        if self.merge {
            SetMode::Merge
        } else {
            SetMode::Replace
        }
    }
}
