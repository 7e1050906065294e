use crate::common::{Value, FIELD_SEPARATOR};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

/// The address of a field inside a document.
///
/// A path built from a single string is one key and is used as given, so
/// `"meta.updatedAt"` already addresses the nested field. A path built from
/// a sequence of keys addresses a nested field one key per level.
///
/// # Examples
///
/// ```rust
/// use typestore::update::FieldPath;
///
/// let single = FieldPath::from("meta.updatedAt");
/// let nested = FieldPath::from(["meta", "updatedAt"]);
/// assert_eq!(single.dotted(), nested.dotted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[String; 4]>,
}

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether the path names at least one key and none of its dotted keys
    /// is empty. `"a..b"` and `["a", ""]` are not valid.
    pub fn is_valid(&self) -> bool {
        !self.segments.is_empty()
            && self
                .segments
                .iter()
                .flat_map(|s| s.split(FIELD_SEPARATOR))
                .all(|key| !key.is_empty())
    }

    /// The path as one dotted key.
    pub fn dotted(&self) -> String {
        self.segments.iter().join(FIELD_SEPARATOR)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

impl From<&str> for FieldPath {
    fn from(key: &str) -> Self {
        FieldPath::new([key])
    }
}

impl From<String> for FieldPath {
    fn from(key: String) -> Self {
        FieldPath::new([key])
    }
}

impl From<Vec<&str>> for FieldPath {
    fn from(segments: Vec<&str>) -> Self {
        FieldPath::new(segments)
    }
}

impl From<Vec<String>> for FieldPath {
    fn from(segments: Vec<String>) -> Self {
        FieldPath::new(segments)
    }
}

impl<const N: usize> From<[&str; N]> for FieldPath {
    fn from(segments: [&str; N]) -> Self {
        FieldPath::new(segments)
    }
}

/// One `(path, value)` entry of a list-form update.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    path: FieldPath,
    value: Value,
}

impl FieldUpdate {
    pub fn new(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        FieldUpdate {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Shorthand for [`FieldUpdate::new`].
pub fn field(path: impl Into<FieldPath>, value: impl Into<Value>) -> FieldUpdate {
    FieldUpdate::new(path, value)
}
