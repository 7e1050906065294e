use crate::common::Value;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use im::OrdMap;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};

/// A string-keyed map of [`Value`]s, the shape of every stored document.
///
/// `Object` is backed by a persistent ordered map (`im::OrdMap`), so cloning
/// is O(1) and a clone is fully independent of the original. Keys are
/// literal: `put("a.b", v)` creates a top-level key named `a.b`. Nested
/// fields are addressed explicitly through [`Object::put_path`],
/// [`Object::get_path`] and [`Object::remove_path`].
///
/// # Examples
///
/// ```rust
/// use typestore::common::Value;
/// use typestore::obj;
///
/// let mut profile = obj! { name: "Tati", meta: { visits: 3 } };
/// profile.put_path(&["meta", "visits"], 4).unwrap();
///
/// assert_eq!(profile.get_path(&["meta", "visits"]), Some(&Value::Integer(4)));
/// assert!(!profile.contains_key("meta.visits"));
/// ```
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    data: OrdMap<String, Value>,
}

impl Object {
    /// Creates a new empty object.
    pub fn new() -> Self {
        Object {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with the literal top-level `key`.
    ///
    /// Returns a `ValidationError` if the key is empty.
    pub fn put<'a, T: Into<Value>>(
        &mut self,
        key: impl Into<Cow<'a, str>>,
        value: T,
    ) -> StoreResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Object does not support empty key");
            return Err(StoreError::new(
                "Object does not support empty key",
                ErrorKind::ValidationError,
            ));
        }
        self.data.insert(key.into_owned(), value.into());
        Ok(())
    }

    /// Returns the value of the literal top-level `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Removes the literal top-level `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the value found by walking nested objects along `path`.
    ///
    /// Returns `None` if any segment is missing or a non-object value is
    /// reached before the last segment.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let value = self.data.get(first.as_ref())?;
        if rest.is_empty() {
            return Some(value);
        }
        match value {
            Value::Object(obj) => obj.get_path(rest),
            _ => None,
        }
    }

    /// Sets the value at the nested `path`, creating intermediate objects as
    /// needed. Non-object values found along the path are replaced by an
    /// object.
    pub fn put_path<S: AsRef<str>, T: Into<Value>>(
        &mut self,
        path: &[S],
        value: T,
    ) -> StoreResult<()> {
        let splits: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
        self.deep_put(&splits, value.into())
    }

    /// Removes the value at the nested `path`, returning it if present.
    /// Intermediate objects are left in place, even when they become empty.
    pub fn remove_path<S: AsRef<str>>(&mut self, path: &[S]) -> Option<Value> {
        let splits: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
        self.deep_remove(&splits)
    }

    /// Deep-merges `other` into this object.
    ///
    /// When both sides hold an object under the same key they are merged
    /// recursively; otherwise the value from `other` wins.
    pub fn merge(&mut self, other: &Object) {
        for (key, value) in other.data.iter() {
            match (self.data.get_mut(key), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    existing.merge(incoming);
                }
                _ => {
                    self.data.insert(key.clone(), value.clone());
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.data.values()
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> StoreResult<()> {
        let Some((key, remaining)) = splits.split_first() else {
            log::error!("Empty field path");
            return Err(StoreError::new(
                "Empty field path",
                ErrorKind::ValidationError,
            ));
        };

        if remaining.is_empty() {
            return self.put(*key, value);
        }

        if key.is_empty() {
            log::error!("Object does not support empty key");
            return Err(StoreError::new(
                "Object does not support empty key",
                ErrorKind::ValidationError,
            ));
        }

        // descend into the embedded object, replacing anything that is not one
        let mut nested = match self.data.get(*key) {
            Some(Value::Object(obj)) => obj.clone(),
            _ => Object::new(),
        };
        nested.deep_put(remaining, value)?;
        self.data.insert(key.to_string(), Value::Object(nested));
        Ok(())
    }

    fn deep_remove(&mut self, splits: &[&str]) -> Option<Value> {
        let (key, remaining) = splits.split_first()?;
        if remaining.is_empty() {
            return self.data.remove(*key);
        }

        match self.data.get_mut(*key) {
            Some(Value::Object(nested)) => nested.deep_remove(remaining),
            _ => None,
        }
    }

    pub(crate) fn write_json(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: ", key)?;
            value.write_json(f)?;
        }
        write!(f, "}}")
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write_json(f)
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Object {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter().collect::<Vec<_>>().into_iter()
    }
}

/// Strips the quotes `stringify!` leaves around string-literal keys.
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates an [`Object`] with JSON-like syntax.
///
/// Keys may be bare identifiers or string literals. Values may be literals,
/// nested `{ ... }` objects, `[ ... ]` arrays, or any parenthesised
/// expression convertible into a [`Value`].
///
/// ```rust
/// use typestore::obj;
/// use typestore::common::server_timestamp;
///
/// let base = 100;
/// let profile = obj! {
///     name: "Charlie",
///     score: (base * 2),
///     "display name": "Chuck",
///     meta: { updatedAt: (server_timestamp()) },
///     tags: ["admin", "user"]
/// };
/// assert_eq!(profile.len(), 5);
/// ```
#[macro_export]
macro_rules! obj {
    () => {
        $crate::common::Object::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::obj_value;

            let mut obj = $crate::common::Object::new();
            $(
                obj.put($crate::common::normalize(stringify!($key)), $crate::obj_value!($value))
                .expect(&format!("Failed to put value {} in object", stringify!($value)));
            )*
            obj
        }
    };
}

/// Helper macro converting the values of [`obj!`].
#[macro_export]
macro_rules! obj_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Object($crate::obj!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::obj_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
