use crate::common::{AUTO_ID_ALPHABET, AUTO_ID_LENGTH, PATH_SEPARATOR};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use rand::Rng;

/// Checks that `path` names a collection: non-empty, no empty segments and an
/// odd number of segments (`users`, `users/u1/posts`).
pub fn validate_collection_path(path: &str) -> StoreResult<()> {
    if path.is_empty() {
        log::error!("Collection path cannot be empty");
        return Err(StoreError::new(
            "Collection path cannot be empty",
            ErrorKind::ResolutionError,
        ));
    }

    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        log::error!("Collection path {} contains an empty segment", path);
        return Err(StoreError::new(
            &format!("Collection path {} contains an empty segment", path),
            ErrorKind::ResolutionError,
        ));
    }

    if segments.len() % 2 == 0 {
        log::error!("Path {} points to a document, not a collection", path);
        return Err(StoreError::new(
            &format!("Path {} points to a document, not a collection", path),
            ErrorKind::ResolutionError,
        ));
    }
    Ok(())
}

/// Joins a collection path and a document id into a document path.
pub fn document_path(collection: &str, id: &str) -> String {
    format!("{}{}{}", collection, PATH_SEPARATOR, id)
}

/// Generates a random alphanumeric document id.
pub fn random_id() -> String {
    let mut rng = rand::thread_rng();
    (0..AUTO_ID_LENGTH)
        .map(|_| AUTO_ID_ALPHABET[rng.gen_range(0..AUTO_ID_ALPHABET.len())] as char)
        .collect()
}
