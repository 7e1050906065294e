/// Separator between the segments of a nested field path (`meta.updatedAt`).
pub const FIELD_SEPARATOR: &str = ".";

/// Separator between collection and document segments (`users/u1/posts`).
pub const PATH_SEPARATOR: &str = "/";

/// Default upper bound on staged operations per batch.
pub const DEFAULT_MAX_BATCH_OPERATIONS: usize = 500;

pub const AUTO_ID_LENGTH: usize = 20;

pub(crate) const AUTO_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
