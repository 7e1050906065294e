//! Shared fixtures for the typestore integration tests.

pub mod test_util;
