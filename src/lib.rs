//! Cross-crate integration tests for the blockmul workspace live in `tests/`.
