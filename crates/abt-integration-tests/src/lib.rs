//! Cross-crate regression fixtures live under `tests/`.
