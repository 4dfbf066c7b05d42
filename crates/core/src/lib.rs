//! Core business logic for civita.

pub mod matching;
pub mod services;
pub mod visibility;

pub use services::*;

/// Generate a unique ID using ULID.
#[must_use]
pub fn generate_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}
