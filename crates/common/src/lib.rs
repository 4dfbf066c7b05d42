//! Common utilities and shared types for civita.
//!
//! This crate provides foundational components used across all civita crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Validation**: Phone and "District-Thana" address format predicates
//! - **Storage**: Local file storage for report attachments

pub mod config;
pub mod error;
pub mod id;
pub mod storage;
pub mod validate;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{LocalStorage, StorageBackend, StoredFile, attachment_key};
pub use validate::{is_valid_address, is_valid_phone, split_district_thana};
