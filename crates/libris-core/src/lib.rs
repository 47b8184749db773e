//! # libris-core
//!
//! Core crate for Libris. Contains the blob store trait, configuration
//! schemas, and the unified error system shared by every other crate.
//!
//! This crate has **no** internal dependencies on other Libris crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
