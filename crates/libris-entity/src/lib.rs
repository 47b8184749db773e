//! # libris-entity
//!
//! Records of the Libris namespace. Every struct in this crate is either a
//! metadata-store row (deriving `sqlx::FromRow`) or a value object passed
//! between the store and the service layer.

pub mod file;
pub mod folder;
