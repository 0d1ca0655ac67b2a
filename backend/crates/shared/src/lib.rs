//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types and result aliases
//! - Typed IDs for entities that cross crate boundaries
//! - The JSON response envelope every HTTP endpoint answers with
//!
//! Only things that are hard to change and mean the same thing in every
//! domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
