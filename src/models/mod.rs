//! Typed models for request bodies and client-side records.
//!
//! Most API answers are returned as plain JSON values; the types here cover
//! the bodies that have a fixed shape and the change-tracking user record.

mod knowledge_base;
mod link;
mod user;

pub use knowledge_base::*;
pub use link::*;
pub use user::*;
