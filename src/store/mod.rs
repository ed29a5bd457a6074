//! SQL access for the primary store.
//!
//! Functions take the pool directly and return `sqlx::Error`; handlers turn
//! those into [`crate::error::AppError`].

pub mod licences;
pub mod shifts;
