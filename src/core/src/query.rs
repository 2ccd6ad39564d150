//! Parameterized read queries over the user directory.

pub mod user_search;

pub use user_search::{search_users, UserQuery, ALL};
