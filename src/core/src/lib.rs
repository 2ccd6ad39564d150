pub mod aggregation;
pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod history;
pub mod management;
pub mod models;
pub mod query;
pub mod seeding;
pub mod storage;
pub mod web_interface;

pub use controller::Controller;
pub use error_handling::{DataError, StorageError};
pub use storage::{Collection, Store};

#[cfg(test)]
mod test_support;
