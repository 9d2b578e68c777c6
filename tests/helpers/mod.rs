//! Test helpers module
//!
//! Database setup, a mock auth provider, test data builders and a context
//! that wires the services together.
#![allow(dead_code, unused_macros)]

/// Start a test database or skip the test when none is available
macro_rules! require_db {
    () => {
        match crate::helpers::TestDatabase::new().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skipping: no test database available ({})", e);
                return;
            }
        }
    };
}

pub mod auth_mock;
pub mod database_helper;
pub mod test_context;
pub mod test_data;

pub use auth_mock::*;
pub use database_helper::*;
pub use test_context::*;
pub use test_data::*;
