// Library for the binary and integration tests

pub mod check;
pub mod config;
pub mod counter_source;
pub mod delta;
pub mod error;
pub mod filter;
pub mod format;
pub mod models;
pub mod report;
pub mod sample_store;
pub mod sink;
pub mod threshold;
pub mod version;
pub mod worker;
