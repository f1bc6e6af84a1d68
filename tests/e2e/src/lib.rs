//! Shared harness for remcast end-to-end tests

pub mod fixtures;
