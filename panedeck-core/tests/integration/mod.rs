//! Integration test modules

mod config_tests;
mod file_store_tests;
mod session_tests;
