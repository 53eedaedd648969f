//! End-to-end lifecycle tests against real project directories.

mod common;
mod project_tests;
