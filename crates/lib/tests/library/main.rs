//! End-to-end tests for building, rendering and saving manifests.

mod save_tests;
mod secrets_tests;
