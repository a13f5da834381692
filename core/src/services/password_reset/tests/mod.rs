//! Tests for the password reset service

mod cleanup_tests;
mod service_tests;
