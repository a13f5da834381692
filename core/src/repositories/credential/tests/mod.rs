//! Tests for the mock credential store
