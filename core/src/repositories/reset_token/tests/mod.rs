//! Tests for the mock reset token repository
