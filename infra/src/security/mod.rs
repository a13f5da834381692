//! Security primitives used by the credential stores

pub mod password;

pub use password::PasswordHasher;
