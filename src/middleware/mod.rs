//! Request middleware for Helmsman

mod hmac;

pub use hmac::*;
