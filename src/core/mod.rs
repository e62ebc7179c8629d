//! Core types shared across the release builder.

pub mod error;

pub use error::{BuilderError, ErrorContext, user_friendly_error};
