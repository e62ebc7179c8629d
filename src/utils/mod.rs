//! Cross-cutting utilities: file system helpers and progress output.

pub mod fs;
pub mod progress;
pub mod string_case;
