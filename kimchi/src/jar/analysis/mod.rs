//! Analysis modules for class file introspection
//!
//! This module decides which constant pool strings are literals, lists them,
//! and compares jars class by class.

pub mod classifier;
pub mod compare;
pub mod scanner;

// Re-export commonly used analysis functionality
pub use classifier::{classify, Classification};
pub use compare::{class_digests, compare_jars};
pub use scanner::{archive_contains, archive_literals, literal_strings, utf8_strings};
