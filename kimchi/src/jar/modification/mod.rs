//! Modification modules for JAR content rewriting
//!
//! This module contains the class rewriter that substitutes string literals
//! and the exclusion rules that keep classes and strings out of it.

pub mod exclusions;
pub mod rewriter;

// Re-export commonly used modification functionality
pub use exclusions::ExclusionSet;
pub use rewriter::rebuild;
