//! Type definitions for JAR translation
//!
//! This module contains the inputs a rewrite pass takes and the summaries it
//! produces.

pub mod archive;
pub mod options;

use std::collections::HashMap;

// Re-export commonly used types for convenience
pub use archive::{ArchiveEntry, JarDiff, PatchStats};
pub use options::{BodyFallback, RewriteOptions};

/// Source text to replacement text
pub type TranslationMap = HashMap<String, String>;
