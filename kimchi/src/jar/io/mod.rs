//! I/O modules for JAR file reading and writing operations
//!
//! This module contains the streaming class reader used by the analysis
//! tools and the patcher that writes translated jars.

pub mod reader;
pub mod writer;

// Re-export commonly used I/O functionality
pub use reader::{declared_entry_count, open_jar, visit_classes};
pub use writer::{patch_jar, process_class, ClassOutcome};
