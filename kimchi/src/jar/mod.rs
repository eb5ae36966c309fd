//! JAR manipulation library for translating string literals of Java classes
//!
//! This module provides the tools to find the string literals of compiled
//! classes and rewrite them in place, leaving every identifier and every
//! other byte of the archive alone. The functionality is organized into
//! several sub-modules:
//!
//! - `core`: Modified UTF-8, constant pool parsing and the class layout walk
//! - `analysis`: Identifier classification, literal listing and jar comparison
//! - `modification`: Class rewriting and exclusion rules
//! - `io`: JAR file reading and the patching pass
//! - `types`: Translation maps, options and pass summaries
//!
//! # Example Usage
//!
//! ```no_run
//! use kimchi::jar::{
//!     io::patch_jar,
//!     modification::ExclusionSet,
//!     types::{RewriteOptions, TranslationMap},
//! };
//!
//! let mut translations = TranslationMap::new();
//! translations.insert("Hello".to_owned(), "안녕".to_owned());
//!
//! let stats = patch_jar(
//!     "game.jar",
//!     "game.jar",
//!     &translations,
//!     &ExclusionSet::default(),
//!     &RewriteOptions::default(),
//!     |_| {},
//! )?;
//! println!("{} classes patched", stats.patched);
//! # Ok::<(), anyhow::Error>(())
//! ```

// Sub-modules
pub mod analysis;
pub mod core;
pub mod io;
pub mod modification;
pub mod types;

// Re-export the most commonly used functionality for convenience
pub use analysis::{archive_contains, archive_literals, classify, compare_jars, literal_strings};
pub use self::core::{mutf8, ClassFile, ClassFileError, ClassFileResult, Constant, ConstantPool};
pub use io::{patch_jar, process_class, ClassOutcome};
pub use modification::{rebuild, ExclusionSet};
pub use types::{ArchiveEntry, BodyFallback, JarDiff, PatchStats, RewriteOptions, TranslationMap};
