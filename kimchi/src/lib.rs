pub mod config;
pub mod jar;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{load_exclusions, load_translations, ConfigError};
pub use jar::{patch_jar, ExclusionSet, PatchStats, RewriteOptions, TranslationMap};
pub use types::{ProcessingEvent, Stage, StageProgress};
