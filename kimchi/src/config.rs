//! Translation and exclusion inputs
//!
//! Both come as JSON files. Translation files are flat `{"source": "target"}`
//! objects; exclusion files look like
//!
//! ```json
//! {
//!     "blocked_classes": ["com/example/Check.class", "com/example/persist/"],
//!     "blocked_strings": ["id"],
//!     "blocked_jar_strings": ["Nobody will ever pirate"]
//! }
//! ```
//!
//! with every key optional.

use std::{collections::BTreeSet, fs, io, path::{Path, PathBuf}};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::jar::{modification::ExclusionSet, types::TranslationMap};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExclusionsFile {
    pub blocked_classes: BTreeSet<String>,
    pub blocked_strings: BTreeSet<String>,
    /// Strings only blocked when patching archives
    pub blocked_jar_strings: BTreeSet<String>,
}

impl ExclusionsFile {
    pub fn into_exclusions(self, archive_only: bool) -> ExclusionSet {
        let mut blocked_strings = self.blocked_strings;
        if archive_only {
            blocked_strings.extend(self.blocked_jar_strings);
        }
        ExclusionSet {
            blocked_classes: self.blocked_classes,
            blocked_strings,
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_owned(),
        source,
    })
}

/// Merge translation files in order; later files override earlier keys.
pub fn load_translations<P: AsRef<Path>>(paths: &[P]) -> Result<TranslationMap, ConfigError> {
    let mut translations = TranslationMap::new();
    for path in paths {
        let path = path.as_ref();
        let file: TranslationMap = read_json(path)?;
        debug!("Loaded {} translations from {}", file.len(), path.display());
        translations.extend(file);
    }
    Ok(translations)
}

/// Union of all exclusion files.
///
/// `archive_only` also blocks each file's `blocked_jar_strings`.
pub fn load_exclusions<P: AsRef<Path>>(
    paths: &[P],
    archive_only: bool,
) -> Result<ExclusionSet, ConfigError> {
    let mut exclusions = ExclusionSet::default();
    for path in paths {
        let file: ExclusionsFile = read_json(path.as_ref())?;
        exclusions.extend(file.into_exclusions(archive_only));
    }
    Ok(exclusions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn later_translation_files_win() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.json");
        let fixes = dir.path().join("fixes.json");
        fs::write(&base, r#"{"Hello": "안녕", "Bye": "잘 가"}"#).unwrap();
        fs::write(&fixes, r#"{"Hello": "안녕하세요"}"#).unwrap();

        let translations = load_translations(&[&base, &fixes]).unwrap();
        assert_eq!(translations.len(), 2);
        assert_eq!(translations["Hello"], "안녕하세요");
        assert_eq!(translations["Bye"], "잘 가");
    }

    #[test]
    fn missing_and_malformed_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_translations(&[&missing]),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{\"Hello\": 1}").unwrap();
        let err = load_translations(&[&broken]).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn exclusions_merge_and_fold_jar_strings() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.json");
        let local = dir.path().join("local.json");
        fs::write(
            &global,
            r#"{"blocked_classes": ["a/"], "blocked_jar_strings": ["pirate"]}"#,
        )
        .unwrap();
        fs::write(&local, r#"{"blocked_strings": ["id"]}"#).unwrap();

        let archive = load_exclusions(&[&global, &local], true).unwrap();
        assert_eq!(
            archive.blocked_strings,
            BTreeSet::from(["id".to_owned(), "pirate".to_owned()])
        );
        assert!(archive.is_blocked_class("a/B.class"));

        let plain = load_exclusions(&[&global, &local], false).unwrap();
        assert_eq!(plain.blocked_strings, BTreeSet::from(["id".to_owned()]));
    }
}
