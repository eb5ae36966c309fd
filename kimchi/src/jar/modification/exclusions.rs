use std::collections::BTreeSet;

use crate::jar::types::TranslationMap;

/// Trailing separator that turns a blocked class entry into a package prefix.
pub const PACKAGE_SEPARATOR: char = '/';

/// Classes and strings that must come out of a pass untouched.
///
/// Blocked classes cover anti-tamper checks and classes whose literals are
/// runtime keys (serialization field names, for instance). Blocked strings
/// are never substituted, whichever class they appear in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    /// Archive entry names (`com/example/Foo.class`) or package prefixes
    /// ending in `/` (`com/example/persist/`)
    pub blocked_classes: BTreeSet<String>,
    pub blocked_strings: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new<C, S>(blocked_classes: C, blocked_strings: S) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            blocked_classes: blocked_classes.into_iter().map(Into::into).collect(),
            blocked_strings: blocked_strings.into_iter().map(Into::into).collect(),
        }
    }

    pub fn classes<C>(blocked_classes: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            blocked_classes: blocked_classes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn strings<S>(blocked_strings: S) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            blocked_strings: blocked_strings.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_blocked_class(&self, entry_name: &str) -> bool {
        self.blocked_classes.iter().any(|blocked| {
            if blocked.ends_with(PACKAGE_SEPARATOR) {
                entry_name.starts_with(blocked.as_str())
            } else {
                entry_name == blocked
            }
        })
    }

    /// A copy of `translations` without blocked source strings.
    pub fn effective_translations(&self, translations: &TranslationMap) -> TranslationMap {
        translations
            .iter()
            .filter(|(source, _)| !self.blocked_strings.contains(source.as_str()))
            .map(|(source, replacement)| (source.clone(), replacement.clone()))
            .collect()
    }

    pub fn extend(&mut self, other: ExclusionSet) {
        self.blocked_classes.extend(other.blocked_classes);
        self.blocked_strings.extend(other.blocked_strings);
    }
}
