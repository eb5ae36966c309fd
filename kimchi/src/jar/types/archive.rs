use serde::Serialize;

/// Entries whose name ends with this are class files.
pub const CLASS_SUFFIX: &str = ".class";

/// A named blob read from a jar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

pub fn is_class_name(name: &str) -> bool {
    name.ends_with(CLASS_SUFFIX)
}

/// Outcome of one jar pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatchStats {
    /// Class entries seen, blocked ones included
    pub total: usize,
    pub patched: usize,
    pub errors: usize,
}

impl PatchStats {
    pub fn unchanged(&self) -> usize {
        self.total - self.patched - self.errors
    }
}

/// Class entries that differ between two jars, by name
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct JarDiff {
    pub changed: Vec<String>,
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl JarDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty() && self.added.is_empty()
    }
}
