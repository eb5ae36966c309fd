use std::collections::BTreeSet;

use tracing::warn;

use crate::jar::{
    core::{ClassFile, ClassFileError, ClassFileResult, Constant},
    types::{BodyFallback, RewriteOptions},
};

/// Utf8 slots of one class, split by how they are referenced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Slots naming a class, field, method or attribute
    pub names: BTreeSet<u16>,
    /// Slots referenced by a `CONSTANT_String`
    pub strings: BTreeSet<u16>,
    /// False when the body walk failed and only pool-level names are known
    pub body_complete: bool,
}

impl Classification {
    /// String literals that are not also identifiers.
    ///
    /// javac may point a `CONSTANT_String` and a field name at the same slot
    /// (enum constants do this), so membership in `strings` alone is not
    /// enough.
    pub fn translatable(&self) -> BTreeSet<u16> {
        self.strings.difference(&self.names).copied().collect()
    }

    pub fn is_translatable(&self, index: u16) -> bool {
        self.strings.contains(&index) && !self.names.contains(&index)
    }

    pub fn has_translatable(&self) -> bool {
        self.strings.iter().any(|index| !self.names.contains(index))
    }
}

/// Find which Utf8 slots of `class` are free literal data.
pub fn classify(
    class: &ClassFile<'_>,
    options: &RewriteOptions,
) -> ClassFileResult<Classification> {
    let mut classification = Classification::default();

    for (_, constant) in class.pool.iter() {
        match *constant {
            Constant::String { utf8_index } => {
                classification.strings.insert(utf8_index);
            }
            Constant::Class { name_index } => {
                classification.names.insert(name_index);
            }
            // The descriptor is a type signature, never a literal target.
            Constant::NameAndType { name_index, .. } => {
                classification.names.insert(name_index);
            }
            _ => {}
        }
    }

    match class.layout() {
        Ok(layout) => {
            classification.names.extend(layout.name_indices());
            classification.body_complete = true;
        }
        Err(err) => match options.body_fallback {
            BodyFallback::SkipClass => return Err(ClassFileError::Body(Box::new(err))),
            BodyFallback::PoolOnly => {
                warn!("Body walk failed, using pool-level names only: {}", err);
            }
        },
    }

    Ok(classification)
}
