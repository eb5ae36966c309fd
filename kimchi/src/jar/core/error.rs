use thiserror::Error;

use super::cpool::ConstantTag;

pub type ClassFileResult<T> = Result<T, ClassFileError>;

/// Reasons a single class file cannot be rewritten.
///
/// All of them are local to one archive entry: the entry is copied through
/// unchanged and the pass carries on.
#[derive(Debug, Error)]
pub enum ClassFileError {
    #[error("Not a class file (magic {0:#010x})")]
    BadMagic(u32),

    #[error("Truncated class file: {needed} bytes needed at {offset}, {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Unknown constant pool tag {tag} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("{tag} constant at index {index} overflows a pool of {count} slots")]
    WideConstantOverflow {
        tag: ConstantTag,
        index: u16,
        count: u16,
    },

    #[error("Utf8 payload of {len} bytes does not fit a 16-bit length")]
    Utf8TooLong { len: usize },

    #[error("Replacement for pool index {index} encodes to {len} bytes")]
    ReplacementTooLong { index: u16, len: usize },

    #[error("Class body walk failed: {0}")]
    Body(#[source] Box<ClassFileError>),
}
