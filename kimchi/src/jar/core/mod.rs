//! Core class file operations
//!
//! Byte-level reading of class files: the modified UTF-8 codec, the typed
//! constant pool, and the header/member/attribute walk that follows it.

pub mod classfile;
pub mod cpool;
pub mod error;
pub mod mutf8;
pub mod reader;

// Re-export commonly used core functionality
pub use classfile::{AttributeInfo, ClassFile, ClassLayout, Member, HEADER_LEN, MAGIC};
pub use cpool::{Constant, ConstantPool, ConstantTag};
pub use error::{ClassFileError, ClassFileResult};
pub use reader::ByteReader;
