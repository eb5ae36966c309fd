use std::fmt;

use super::{
    error::{ClassFileError, ClassFileResult},
    mutf8,
    reader::ByteReader,
};

/// Tag byte of a constant pool entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter,
)]
#[repr(u8)]
pub enum ConstantTag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    FieldRef = 9,
    MethodRef = 10,
    InterfaceMethodRef = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    Dynamic = 17,
    InvokeDynamic = 18,
    Module = 19,
    Package = 20,
}

impl ConstantTag {
    /// `Long` and `Double` take two pool slots.
    pub fn is_wide(self) -> bool {
        matches!(self, ConstantTag::Long | ConstantTag::Double)
    }
}

impl TryFrom<u8> for ConstantTag {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ConstantTag::*;
        Ok(match value {
            1 => Utf8,
            3 => Integer,
            4 => Float,
            5 => Long,
            6 => Double,
            7 => Class,
            8 => String,
            9 => FieldRef,
            10 => MethodRef,
            11 => InterfaceMethodRef,
            12 => NameAndType,
            15 => MethodHandle,
            16 => MethodType,
            17 => Dynamic,
            18 => InvokeDynamic,
            19 => Module,
            20 => Package,
            other => return Err(other),
        })
    }
}

/// One constant pool slot.
///
/// `Utf8` borrows its payload from the class bytes; numeric constants keep
/// their raw bits so they serialize back exactly (NaN payloads included).
#[derive(Clone, PartialEq, Eq)]
pub enum Constant<'a> {
    Utf8(&'a [u8]),
    Integer(u32),
    Float(u32),
    Long(u64),
    Double(u64),
    Class {
        name_index: u16,
    },
    String {
        utf8_index: u16,
    },
    FieldRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    MethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    InterfaceMethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    MethodHandle {
        reference_kind: u8,
        reference_index: u16,
    },
    MethodType {
        descriptor_index: u16,
    },
    Dynamic {
        bootstrap_method_attr_index: u16,
        name_and_type_index: u16,
    },
    InvokeDynamic {
        bootstrap_method_attr_index: u16,
        name_and_type_index: u16,
    },
    Module {
        name_index: u16,
    },
    Package {
        name_index: u16,
    },
    /// Unusable slot following a `Long` or `Double`
    Reserved,
}

impl<'a> Constant<'a> {
    pub fn tag(&self) -> Option<ConstantTag> {
        use ConstantTag as T;
        Some(match self {
            Constant::Utf8(_) => T::Utf8,
            Constant::Integer(_) => T::Integer,
            Constant::Float(_) => T::Float,
            Constant::Long(_) => T::Long,
            Constant::Double(_) => T::Double,
            Constant::Class { .. } => T::Class,
            Constant::String { .. } => T::String,
            Constant::FieldRef { .. } => T::FieldRef,
            Constant::MethodRef { .. } => T::MethodRef,
            Constant::InterfaceMethodRef { .. } => T::InterfaceMethodRef,
            Constant::NameAndType { .. } => T::NameAndType,
            Constant::MethodHandle { .. } => T::MethodHandle,
            Constant::MethodType { .. } => T::MethodType,
            Constant::Dynamic { .. } => T::Dynamic,
            Constant::InvokeDynamic { .. } => T::InvokeDynamic,
            Constant::Module { .. } => T::Module,
            Constant::Package { .. } => T::Package,
            Constant::Reserved => return None,
        })
    }

    fn read(reader: &mut ByteReader<'a>) -> ClassFileResult<Self> {
        let offset = reader.pos();
        let raw_tag = reader.u8()?;
        let tag = ConstantTag::try_from(raw_tag).map_err(|tag| ClassFileError::UnknownTag {
            tag,
            offset,
        })?;

        use ConstantTag as T;
        Ok(match tag {
            T::Utf8 => {
                let len = reader.u16()?;
                Constant::Utf8(reader.bytes(usize::from(len))?)
            }
            T::Integer => Constant::Integer(reader.u32()?),
            T::Float => Constant::Float(reader.u32()?),
            T::Long => Constant::Long(reader.u64()?),
            T::Double => Constant::Double(reader.u64()?),
            T::Class => Constant::Class {
                name_index: reader.u16()?,
            },
            T::String => Constant::String {
                utf8_index: reader.u16()?,
            },
            T::FieldRef => Constant::FieldRef {
                class_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            T::MethodRef => Constant::MethodRef {
                class_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            T::InterfaceMethodRef => Constant::InterfaceMethodRef {
                class_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            T::NameAndType => Constant::NameAndType {
                name_index: reader.u16()?,
                descriptor_index: reader.u16()?,
            },
            T::MethodHandle => Constant::MethodHandle {
                reference_kind: reader.u8()?,
                reference_index: reader.u16()?,
            },
            T::MethodType => Constant::MethodType {
                descriptor_index: reader.u16()?,
            },
            T::Dynamic => Constant::Dynamic {
                bootstrap_method_attr_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            T::InvokeDynamic => Constant::InvokeDynamic {
                bootstrap_method_attr_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            T::Module => Constant::Module {
                name_index: reader.u16()?,
            },
            T::Package => Constant::Package {
                name_index: reader.u16()?,
            },
        })
    }

    /// Append the entry exactly as it appears in a class file.
    ///
    /// `Reserved` writes nothing; the `Utf8` length prefix is derived from the
    /// payload.
    pub fn write_to(&self, out: &mut Vec<u8>) -> ClassFileResult<()> {
        let Some(tag) = self.tag() else {
            return Ok(());
        };
        out.push(tag as u8);

        match *self {
            Constant::Utf8(bytes) => {
                let len = u16::try_from(bytes.len())
                    .map_err(|_| ClassFileError::Utf8TooLong { len: bytes.len() })?;
                out.extend_from_slice(&len.to_be_bytes());
                out.extend_from_slice(bytes);
            }
            Constant::Integer(bits) | Constant::Float(bits) => {
                out.extend_from_slice(&bits.to_be_bytes())
            }
            Constant::Long(bits) | Constant::Double(bits) => {
                out.extend_from_slice(&bits.to_be_bytes())
            }
            Constant::Class { name_index: a }
            | Constant::String { utf8_index: a }
            | Constant::MethodType {
                descriptor_index: a,
            }
            | Constant::Module { name_index: a }
            | Constant::Package { name_index: a } => out.extend_from_slice(&a.to_be_bytes()),
            Constant::FieldRef {
                class_index: a,
                name_and_type_index: b,
            }
            | Constant::MethodRef {
                class_index: a,
                name_and_type_index: b,
            }
            | Constant::InterfaceMethodRef {
                class_index: a,
                name_and_type_index: b,
            }
            | Constant::NameAndType {
                name_index: a,
                descriptor_index: b,
            }
            | Constant::Dynamic {
                bootstrap_method_attr_index: a,
                name_and_type_index: b,
            }
            | Constant::InvokeDynamic {
                bootstrap_method_attr_index: a,
                name_and_type_index: b,
            } => {
                out.extend_from_slice(&a.to_be_bytes());
                out.extend_from_slice(&b.to_be_bytes());
            }
            Constant::MethodHandle {
                reference_kind,
                reference_index,
            } => {
                out.push(reference_kind);
                out.extend_from_slice(&reference_index.to_be_bytes());
            }
            Constant::Reserved => {}
        }

        Ok(())
    }
}

impl fmt::Debug for Constant<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Utf8(bytes) => write!(f, "Utf8({:?})", mutf8::decode(bytes)),
            Constant::Integer(bits) => write!(f, "Integer({})", *bits as i32),
            Constant::Float(bits) => write!(f, "Float({})", f32::from_bits(*bits)),
            Constant::Long(bits) => write!(f, "Long({})", *bits as i64),
            Constant::Double(bits) => write!(f, "Double({})", f64::from_bits(*bits)),
            Constant::Class { name_index } => write!(f, "Class(#{name_index})"),
            Constant::String { utf8_index } => write!(f, "String(#{utf8_index})"),
            Constant::FieldRef {
                class_index,
                name_and_type_index,
            } => write!(f, "FieldRef(#{class_index}, #{name_and_type_index})"),
            Constant::MethodRef {
                class_index,
                name_and_type_index,
            } => write!(f, "MethodRef(#{class_index}, #{name_and_type_index})"),
            Constant::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => write!(
                f,
                "InterfaceMethodRef(#{class_index}, #{name_and_type_index})"
            ),
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => write!(f, "NameAndType(#{name_index}, #{descriptor_index})"),
            Constant::MethodHandle {
                reference_kind,
                reference_index,
            } => write!(f, "MethodHandle({reference_kind}, #{reference_index})"),
            Constant::MethodType { descriptor_index } => {
                write!(f, "MethodType(#{descriptor_index})")
            }
            Constant::Dynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } => write!(
                f,
                "Dynamic({bootstrap_method_attr_index}, #{name_and_type_index})"
            ),
            Constant::InvokeDynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } => write!(
                f,
                "InvokeDynamic({bootstrap_method_attr_index}, #{name_and_type_index})"
            ),
            Constant::Module { name_index } => write!(f, "Module(#{name_index})"),
            Constant::Package { name_index } => write!(f, "Package(#{name_index})"),
            Constant::Reserved => f.write_str("Reserved"),
        }
    }
}

/// The 1-indexed constant pool of a class file.
///
/// Index 0 is never populated. `count` is the value stored in the class file,
/// one more than the number of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantPool<'a> {
    count: u16,
    entries: Vec<Constant<'a>>,
}

impl<'a> ConstantPool<'a> {
    pub fn read(reader: &mut ByteReader<'a>) -> ClassFileResult<Self> {
        let count = reader.u16()?;
        let mut entries = Vec::with_capacity(usize::from(count));

        let mut index: u16 = 1;
        while index < count {
            let constant = Constant::read(reader)?;
            let wide = constant.tag().filter(|tag| tag.is_wide());
            entries.push(constant);

            if let Some(tag) = wide {
                if index + 1 >= count {
                    return Err(ClassFileError::WideConstantOverflow { tag, index, count });
                }
                entries.push(Constant::Reserved);
                index += 1;
            }
            index += 1;
        }

        Ok(Self { count, entries })
    }

    /// Declared `constant_pool_count`
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Number of usable slots, `Reserved` ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: u16) -> Option<&Constant<'a>> {
        let slot = usize::from(index).checked_sub(1)?;
        self.entries.get(slot)
    }

    /// Raw payload of the `Utf8` entry at `index`
    pub fn utf8(&self, index: u16) -> Option<&'a [u8]> {
        match self.get(index)? {
            Constant::Utf8(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Entries paired with their pool index, starting at 1
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant<'a>)> + '_ {
        (1..=u16::MAX).zip(self.entries.iter())
    }

    /// Tag of every slot in order; `None` marks a `Reserved` slot.
    pub fn tags(&self) -> Vec<Option<ConstantTag>> {
        self.entries.iter().map(Constant::tag).collect()
    }
}
