use super::{
    cpool::ConstantPool,
    error::{ClassFileError, ClassFileResult},
    reader::ByteReader,
};

pub const MAGIC: u32 = 0xCAFE_BABE;

/// magic(4) + minor_version(2) + major_version(2)
pub const HEADER_LEN: usize = 8;

/// A class file split at the end of its constant pool.
///
/// Nothing past the pool is decoded here; [`ClassFile::layout`] walks just
/// enough of the rest to find member and attribute names.
#[derive(Debug, Clone)]
pub struct ClassFile<'a> {
    data: &'a [u8],
    pub minor_version: u16,
    pub major_version: u16,
    pub pool: ConstantPool<'a>,
    pool_end: usize,
}

impl<'a> ClassFile<'a> {
    pub fn parse(data: &'a [u8]) -> ClassFileResult<Self> {
        let mut reader = ByteReader::new(data);
        let magic = reader.u32()?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic(magic));
        }
        let minor_version = reader.u16()?;
        let major_version = reader.u16()?;
        let pool = ConstantPool::read(&mut reader)?;

        Ok(Self {
            data,
            minor_version,
            major_version,
            pool,
            pool_end: reader.pos(),
        })
    }

    /// Offset of the first byte after the constant pool (`access_flags`)
    pub fn pool_end(&self) -> usize {
        self.pool_end
    }

    /// Magic and version bytes, verbatim
    pub fn header(&self) -> &'a [u8] {
        &self.data[..HEADER_LEN]
    }

    /// Everything after the constant pool, verbatim
    pub fn trailer(&self) -> &'a [u8] {
        &self.data[self.pool_end..]
    }

    pub fn layout(&self) -> ClassFileResult<ClassLayout> {
        ClassLayout::read(self.data, self.pool_end)
    }
}

/// Attribute header; the body is only length-skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name_index: u16,
    pub length: u32,
}

/// `field_info` or `method_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

/// The part of a class file that follows the constant pool, reduced to the
/// indices that name things.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLayout {
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces_count: u16,
    pub fields: Vec<Member>,
    pub methods: Vec<Member>,
    pub attributes: Vec<AttributeInfo>,
}

impl ClassLayout {
    pub fn read(data: &[u8], pool_end: usize) -> ClassFileResult<Self> {
        let mut reader = ByteReader::at(data, pool_end);

        let access_flags = reader.u16()?;
        let this_class = reader.u16()?;
        let super_class = reader.u16()?;
        let interfaces_count = reader.u16()?;
        reader.skip(usize::from(interfaces_count) * 2)?;

        let fields = read_members(&mut reader)?;
        let methods = read_members(&mut reader)?;
        let attributes = read_attributes(&mut reader)?;

        Ok(Self {
            access_flags,
            this_class,
            super_class,
            interfaces_count,
            fields,
            methods,
            attributes,
        })
    }

    /// Every Utf8 index used as a field, method or attribute name
    pub fn name_indices(&self) -> impl Iterator<Item = u16> + '_ {
        let members = self.fields.iter().chain(&self.methods).flat_map(|member| {
            std::iter::once(member.name_index)
                .chain(member.attributes.iter().map(|attr| attr.name_index))
        });
        members.chain(self.attributes.iter().map(|attr| attr.name_index))
    }
}

fn read_members(reader: &mut ByteReader<'_>) -> ClassFileResult<Vec<Member>> {
    let count = reader.u16()?;
    (0..count)
        .map(|_| {
            Ok(Member {
                access_flags: reader.u16()?,
                name_index: reader.u16()?,
                descriptor_index: reader.u16()?,
                attributes: read_attributes(reader)?,
            })
        })
        .collect()
}

fn read_attributes(reader: &mut ByteReader<'_>) -> ClassFileResult<Vec<AttributeInfo>> {
    let count = reader.u16()?;
    (0..count)
        .map(|_| {
            let name_index = reader.u16()?;
            let length = reader.u32()?;
            reader.skip(length as usize)?;
            Ok(AttributeInfo { name_index, length })
        })
        .collect()
}
