use super::error::{ClassFileError, ClassFileResult};

/// Big-endian cursor over class file bytes.
///
/// Every read is bounds-checked and reports the offset it failed at, so a
/// truncated class turns into [`ClassFileError::Truncated`] instead of a panic.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn bytes(&mut self, len: usize) -> ClassFileResult<&'a [u8]> {
        let slice = self
            .pos
            .checked_add(len)
            .and_then(|end| self.data.get(self.pos..end))
            .ok_or(ClassFileError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.data.len().saturating_sub(self.pos),
            })?;
        self.pos += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> ClassFileResult<()> {
        self.bytes(len).map(|_| ())
    }

    pub fn u8(&mut self) -> ClassFileResult<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub fn u16(&mut self) -> ClassFileResult<u16> {
        self.array().map(u16::from_be_bytes)
    }

    pub fn u32(&mut self) -> ClassFileResult<u32> {
        self.array().map(u32::from_be_bytes)
    }

    pub fn u64(&mut self) -> ClassFileResult<u64> {
        self.array().map(u64::from_be_bytes)
    }

    fn array<const N: usize>(&mut self) -> ClassFileResult<[u8; N]> {
        let bytes = self.bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
