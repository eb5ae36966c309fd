use std::{
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    ops::ControlFlow,
    path::Path,
};

use anyhow::Context;
use zip::ZipArchive;

use crate::jar::types::{archive::is_class_name, ArchiveEntry};

pub fn open_jar(path: impl AsRef<Path>) -> anyhow::Result<ZipArchive<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Not a readable jar: {}", path.display()))
}

const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];
const EOCD_LEN: usize = 22;

/// Entry count declared by the end of central directory record.
///
/// `ZipArchive` keys entries by name, so this exceeds `zip.len()` when names
/// repeat. `None` when the record is missing or defers to zip64.
pub fn declared_entry_count(path: impl AsRef<Path>) -> io::Result<Option<u64>> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let tail_len = file_len.min((EOCD_LEN + usize::from(u16::MAX)) as u64);
    file.seek(SeekFrom::Start(file_len - tail_len))?;
    let mut tail = Vec::with_capacity(tail_len as usize);
    file.read_to_end(&mut tail)?;

    let Some(start) = tail.windows(4).rposition(|window| window == EOCD_SIGNATURE) else {
        return Ok(None);
    };
    let record = &tail[start..];
    if record.len() < EOCD_LEN {
        return Ok(None);
    }
    match u16::from_le_bytes([record[10], record[11]]) {
        u16::MAX => Ok(None),
        total => Ok(Some(u64::from(total))),
    }
}

/// Feed every class entry of `zip` to `visit`, in archive order.
pub fn visit_classes<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    mut visit: impl FnMut(ArchiveEntry) -> ControlFlow<()>,
) -> anyhow::Result<()> {
    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        if file.is_dir() || !is_class_name(file.name()) {
            continue;
        }

        let name = file.name().to_owned();
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)
            .with_context(|| format!("Failed to read {name}"))?;
        drop(file);

        if visit(ArchiveEntry { name, data }).is_break() {
            break;
        }
    }

    Ok(())
}
