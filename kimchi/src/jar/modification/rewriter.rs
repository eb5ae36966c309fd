use tracing::debug;

use crate::jar::{
    analysis::classifier::classify,
    core::{
        mutf8::{self, MAX_UTF8_LEN},
        ClassFile, ClassFileError, ClassFileResult, Constant,
    },
    types::{RewriteOptions, TranslationMap},
};

/// Replace translatable string literals of a class file.
///
/// Returns `Ok(None)` when nothing would change; callers must then keep the
/// original bytes. Otherwise the constant pool is re-emitted slot for slot
/// (same count, same tags, only `Utf8` payloads differ) between the original
/// header and the original trailing bytes.
pub fn rebuild(
    data: &[u8],
    translations: &TranslationMap,
    options: &RewriteOptions,
) -> ClassFileResult<Option<Vec<u8>>> {
    let class = ClassFile::parse(data)?;
    let classification = classify(&class, options)?;
    if !classification.has_translatable() {
        return Ok(None);
    }

    let mut pool = Vec::with_capacity(class.pool_end());
    let mut replaced = 0usize;

    for (index, constant) in class.pool.iter() {
        if let Constant::Utf8(raw) = *constant {
            if classification.is_translatable(index) {
                let text = mutf8::decode(raw);
                if let Some(replacement) = translations.get(&text) {
                    let encoded = mutf8::encode(replacement);
                    if encoded.len() > MAX_UTF8_LEN {
                        return Err(ClassFileError::ReplacementTooLong {
                            index,
                            len: encoded.len(),
                        });
                    }
                    if encoded != raw {
                        debug!("#{}: {:?} -> {:?}", index, text, replacement);
                        Constant::Utf8(&encoded).write_to(&mut pool)?;
                        replaced += 1;
                        continue;
                    }
                }
            }
        }
        constant.write_to(&mut pool)?;
    }

    if replaced == 0 {
        return Ok(None);
    }

    let header = class.header();
    let trailer = class.trailer();
    let mut out = Vec::with_capacity(header.len() + 2 + pool.len() + trailer.len());
    out.extend_from_slice(header);
    out.extend_from_slice(&class.pool.count().to_be_bytes());
    out.extend_from_slice(&pool);
    out.extend_from_slice(trailer);

    Ok(Some(out))
}
