use std::{collections::BTreeMap, ops::ControlFlow, path::Path};

use tracing::debug;

use crate::jar::{
    analysis::classifier::classify,
    core::{mutf8, ClassFile, ClassFileResult, Constant},
    io::reader::{open_jar, visit_classes},
    types::RewriteOptions,
};

/// Decoded text of every translatable slot, by ascending pool index.
pub fn literal_strings(data: &[u8], options: &RewriteOptions) -> ClassFileResult<Vec<String>> {
    let class = ClassFile::parse(data)?;
    let classification = classify(&class, options)?;

    Ok(classification
        .translatable()
        .into_iter()
        .filter_map(|index| class.pool.utf8(index))
        .map(mutf8::decode)
        .collect())
}

/// Every Utf8 constant of a class, identifiers included.
pub fn utf8_strings(data: &[u8]) -> ClassFileResult<Vec<(u16, String)>> {
    let class = ClassFile::parse(data)?;
    Ok(class
        .pool
        .iter()
        .filter_map(|(index, constant)| match *constant {
            Constant::Utf8(raw) => Some((index, mutf8::decode(raw))),
            _ => None,
        })
        .collect())
}

/// Translatable literals of each class entry in `jar`.
///
/// Classes that fail to parse are left out.
pub fn archive_literals(
    jar: impl AsRef<Path>,
    options: &RewriteOptions,
) -> anyhow::Result<BTreeMap<String, Vec<String>>> {
    let mut zip = open_jar(jar)?;
    let mut literals = BTreeMap::new();

    visit_classes(&mut zip, |entry| {
        match literal_strings(&entry.data, options) {
            Ok(strings) if !strings.is_empty() => {
                literals.insert(entry.name, strings);
            }
            Ok(_) => {}
            Err(err) => debug!("Skipping {}: {}", entry.name, err),
        }
        ControlFlow::Continue(())
    })?;

    Ok(literals)
}

/// First class entry holding a Utf8 constant that contains `needle`.
pub fn archive_contains(jar: impl AsRef<Path>, needle: &str) -> anyhow::Result<Option<String>> {
    let mut zip = open_jar(jar)?;
    let mut found = None;

    visit_classes(&mut zip, |entry| {
        let Ok(strings) = utf8_strings(&entry.data) else {
            debug!("Skipping unparseable {}", entry.name);
            return ControlFlow::Continue(());
        };
        if strings.iter().any(|(_, text)| text.contains(needle)) {
            found = Some(entry.name);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    })?;

    Ok(found)
}
