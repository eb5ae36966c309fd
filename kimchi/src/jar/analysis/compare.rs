use std::{collections::BTreeMap, ops::ControlFlow, path::Path};

use tracing::info;

use crate::jar::{
    io::reader::{open_jar, visit_classes},
    types::JarDiff,
};

/// MD5 of each class entry's uncompressed bytes, by entry name.
pub fn class_digests(jar: impl AsRef<Path>) -> anyhow::Result<BTreeMap<String, md5::Digest>> {
    let mut zip = open_jar(jar)?;
    let mut digests = BTreeMap::new();

    visit_classes(&mut zip, |entry| {
        digests.insert(entry.name, md5::compute(&entry.data));
        ControlFlow::Continue(())
    })?;

    Ok(digests)
}

pub fn compare_jars(old: impl AsRef<Path>, new: impl AsRef<Path>) -> anyhow::Result<JarDiff> {
    let old = class_digests(old)?;
    let mut new = class_digests(new)?;
    let mut diff = JarDiff::default();

    for (name, digest) in old {
        match new.remove(&name) {
            Some(other) if other != digest => diff.changed.push(name),
            Some(_) => {}
            None => diff.removed.push(name),
        }
    }
    diff.added.extend(new.into_keys());

    info!(
        "{} changed, {} removed, {} added",
        diff.changed.len(),
        diff.removed.len(),
        diff.added.len()
    );

    Ok(diff)
}
