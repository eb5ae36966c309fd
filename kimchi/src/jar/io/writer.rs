use std::{
    fs,
    io::{self, BufWriter, Read, Seek, Write},
    path::Path,
};

use anyhow::Context;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::{
    jar::{
        core::ClassFileError,
        io::reader::{declared_entry_count, open_jar},
        modification::{rebuild, ExclusionSet},
        types::{archive::is_class_name, ArchiveEntry, PatchStats, RewriteOptions, TranslationMap},
    },
    types::{ProcessingEvent, Stage, StageProgress},
};

/// What happened to one class entry
#[derive(Debug)]
pub enum ClassOutcome {
    Blocked,
    Patched(Vec<u8>),
    Unchanged,
    Failed(ClassFileError),
}

/// Decide the fate of a single class entry.
///
/// `translations` is used as given; callers strip blocked strings first
/// (see [`ExclusionSet::effective_translations`]).
pub fn process_class(
    entry: &ArchiveEntry,
    translations: &TranslationMap,
    exclusions: &ExclusionSet,
    options: &RewriteOptions,
) -> ClassOutcome {
    if exclusions.is_blocked_class(&entry.name) {
        return ClassOutcome::Blocked;
    }

    match rebuild(&entry.data, translations, options) {
        Ok(Some(patched)) => ClassOutcome::Patched(patched),
        Ok(None) => ClassOutcome::Unchanged,
        Err(err) => ClassOutcome::Failed(err),
    }
}

/// Translate every class of `jar_in` into `jar_out`.
///
/// The output is assembled in a temporary file next to `jar_out` and moved
/// over it only once complete, so `jar_in` and `jar_out` may be the same
/// path. On error nothing is left behind and an existing `jar_out` is not
/// touched.
pub fn patch_jar(
    jar_in: impl AsRef<Path>,
    jar_out: impl AsRef<Path>,
    translations: &TranslationMap,
    exclusions: &ExclusionSet,
    options: &RewriteOptions,
    mut report_progress: impl FnMut(ProcessingEvent),
) -> anyhow::Result<PatchStats> {
    let jar_in = jar_in.as_ref();
    let jar_out = jar_out.as_ref();

    report_progress(Stage::OpeningJar.into());
    let mut zip = open_jar(jar_in)?;
    if let Some(declared) = declared_entry_count(jar_in)? {
        let declared = declared as usize;
        if declared > zip.len() {
            warn!(
                "{} entries of {} repeat an earlier name, only the last copy of each is kept",
                declared - zip.len(),
                jar_in.display()
            );
        }
    }

    let effective = exclusions.effective_translations(translations);
    let removed = translations.len() - effective.len();
    if removed > 0 {
        info!("Excluded {} blocked strings from translation", removed);
    }

    let out_dir = match jar_out.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let tmp = NamedTempFile::new_in(out_dir)
        .with_context(|| format!("Failed to create temporary file in {}", out_dir.display()))?;

    let mut writer = ZipWriter::new(BufWriter::new(tmp));
    let stats = rewrite_entries(
        &mut zip,
        &mut writer,
        &effective,
        exclusions,
        options,
        &mut report_progress,
    )?;

    report_progress(Stage::Committing.into());
    let tmp = writer
        .finish()?
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    // release the source before it may get replaced
    drop(zip);

    tmp.as_file().sync_all()?;
    let permissions = fs::metadata(jar_in)?.permissions();
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(jar_out)
        .with_context(|| format!("Failed to write {}", jar_out.display()))?;

    info!(
        "Processed {} classes: {} patched, {} unchanged, {} errors",
        stats.total,
        stats.patched,
        stats.unchanged(),
        stats.errors
    );
    report_progress(ProcessingEvent {
        stage: Stage::Committing,
        progress: StageProgress::Done,
    });

    Ok(stats)
}

fn rewrite_entries<R: Read + Seek, W: Write + Seek>(
    zip: &mut ZipArchive<R>,
    writer: &mut ZipWriter<W>,
    translations: &TranslationMap,
    exclusions: &ExclusionSet,
    options: &RewriteOptions,
    report_progress: &mut impl FnMut(ProcessingEvent),
) -> anyhow::Result<PatchStats> {
    let mut stats = PatchStats::default();
    let entry_count = zip.len();

    for i in 0..entry_count {
        report_progress(ProcessingEvent {
            stage: Stage::RewritingClasses,
            progress: StageProgress::Percentage(i as f32 / entry_count as f32),
        });

        let raw = zip.by_index_raw(i)?;
        if raw.is_dir() || !is_class_name(raw.name()) {
            writer.raw_copy_file(raw)?;
            continue;
        }
        drop(raw);

        let mut file = zip.by_index(i)?;
        let name = file.name().to_owned();
        let compression = file.compression();
        let last_modified = file.last_modified();
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)
            .with_context(|| format!("Failed to read {name}"))?;
        drop(file);

        let entry = ArchiveEntry { name, data };
        stats.total += 1;

        match process_class(&entry, translations, exclusions, options) {
            ClassOutcome::Patched(patched) => {
                let method = match compression {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                };
                let mut file_options = SimpleFileOptions::default().compression_method(method);
                if let Some(modified) = last_modified {
                    file_options = file_options.last_modified_time(modified);
                }
                writer.start_file(entry.name.as_str(), file_options)?;
                writer.write_all(&patched)?;
                stats.patched += 1;
                continue;
            }
            ClassOutcome::Unchanged => {}
            ClassOutcome::Blocked => debug!("Skipping blocked class {}", entry.name),
            ClassOutcome::Failed(err) => {
                warn!("Leaving {} as is: {}", entry.name, err);
                stats.errors += 1;
            }
        }
        writer.raw_copy_file(zip.by_index_raw(i)?)?;
    }

    report_progress(ProcessingEvent {
        stage: Stage::RewritingClasses,
        progress: StageProgress::Done,
    });

    Ok(stats)
}
