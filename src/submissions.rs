#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use zip::ZipArchive;

/// An enum to represent structural problems with a categorize run, raised
/// before any file or folder is created
#[derive(thiserror::Error, Debug)]
pub enum InvalidInputError {
    /// The source path is neither a directory nor a readable zip archive
    #[error("source ({}) is not a directory nor a zip file", .path.display())]
    UnrecognizedSource {
        /// the offending source path
        path: PathBuf,
    },
    /// The destination path exists but is not a directory
    #[error("destination ({}) exists and is not a directory", .path.display())]
    DestinationNotADirectory {
        /// the offending destination path
        path: PathBuf,
    },
}

/// Invocation-scoped settings for a categorize run, constructed once by the
/// caller and passed down explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategorizeOptions {
    /// Extract archive members by file name only, dropping any
    /// archive-internal folders. The default keeps the archive's internal
    /// structure under the per-student folder.
    pub flatten_archive_paths: bool,
}

/// A batch of downloaded submission files, resolved once at entry so the
/// remaining steps dispatch on the variant instead of re-probing the
/// filesystem.
pub enum Source {
    /// Loose regular files in a directory; members are relocated by rename.
    Directory {
        /// Directory containing the batch.
        root: PathBuf,
    },
    /// Members of a zip archive; members are relocated by extraction. The
    /// variant owns the archive handle, so it is closed on every exit path.
    Archive {
        /// Path the archive was opened from, for error reporting.
        path:    PathBuf,
        /// The open archive.
        archive: ZipArchive<fs::File>,
    },
}

impl Source {
    /// Resolves `path` into a batch source. A directory wins; anything else
    /// must open as a valid zip archive, otherwise the run is rejected with
    /// [`InvalidInputError::UnrecognizedSource`].
    pub fn resolve(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(Self::Directory {
                root: path.to_path_buf(),
            });
        }

        let unrecognized = || InvalidInputError::UnrecognizedSource {
            path: path.to_path_buf(),
        };
        let file = fs::File::open(path).map_err(|_| unrecognized())?;
        let archive = ZipArchive::new(file).map_err(|_| unrecognized())?;

        Ok(Self::Archive {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Enumerates member file names of the batch: the archive's member list,
    /// or a non-recursive listing of the directory's regular files.
    /// Directory entries with non-UTF-8 names are logged and skipped.
    pub fn members(&self) -> Result<Vec<String>> {
        match self {
            Self::Directory { root } => {
                let listing = fs::read_dir(root)
                    .with_context(|| format!("Could not list {}", root.display()))?;

                let mut names = Vec::new();
                for entry in listing {
                    let entry =
                        entry.with_context(|| format!("Could not list {}", root.display()))?;
                    match entry.file_type() {
                        Ok(file_type) if file_type.is_file() => {}
                        Ok(_) => continue,
                        Err(e) => {
                            tracing::error!(
                                "Skipping {}: could not stat: {}",
                                entry.path().display(),
                                e
                            );
                            continue;
                        }
                    }
                    match entry.file_name().into_string() {
                        Ok(name) => names.push(name),
                        Err(name) => tracing::error!(
                            "Skipping {}: file name is not valid UTF-8",
                            name.to_string_lossy()
                        ),
                    }
                }
                Ok(names)
            }
            Self::Archive { archive, .. } => {
                Ok(archive.file_names().map(str::to_owned).collect())
            }
        }
    }

    /// Relocates one member into `target_dir`: a same-filesystem rename for
    /// directory batches, extraction for archive batches.
    fn relocate(
        &mut self,
        member: &str,
        target_dir: &Path,
        options: &CategorizeOptions,
    ) -> Result<()> {
        match self {
            Self::Directory { root } => {
                let from = root.join(member);
                let to = target_dir.join(member);
                fs::rename(&from, &to).with_context(|| {
                    format!("Could not move {} to {}", from.display(), to.display())
                })
            }
            Self::Archive { path, archive } => {
                let mut entry = archive.by_name(member).with_context(|| {
                    format!("Could not read member {member} of {}", path.display())
                })?;

                let relative = if options.flatten_archive_paths {
                    Path::new(entry.name()).file_name().map(PathBuf::from)
                } else {
                    entry.enclosed_name()
                };
                let Some(relative) = relative else {
                    anyhow::bail!(
                        "member {member} does not resolve to a path inside {}",
                        target_dir.display()
                    );
                };

                let to = target_dir.join(relative);
                if let Some(parent) = to.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Could not create {}", parent.display()))?;
                }
                let mut out = fs::File::create(&to)
                    .with_context(|| format!("Could not create {}", to.display()))?;
                io::copy(&mut entry, &mut out)
                    .with_context(|| format!("Could not extract {member} to {}", to.display()))?;
                Ok(())
            }
        }
    }
}

/// Derives the handle from a member name: everything before the first `_`,
/// or the whole name when there is no delimiter.
pub fn handle_of(name: &str) -> &str {
    name.split_once('_').map_or(name, |(handle, _)| handle)
}

/// Returns the distinct handles observed in a batch, in first-seen order.
///
/// Useful on its own when only the roster of handles is needed, e.g. to
/// check a download against the expected set of students.
pub fn unique_handles(source: &Path) -> Result<Vec<String>> {
    let batch = Source::resolve(source)?;
    let members = batch.members()?;

    Ok(members
        .iter()
        .map(|name| handle_of(name).to_owned())
        .unique()
        .collect())
}

/// Groups files from the same student together in a folder, with default
/// options (archive-internal paths preserved).
pub fn categorize(source: &Path, destination: &Path) -> Result<()> {
    categorize_with(source, destination, &CategorizeOptions::default())
}

/// Groups files from the same student together in a folder.
///
/// `source` is a directory of loose submission files or a zip archive as
/// downloaded from the LMS; `destination` gains one subdirectory per distinct
/// handle, created if absent and reused if present. Structural problems with
/// either path fail with [`InvalidInputError`] before anything is created. A
/// member that cannot be relocated is logged and skipped, and the rest of the
/// batch still completes; such files stay in their original location (or stay
/// unextracted).
pub fn categorize_with(
    source: &Path,
    destination: &Path,
    options: &CategorizeOptions,
) -> Result<()> {
    let mut batch = Source::resolve(source)?;

    if destination.exists() && !destination.is_dir() {
        return Err(InvalidInputError::DestinationNotADirectory {
            path: destination.to_path_buf(),
        }
        .into());
    }

    let members = batch.members()?;
    let handles: Vec<String> = members
        .iter()
        .map(|name| handle_of(name).to_owned())
        .unique()
        .collect();

    fs::create_dir_all(destination)
        .with_context(|| format!("Could not create {}", destination.display()))?;
    for handle in &handles {
        let handle_dir = destination.join(handle);
        fs::create_dir_all(&handle_dir)
            .with_context(|| format!("Could not create {}", handle_dir.display()))?;
    }

    for member in &members {
        tracing::info!("Processing {member}");
        let target_dir = destination.join(handle_of(member));
        if let Err(e) = batch.relocate(member, &target_dir, options) {
            tracing::error!("Skipping {member}: {e:#}");
        }
    }

    Ok(())
}
