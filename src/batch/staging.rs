//! Output staging and delivery
//!
//! The destination directory is recreated for every batch. To avoid
//! partially-cleared states on a crash, outputs are written into a staging
//! directory next to the destination and swapped in with a rename once the
//! batch finishes; the old destination is only removed at commit time.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{RevidError, RevidResult};

/// A staged output directory, swapped into place on commit
pub struct StagedOutput {
    staging: Option<TempDir>,
    destination: PathBuf,
}

impl StagedOutput {
    /// Create a staging directory alongside the eventual destination
    pub fn begin(destination: &Path) -> RevidResult<Self> {
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;
        let staging = tempfile::Builder::new()
            .prefix(".revid-staging-")
            .tempdir_in(&parent)?;
        debug!("Staging outputs in {}", staging.path().display());
        Ok(Self {
            staging: Some(staging),
            destination: destination.to_path_buf(),
        })
    }

    /// Directory transform outputs should be written into
    pub fn path(&self) -> &Path {
        self.staging
            .as_ref()
            .map(TempDir::path)
            .unwrap_or_else(|| self.destination.as_path())
    }

    /// Replace the destination with the staged contents.
    ///
    /// The prior destination contents are deleted unconditionally, but only
    /// after the whole batch has finished writing into the staging area.
    pub fn commit(mut self) -> RevidResult<PathBuf> {
        let staging = self.staging.take().ok_or_else(|| RevidError::Staging {
            message: "Staging directory already committed".to_string(),
        })?;
        let staged_path = staging.into_path();
        if self.destination.exists() {
            std::fs::remove_dir_all(&self.destination)?;
        }
        std::fs::rename(&staged_path, &self.destination)?;
        info!("Delivered outputs to {}", self.destination.display());
        Ok(self.destination.clone())
    }
}

/// Bundle every file in `dir` into a flat zip archive at `archive_path`
pub fn archive_outputs(dir: &Path, archive_path: &Path) -> RevidResult<()> {
    let file = File::create(archive_path)?;
    let mut writer = ZipWriter::new(file);

    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        writer
            .start_file(name, SimpleFileOptions::default())
            .map_err(|e| RevidError::Staging {
                message: format!("zip entry failed: {}", e),
            })?;
        let mut source = File::open(entry.path())?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish().map_err(|e| RevidError::Staging {
        message: format!("zip finalize failed: {}", e),
    })?;
    info!("Archived outputs to {}", archive_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_swaps_staged_contents_into_place() {
        let root = tempfile::tempdir().unwrap();
        let destination = root.path().join("treated");

        // Pre-existing destination contents must be gone after commit
        std::fs::create_dir_all(&destination).unwrap();
        std::fs::write(destination.join("stale.mp4"), b"old").unwrap();

        let staged = StagedOutput::begin(&destination).unwrap();
        std::fs::write(staged.path().join("tt_new.mp4"), b"new").unwrap();
        let delivered = staged.commit().unwrap();

        assert_eq!(delivered, destination);
        assert!(destination.join("tt_new.mp4").is_file());
        assert!(!destination.join("stale.mp4").exists());
    }

    #[test]
    fn uncommitted_staging_is_cleaned_up() {
        let root = tempfile::tempdir().unwrap();
        let destination = root.path().join("treated");
        let staging_path;
        {
            let staged = StagedOutput::begin(&destination).unwrap();
            staging_path = staged.path().to_path_buf();
            std::fs::write(staging_path.join("tt_partial.mp4"), b"partial").unwrap();
        }
        assert!(!staging_path.exists());
        assert!(!destination.exists());
    }

    #[test]
    fn archive_contains_delivered_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("treated");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tt_a.mp4"), b"a").unwrap();
        std::fs::write(dir.join("tt_b.mp4"), b"b").unwrap();

        let archive_path = root.path().join("processed_videos.zip");
        archive_outputs(&dir, &archive_path).unwrap();

        let archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(names, vec!["tt_a.mp4", "tt_b.mp4"]);
    }
}
