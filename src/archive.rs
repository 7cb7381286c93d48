//! Chart archive extraction and shapefile discovery.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tar::Archive;
use thiserror::Error;
use walkdir::WalkDir;

use crate::scrape::ARCHIVE_SUFFIX;

pub const SHAPEFILE_SUFFIX: &str = ".shp";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ArchiveError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Unpack every `.tar` file directly inside `tar_dir` into `extract_dir`.
///
/// Archives are processed in file name order. Returns the archives unpacked.
pub fn extract_tar_files(tar_dir: &Path, extract_dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    fs::create_dir_all(extract_dir).map_err(ArchiveError::io(extract_dir))?;

    let mut archives = Vec::new();
    for entry in fs::read_dir(tar_dir).map_err(ArchiveError::io(tar_dir))? {
        let path = entry.map_err(ArchiveError::io(tar_dir))?.path();
        let is_tar = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(ARCHIVE_SUFFIX));
        if is_tar && path.is_file() {
            archives.push(path);
        }
    }
    archives.sort();

    for tar_path in &archives {
        tracing::info!("Extracting: {}", tar_path.display());
        let file = File::open(tar_path).map_err(ArchiveError::io(tar_path))?;
        Archive::new(file)
            .unpack(extract_dir)
            .map_err(ArchiveError::io(tar_path))?;
    }

    Ok(archives)
}

/// Every `.shp` file below `dir`, sorted by path.
pub fn find_shapefiles(dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(SHAPEFILE_SUFFIX)
        {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}
