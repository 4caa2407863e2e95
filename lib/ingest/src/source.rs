use crate::format::{format_for_extension, supported_extensions};
use crate::{Compression, IngestError};
use itertools::Itertools;
use oxrdfio::RdfFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// An RDF source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// The absolute path of the file.
    pub path: PathBuf,
    /// The size of the file on disk in bytes.
    pub size: u64,
    pub format: RdfFormat,
    pub compression: Compression,
}

impl SourceFile {
    /// Classifies the file at `path` by its name.
    ///
    /// Returns [None] for files without a registered serialization and an error for files
    /// compressed with an unsupported codec.
    fn classify(path: &Path, size: u64) -> Result<Option<Self>, IngestError> {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return Ok(None);
        };
        let (compression, stem) = Compression::detect(file_name).map_err(|suffix| {
            IngestError::configuration(format!(
                "Unsupported compression '.{suffix}' of source file {}",
                path.display()
            ))
        })?;
        let Some(format) = Path::new(stem)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(format_for_extension)
        else {
            return Ok(None);
        };
        Ok(Some(Self {
            path: path.to_path_buf(),
            size,
            format,
            compression,
        }))
    }
}

/// A group of whole source files processed together by a single producer/consumer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub index: usize,
    pub files: Vec<SourceFile>,
}

impl WorkUnit {
    /// Returns the total size of all files of this unit.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|file| file.size).sum()
    }
}

/// Resolves a comma-delimited list of files and directories into the contained source files.
///
/// Directories are walked recursively. Only files with a registered serialization are returned,
/// sorted by path.
pub fn discover_sources(sources: &str) -> Result<Vec<SourceFile>, IngestError> {
    let mut files = Vec::new();
    for source in sources.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let path = fs::canonicalize(source).map_err(|error| {
            IngestError::configuration(format!("Source path {source} is not accessible: {error}"))
        })?;
        collect_files(path, &mut files)?;
    }
    if files.is_empty() {
        return Err(IngestError::configuration(format!(
            "No source files found in '{sources}'. Supported extensions: {}",
            supported_extensions().join(", ")
        )));
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}

fn collect_files(path: PathBuf, files: &mut Vec<SourceFile>) -> Result<(), IngestError> {
    let metadata = fs::metadata(&path)?;
    if metadata.is_dir() {
        for entry in fs::read_dir(&path)? {
            collect_files(entry?.path(), files)?;
        }
    } else if let Some(file) = SourceFile::classify(&path, metadata.len())? {
        files.push(file);
    } else {
        tracing::debug!(path = %path.display(), "Ignoring file without a supported extension");
    }
    Ok(())
}

/// Groups the sorted `files` into work units of at most `max_split_size` bytes.
///
/// Files are never split. A file larger than `max_split_size` forms a unit of its own.
pub fn plan_work_units(files: Vec<SourceFile>, max_split_size: u64) -> Vec<WorkUnit> {
    let mut units = Vec::new();
    let mut current = Vec::new();
    let mut current_size = 0;
    for file in files {
        if !current.is_empty() && current_size + file.size > max_split_size {
            units.push(std::mem::take(&mut current));
            current_size = 0;
        }
        current_size += file.size;
        current.push(file);
    }
    if !current.is_empty() {
        units.push(current);
    }

    units
        .into_iter()
        .enumerate()
        .map(|(index, files)| WorkUnit { index, files })
        .collect()
}
