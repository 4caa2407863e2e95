use crate::{region_index, MergingScan, Region, RowScan, SegmentReader, SortedStore, SEGMENT_EXTENSION};
use hexaplex_model::{CorruptionError, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const MANIFEST_FILE: &str = "manifest.json";
const MANIFEST_TMP_FILE: &str = "manifest.json.tmp";
const SEGMENTS_DIR: &str = "segments";

/// A [SortedStore] that keeps every table in a directory below a root directory.
///
/// A table consists of a `manifest.json` that lists the region boundaries and the segment files
/// of each region, and a `segments` directory that holds these files. A table name like `ns:name`
/// is stored in the directory `ns/name`.
///
/// Mutations replace the manifest atomically. Readers therefore either see the state before or
/// after a bulk load.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    /// Hex encoded region boundaries.
    split_points: Vec<String>,
    /// Segment file names per region.
    regions: Vec<Vec<String>>,
    next_segment: u64,
}

impl Manifest {
    fn new(split_points: &[Vec<u8>]) -> Self {
        Self {
            split_points: split_points.iter().map(hex::encode).collect(),
            regions: vec![Vec::new(); split_points.len() + 1],
            next_segment: 0,
        }
    }

    fn split_points(&self) -> Result<Vec<Vec<u8>>, CorruptionError> {
        let split_points = self
            .split_points
            .iter()
            .map(|split| hex::decode(split).map_err(CorruptionError::new))
            .collect::<Result<Vec<_>, _>>()?;
        if split_points.len() + 1 != self.regions.len() {
            return Err(CorruptionError::msg(format!(
                "Manifest lists {} split points but {} regions",
                split_points.len(),
                self.regions.len()
            )));
        }
        if split_points.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(CorruptionError::msg("Manifest split points are not sorted"));
        }
        Ok(split_points)
    }
}

impl FileStore {
    /// Opens the store rooted at `root`. The directory is created on the first table creation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory that holds the given `table`.
    pub fn table_dir(&self, table: &str) -> Result<PathBuf, StorageError> {
        validate_table_name(table)?;
        Ok(table
            .split(':')
            .fold(self.root.clone(), |dir, part| dir.join(part)))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock
            .lock()
            .map_err(|_| StorageError::msg("The store lock is poisoned"))
    }

    fn read_manifest(&self, table: &str, dir: &Path) -> Result<Manifest, StorageError> {
        let content = match fs::read(dir.join(MANIFEST_FILE)) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::TableNotFound(table.to_owned()))
            }
            Err(error) => return Err(error.into()),
        };
        serde_json::from_slice(&content).map_err(|e| CorruptionError::new(e).into())
    }

    fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<(), StorageError> {
        let tmp_path = dir.join(MANIFEST_TMP_FILE);
        let content = serde_json::to_vec_pretty(manifest).map_err(io::Error::from)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&content)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, dir.join(MANIFEST_FILE))?;
        Ok(())
    }
}

impl SortedStore for FileStore {
    fn table_exists(&self, table: &str) -> Result<bool, StorageError> {
        Ok(self.table_dir(table)?.join(MANIFEST_FILE).is_file())
    }

    fn create_table(&self, table: &str, split_points: &[Vec<u8>]) -> Result<(), StorageError> {
        if split_points.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(StorageError::msg("Split points must be strictly increasing"));
        }
        let _guard = self.lock()?;
        let dir = self.table_dir(table)?;
        if dir.join(MANIFEST_FILE).exists() {
            return Err(StorageError::msg(format!("Table '{table}' already exists")));
        }
        fs::create_dir_all(dir.join(SEGMENTS_DIR))?;
        Self::write_manifest(&dir, &Manifest::new(split_points))
    }

    fn regions(&self, table: &str) -> Result<Vec<Region>, StorageError> {
        let dir = self.table_dir(table)?;
        let manifest = self.read_manifest(table, &dir)?;
        Ok(Region::from_split_points(&manifest.split_points()?))
    }

    fn truncate(&self, table: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        let dir = self.table_dir(table)?;
        let mut manifest = self.read_manifest(table, &dir)?;
        let obsolete = manifest
            .regions
            .iter_mut()
            .flat_map(std::mem::take)
            .collect::<Vec<_>>();
        Self::write_manifest(&dir, &manifest)?;

        let segments_dir = dir.join(SEGMENTS_DIR);
        for name in &obsolete {
            if let Err(error) = fs::remove_file(segments_dir.join(name)) {
                tracing::warn!(table, segment = name, %error, "Failed to remove truncated segment");
            }
        }
        tracing::info!(table, segments = obsolete.len(), "Truncated table");
        Ok(())
    }

    fn bulk_load(&self, table: &str, segments: &[PathBuf]) -> Result<u64, StorageError> {
        let _guard = self.lock()?;
        let dir = self.table_dir(table)?;
        let mut manifest = self.read_manifest(table, &dir)?;
        let split_points = manifest.split_points()?;

        let mut placements = Vec::with_capacity(segments.len());
        for path in segments {
            let info = SegmentReader::open(path)?.info().clone();
            if info.record_count == 0 {
                continue;
            }
            let region = region_index(&split_points, &info.first_row);
            if region_index(&split_points, &info.last_row) != region {
                return Err(StorageError::msg(format!(
                    "Segment {} spans more than one region of table '{table}'",
                    path.display()
                )));
            }
            placements.push((region, info));
        }

        let segments_dir = dir.join(SEGMENTS_DIR);
        let mut installed = Vec::with_capacity(placements.len());
        let mut loaded = 0;
        for (region, info) in placements {
            let name = format!("{:010}.{SEGMENT_EXTENSION}", manifest.next_segment);
            manifest.next_segment += 1;
            let target = segments_dir.join(&name);
            if let Err(error) = move_file(&info.path, &target) {
                restore_files(&installed);
                return Err(error.into());
            }
            installed.push((info.path, target));
            manifest.regions[region].push(name);
            loaded += info.record_count;
        }

        if let Err(error) = Self::write_manifest(&dir, &manifest) {
            restore_files(&installed);
            return Err(error);
        }
        tracing::info!(
            table,
            segments = installed.len(),
            records = loaded,
            "Bulk load completed"
        );
        Ok(loaded)
    }

    fn scan(&self, table: &str, region: &Region) -> Result<RowScan, StorageError> {
        let dir = self.table_dir(table)?;
        let manifest = self.read_manifest(table, &dir)?;
        let names = manifest.regions.get(region.index).ok_or_else(|| {
            StorageError::msg(format!(
                "Table '{table}' has no region with index {}",
                region.index
            ))
        })?;
        let segments_dir = dir.join(SEGMENTS_DIR);
        let readers = names
            .iter()
            .map(|name| SegmentReader::open(segments_dir.join(name)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(MergingScan::new(readers)))
    }
}

/// Table names consist of ASCII alphanumerics and `_-.` characters, optionally separated into a
/// namespace by `:`.
fn validate_table_name(table: &str) -> Result<(), StorageError> {
    let valid_part = |part: &str| {
        !part.is_empty()
            && !part.starts_with('.')
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    };
    if table.split(':').all(valid_part) {
        Ok(())
    } else {
        Err(StorageError::msg(format!("Invalid table name '{table}'")))
    }
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Moves installed segments back to where they were loaded from, so the load can be retried.
fn restore_files(installed: &[(PathBuf, PathBuf)]) {
    for (source, target) in installed {
        if let Err(error) = move_file(target, source) {
            tracing::warn!(
                segment = %source.display(),
                %error,
                "Failed to roll back installed segment"
            );
        }
    }
}
