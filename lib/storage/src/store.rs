use crate::{compute_split_points, InvalidSplitBitsError};
use hexaplex_model::StorageError;
use std::fmt::Debug;
use std::path::PathBuf;

/// A live cell of a row, as returned by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub qualifier: Vec<u8>,
    /// Epoch milliseconds of the newest version.
    pub timestamp: u64,
}

/// A row and all of its live cells, as returned by a scan.
///
/// Only the newest version of each qualifier is returned. Cells hidden by a tombstone are omitted.
/// Cells are sorted by qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRow {
    pub key: Vec<u8>,
    pub cells: Vec<Cell>,
}

/// A contiguous range of row keys of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    /// The position of the region within the table.
    pub index: usize,
    /// The inclusive start key. An empty key is the start of the table.
    pub start: Vec<u8>,
    /// The exclusive end key. [None] is the end of the table.
    pub end: Option<Vec<u8>>,
}

impl Region {
    /// Builds the regions delimited by the given sorted `split_points`.
    pub fn from_split_points(split_points: &[Vec<u8>]) -> Vec<Region> {
        let mut regions = Vec::with_capacity(split_points.len() + 1);
        let mut start = Vec::new();
        for (index, split) in split_points.iter().enumerate() {
            regions.push(Region {
                index,
                start,
                end: Some(split.clone()),
            });
            start = split.clone();
        }
        regions.push(Region {
            index: split_points.len(),
            start,
            end: None,
        });
        regions
    }

    /// Returns true if `row` falls into this region.
    pub fn contains(&self, row: &[u8]) -> bool {
        row >= self.start.as_slice()
            && self
                .end
                .as_ref()
                .map_or(true, |end| row < end.as_slice())
    }
}

/// Returns the index of the region that holds `row`.
pub fn region_index(split_points: &[Vec<u8>], row: &[u8]) -> usize {
    split_points.partition_point(|split| split.as_slice() <= row)
}

/// A stream of rows in key order.
pub type RowScan = Box<dyn Iterator<Item = Result<ScannedRow, StorageError>> + Send>;

/// A range-partitioned, sorted key-value store holding multi-version cells.
///
/// Implementations must guarantee that [SortedStore::scan] returns rows in lexicographic key order
/// and that [SortedStore::bulk_load] is atomic.
pub trait SortedStore: Debug + Send + Sync {
    /// Returns true if the `table` exists.
    fn table_exists(&self, table: &str) -> Result<bool, StorageError>;

    /// Creates an empty `table` whose regions are delimited by the sorted `split_points`.
    fn create_table(&self, table: &str, split_points: &[Vec<u8>]) -> Result<(), StorageError>;

    /// Returns the regions of the `table` in key order.
    fn regions(&self, table: &str) -> Result<Vec<Region>, StorageError>;

    /// Removes all data of the `table`. The region boundaries are kept.
    fn truncate(&self, table: &str) -> Result<(), StorageError>;

    /// Installs the given sorted segment files into the `table`.
    ///
    /// Each segment must fall into a single region. Either all segments become visible or none.
    /// Returns the number of loaded records.
    fn bulk_load(&self, table: &str, segments: &[PathBuf]) -> Result<u64, StorageError>;

    /// Scans all rows of the given `region` of the `table`.
    fn scan(&self, table: &str, region: &Region) -> Result<RowScan, StorageError>;
}

/// An error raised while preparing the target table of a bulk load.
#[derive(Debug, thiserror::Error)]
pub enum PrepareTableError {
    #[error(transparent)]
    InvalidSplitBits(#[from] InvalidSplitBitsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Returns the regions of the `table`, creating the table with pre-split regions if it does not
/// exist yet.
pub fn get_or_create_table(
    store: &dyn SortedStore,
    table: &str,
    split_bits: u8,
) -> Result<Vec<Region>, PrepareTableError> {
    if !store.table_exists(table)? {
        let split_points = compute_split_points(split_bits)?;
        tracing::info!(
            table,
            split_bits,
            regions = split_points.len() + 1,
            "Creating table"
        );
        store.create_table(table, &split_points)?;
    }
    Ok(store.regions(table)?)
}
