//! Contains the sorted key-value store abstraction that holds the Hexaplex permutation indexes
//! and a directory-backed implementation of it.
//!
//! The primary trait in this module is the [SortedStore]. A table of the store is partitioned into
//! [Region]s by a sorted list of split points. Data is never written cell by cell. Instead, sorted
//! segment files (see [SegmentWriter]) are installed atomically with [SortedStore::bulk_load].

mod file_store;
mod merge;
mod segment;
mod splits;
mod store;

pub use file_store::FileStore;
pub use merge::MergingScan;
pub use segment::*;
pub use splits::*;
pub use store::*;
