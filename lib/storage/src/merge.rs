use crate::{Cell, ScannedRow, SegmentReader};
use hexaplex_encoding::{IndexRecord, RecordKind};
use hexaplex_model::StorageError;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Merges the records of multiple sorted segments into a stream of rows.
///
/// Only the newest version of each cell is kept. A cell whose newest version is a tombstone is
/// dropped, as are rows without any remaining cell.
pub struct MergingScan {
    sources: Vec<SegmentReader>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    started: bool,
    done: bool,
    peeked: Option<IndexRecord>,
    last_cell: Option<(Vec<u8>, Vec<u8>)>,
}

struct HeapEntry {
    record: IndexRecord,
    source: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.record
            .cmp(&other.record)
            .then_with(|| self.source.cmp(&other.source))
    }
}

impl MergingScan {
    pub fn new(sources: Vec<SegmentReader>) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(sources.len()),
            sources,
            started: false,
            done: false,
            peeked: None,
            last_cell: None,
        }
    }

    fn pull(&mut self, source: usize) -> Result<(), StorageError> {
        if let Some(record) = self.sources[source].next().transpose()? {
            self.heap.push(Reverse(HeapEntry { record, source }));
        }
        Ok(())
    }

    fn next_record(&mut self) -> Result<Option<IndexRecord>, StorageError> {
        if !self.started {
            self.started = true;
            for source in 0..self.sources.len() {
                self.pull(source)?;
            }
        }
        let Some(Reverse(entry)) = self.heap.pop() else {
            return Ok(None);
        };
        self.pull(entry.source)?;
        Ok(Some(entry.record))
    }

    fn is_older_version(&self, record: &IndexRecord) -> bool {
        self.last_cell
            .as_ref()
            .is_some_and(|(row, qualifier)| *row == record.row && *qualifier == record.qualifier)
    }
}

impl Iterator for MergingScan {
    type Item = Result<ScannedRow, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut current: Option<ScannedRow> = None;
        loop {
            let record = match self.peeked.take() {
                Some(record) => record,
                None => match self.next_record() {
                    Ok(Some(record)) => record,
                    Ok(None) => {
                        self.done = true;
                        return current.map(Ok);
                    }
                    Err(error) => {
                        self.done = true;
                        return Some(Err(error));
                    }
                },
            };

            if self.is_older_version(&record) {
                continue;
            }
            if current.as_ref().is_some_and(|row| row.key != record.row) {
                self.peeked = Some(record);
                return current.map(Ok);
            }

            self.last_cell = Some((record.row.clone(), record.qualifier.clone()));
            if record.kind == RecordKind::Delete {
                continue;
            }

            let cell = Cell {
                qualifier: record.qualifier,
                timestamp: record.timestamp,
            };
            match &mut current {
                Some(row) => row.cells.push(cell),
                None => {
                    current = Some(ScannedRow {
                        key: record.row,
                        cells: vec![cell],
                    })
                }
            }
        }
    }
}
