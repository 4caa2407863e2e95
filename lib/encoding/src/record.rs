use std::cmp::Ordering;

/// The type of an [IndexRecord].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Adds a cell.
    Put,
    /// A tombstone that hides all versions of the cell up to its timestamp.
    Delete,
}

impl RecordKind {
    pub fn to_byte(self) -> u8 {
        match self {
            RecordKind::Put => 0,
            RecordKind::Delete => 1,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(RecordKind::Put),
            1 => Some(RecordKind::Delete),
            _ => None,
        }
    }
}

/// A single versioned cell of the store, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexRecord {
    pub row: Vec<u8>,
    pub qualifier: Vec<u8>,
    /// Epoch milliseconds.
    pub timestamp: u64,
    pub kind: RecordKind,
}

impl IndexRecord {
    /// The number of bytes this record occupies in memory, approximately.
    pub fn size(&self) -> usize {
        self.row.len() + self.qualifier.len() + 9
    }

    /// Returns true if `other` addresses the same cell.
    pub fn same_cell(&self, other: &IndexRecord) -> bool {
        self.row == other.row && self.qualifier == other.qualifier
    }
}

/// Records are ordered by row, then qualifier, then newest timestamp first. At the same timestamp
/// a tombstone sorts before the put it hides.
impl Ord for IndexRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.qualifier.cmp(&other.qualifier))
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            .then_with(|| other.kind.to_byte().cmp(&self.kind.to_byte()))
    }
}

impl PartialOrd for IndexRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: u8, qualifier: u8, timestamp: u64, kind: RecordKind) -> IndexRecord {
        IndexRecord {
            row: vec![row],
            qualifier: vec![qualifier],
            timestamp,
            kind,
        }
    }

    #[test]
    fn orders_by_row_then_qualifier() {
        let mut records = vec![
            record(2, 0, 1, RecordKind::Put),
            record(1, 5, 1, RecordKind::Put),
            record(1, 3, 1, RecordKind::Put),
        ];
        records.sort();
        assert_eq!(records[0], record(1, 3, 1, RecordKind::Put));
        assert_eq!(records[1], record(1, 5, 1, RecordKind::Put));
        assert_eq!(records[2], record(2, 0, 1, RecordKind::Put));
    }

    #[test]
    fn newest_version_first_and_tombstone_before_put() {
        let mut records = vec![
            record(1, 1, 5, RecordKind::Put),
            record(1, 1, 9, RecordKind::Put),
            record(1, 1, 9, RecordKind::Delete),
        ];
        records.sort();
        assert_eq!(records[0], record(1, 1, 9, RecordKind::Delete));
        assert_eq!(records[1], record(1, 1, 9, RecordKind::Put));
        assert_eq!(records[2], record(1, 1, 5, RecordKind::Put));
    }

    #[test]
    fn kind_byte_round_trip() {
        for kind in [RecordKind::Put, RecordKind::Delete] {
            assert_eq!(RecordKind::from_byte(kind.to_byte()), Some(kind));
        }
        assert_eq!(RecordKind::from_byte(7), None);
    }
}
