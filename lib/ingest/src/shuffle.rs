use crate::IngestError;
use hexaplex_encoding::IndexRecord;
use hexaplex_storage::{Region, SegmentInfo, SegmentWriter, SEGMENT_EXTENSION};
use std::path::Path;

/// Gathers the records of all work units per region and writes them as sorted segment files.
///
/// All records are kept in memory until [Shuffle::write_segments] is called.
#[derive(Debug)]
pub struct Shuffle {
    regions: Vec<Region>,
    buckets: Vec<Vec<IndexRecord>>,
}

impl Shuffle {
    pub fn new(regions: Vec<Region>) -> Self {
        let buckets = vec![Vec::new(); regions.len()];
        Self { regions, buckets }
    }

    /// Adds the per-region records of a work unit.
    pub fn absorb(&mut self, regions: Vec<Vec<IndexRecord>>) {
        for (bucket, records) in self.buckets.iter_mut().zip(regions) {
            if bucket.is_empty() {
                *bucket = records;
            } else {
                bucket.extend(records);
            }
        }
    }

    /// Sorts the records of each region and writes one segment per non-empty region into
    /// `work_dir`. Duplicate records are written once.
    pub fn write_segments(self, work_dir: &Path) -> Result<Vec<SegmentInfo>, IngestError> {
        let mut segments = Vec::new();
        for (region, mut records) in self.regions.iter().zip(self.buckets) {
            if records.is_empty() {
                continue;
            }
            records.sort_unstable();
            records.dedup();

            let path = work_dir.join(format!("region-{:05}.{SEGMENT_EXTENSION}", region.index));
            let mut writer = SegmentWriter::create(&path)?;
            for record in &records {
                writer.push(record)?;
            }
            let info = writer.finish()?;
            tracing::debug!(
                region = region.index,
                records = info.record_count,
                "Wrote segment"
            );
            segments.push(info);
        }
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use hexaplex_encoding::RecordKind;
    use hexaplex_storage::SegmentReader;

    fn record(row: &[u8], qualifier: &[u8]) -> IndexRecord {
        IndexRecord {
            row: row.to_vec(),
            qualifier: qualifier.to_vec(),
            timestamp: 1,
            kind: RecordKind::Put,
        }
    }

    #[test]
    fn writes_sorted_segments_per_region() {
        let dir = TempDir::new().unwrap();
        let regions = Region::from_split_points(&[vec![1], vec![2]]);
        let mut shuffle = Shuffle::new(regions);
        shuffle.absorb(vec![
            vec![record(&[0, 9], b"b"), record(&[0, 1], b"a")],
            vec![],
            vec![record(&[2], b"x")],
        ]);
        shuffle.absorb(vec![
            vec![record(&[0, 1], b"a"), record(&[0, 1], b"0")],
            vec![],
            vec![],
        ]);

        let segments = shuffle.write_segments(dir.path()).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].record_count, 3);
        assert_eq!(segments[0].first_row, vec![0, 1]);
        assert_eq!(segments[0].last_row, vec![0, 9]);

        let records = SegmentReader::open(&segments[0].path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            records,
            vec![
                record(&[0, 1], b"0"),
                record(&[0, 1], b"a"),
                record(&[0, 9], b"b")
            ]
        );
        assert!(segments[1].path.ends_with("region-00002.seg"));
    }
}
