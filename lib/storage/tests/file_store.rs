use assert_fs::TempDir;
use hexaplex_encoding::{encode_statement, IndexRecord, Permutation};
use hexaplex_model::{GraphName, Literal, NamedNode, Quad, StorageError};
use hexaplex_storage::{
    get_or_create_table, FileStore, Region, ScannedRow, SegmentWriter, SortedStore,
};
use std::path::{Path, PathBuf};

fn example_quad(subject: &str, graph: GraphName) -> Quad {
    Quad::new(
        NamedNode::new(format!("http://example.com/{subject}")).unwrap(),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Literal::new_simple_literal("value"),
        graph,
    )
}

/// Writes one segment per region that receives at least one of the `records`.
fn write_segments(
    dir: &Path,
    regions: &[Region],
    mut records: Vec<IndexRecord>,
) -> Vec<PathBuf> {
    records.sort();
    records.dedup();
    let mut paths = Vec::new();
    for region in regions {
        let mut in_region = records
            .iter()
            .filter(|record| region.contains(&record.row))
            .peekable();
        if in_region.peek().is_none() {
            continue;
        }
        let path = dir.join(format!("region-{}.seg", region.index));
        let mut writer = SegmentWriter::create(&path).unwrap();
        for record in in_region {
            writer.push(record).unwrap();
        }
        writer.finish().unwrap();
        paths.push(path);
    }
    paths
}

fn scan_all(store: &FileStore, table: &str) -> Vec<ScannedRow> {
    store
        .regions(table)
        .unwrap()
        .iter()
        .flat_map(|region| store.scan(table, region).unwrap())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn test_create_table_with_pre_splits() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());

    assert!(!store.table_exists("ns:quads").unwrap());
    let regions = get_or_create_table(&store, "ns:quads", 3).unwrap();

    assert!(store.table_exists("ns:quads").unwrap());
    assert!(dir.path().join("ns/quads/manifest.json").is_file());
    assert_eq!(regions.len(), 27);
    assert_eq!(get_or_create_table(&store, "ns:quads", 3).unwrap(), regions);
}

#[test]
fn test_create_existing_table_fails() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    store.create_table("quads", &[]).unwrap();
    assert!(store.create_table("quads", &[]).is_err());
}

#[test]
fn test_missing_table() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let result = store.regions("missing");
    assert!(matches!(result, Err(StorageError::TableNotFound(name)) if name == "missing"));
}

#[test]
fn test_bulk_load_and_scan() {
    let dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let regions = get_or_create_table(&store, "quads", 3).unwrap();

    let graph = GraphName::NamedNode(NamedNode::new("http://example.com/g").unwrap());
    let records = ["a", "b", "c"]
        .into_iter()
        .flat_map(|s| encode_statement(example_quad(s, graph.clone()).as_ref(), false, 7).unwrap())
        .collect::<Vec<_>>();
    let segments = write_segments(work.path(), &regions, records);

    let loaded = store.bulk_load("quads", &segments).unwrap();
    assert_eq!(loaded, 18);

    let rows = scan_all(&store, "quads");
    let cells = rows.iter().map(|row| row.cells.len()).sum::<usize>();
    assert_eq!(cells, 18);
    assert!(rows.windows(2).all(|pair| pair[0].key < pair[1].key));

    let spo_rows = rows
        .iter()
        .filter(|row| row.key[0] == Permutation::Spo.tag())
        .count();
    assert_eq!(spo_rows, 3);
    // all three statements share predicate and object
    let pos_rows = rows
        .iter()
        .filter(|row| row.key[0] == Permutation::Pos.tag())
        .collect::<Vec<_>>();
    assert_eq!(pos_rows.len(), 1);
    assert_eq!(pos_rows[0].cells.len(), 3);
}

#[test]
fn test_bulk_load_rejects_segment_spanning_regions() {
    let dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    get_or_create_table(&store, "quads", 0).unwrap();

    let mut records = encode_statement(
        example_quad("a", GraphName::DefaultGraph).as_ref(),
        false,
        1,
    )
    .unwrap();
    records.sort();
    let path = work.path().join("all.seg");
    let mut writer = SegmentWriter::create(&path).unwrap();
    for record in &records {
        writer.push(record).unwrap();
    }
    writer.finish().unwrap();

    assert!(store.bulk_load("quads", &[path]).is_err());
    assert!(scan_all(&store, "quads").is_empty());
}

#[test]
fn test_later_delete_hides_statement() {
    let dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let regions = get_or_create_table(&store, "quads", 3).unwrap();
    let quad = example_quad("a", GraphName::DefaultGraph);

    let puts = write_segments(
        work.path(),
        &regions,
        encode_statement(quad.as_ref(), false, 1).unwrap(),
    );
    store.bulk_load("quads", &puts).unwrap();
    assert_eq!(scan_all(&store, "quads").len(), 3);

    let deletes_dir = work.path().join("deletes");
    std::fs::create_dir(&deletes_dir).unwrap();
    let deletes = write_segments(
        &deletes_dir,
        &regions,
        encode_statement(quad.as_ref(), true, 2).unwrap(),
    );
    store.bulk_load("quads", &deletes).unwrap();
    assert!(scan_all(&store, "quads").is_empty());
}

#[test]
fn test_truncate_keeps_regions() {
    let dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let regions = get_or_create_table(&store, "quads", 2).unwrap();

    let segments = write_segments(
        work.path(),
        &regions,
        encode_statement(example_quad("a", GraphName::DefaultGraph).as_ref(), false, 1).unwrap(),
    );
    store.bulk_load("quads", &segments).unwrap();
    assert!(!scan_all(&store, "quads").is_empty());

    store.truncate("quads").unwrap();
    assert!(scan_all(&store, "quads").is_empty());
    assert_eq!(store.regions("quads").unwrap(), regions);
    let leftovers = std::fs::read_dir(dir.path().join("quads/segments"))
        .unwrap()
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_failed_bulk_load_keeps_segments_for_retry() {
    let dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let regions = get_or_create_table(&store, "quads", 3).unwrap();
    let segments = write_segments(
        work.path(),
        &regions,
        encode_statement(example_quad("a", GraphName::DefaultGraph).as_ref(), false, 1).unwrap(),
    );

    // a directory in place of the temporary manifest makes the manifest commit fail
    let blocker = dir.path().join("quads/manifest.json.tmp");
    std::fs::create_dir(&blocker).unwrap();
    assert!(store.bulk_load("quads", &segments).is_err());

    assert!(segments.iter().all(|segment| segment.is_file()));
    assert!(scan_all(&store, "quads").is_empty());
    let installed = std::fs::read_dir(dir.path().join("quads/segments"))
        .unwrap()
        .count();
    assert_eq!(installed, 0);

    std::fs::remove_dir(&blocker).unwrap();
    assert_eq!(store.bulk_load("quads", &segments).unwrap(), 3);
    assert_eq!(scan_all(&store, "quads").len(), 3);
}
