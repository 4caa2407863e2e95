use crate::{merge_records, StatsError, StatsRecord, StatsScanner, StatsTarget};
use hexaplex_model::NamedNode;
use hexaplex_storage::{Region, SortedStore};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// The options of a statistics computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsOptions {
    /// The scanned table.
    pub table: String,
    /// File path or `file:` URL of the statistics document.
    pub target: String,
    /// The graph that describes the whole table.
    pub root_graph: NamedNode,
    /// Maximum number of concurrently scanned regions.
    pub parallelism: usize,
}

impl StatsOptions {
    pub fn new(table: impl Into<String>, target: impl Into<String>, root_graph: NamedNode) -> Self {
        Self {
            table: table.into(),
            target: target.into(),
            root_graph,
            parallelism: std::thread::available_parallelism().map_or(1, usize::from),
        }
    }

    /// Checks the options and resolves the target.
    pub fn validate(&self) -> Result<StatsTarget, StatsError> {
        if self.table.is_empty() {
            return Err(StatsError::configuration("No source table given"));
        }
        if self.parallelism == 0 {
            return Err(StatsError::configuration("The parallelism must be positive"));
        }
        StatsTarget::parse(&self.target)
    }
}

/// Returns the IRI of the root graph of `table` in the store located at `store_root`.
///
/// It is the `file:` URL of the store directory joined with the table name, where the namespace
/// separator `:` becomes a path separator.
pub fn root_graph_iri(store_root: &Path, table: &str) -> Result<NamedNode, StatsError> {
    let store_root = std::path::absolute(store_root)?;
    let url = Url::from_directory_path(&store_root)
        .ok()
        .and_then(|url| url.join(&table.replace(':', "/")).ok())
        .ok_or_else(|| {
            StatsError::configuration(format!(
                "Cannot derive a graph IRI for table {table} in {}",
                store_root.display()
            ))
        })?;
    NamedNode::new(url.as_str()).map_err(|e| StatsError::configuration(e.to_string()))
}

/// Computes the statistics of the table named by the `options` and writes them to its target.
///
/// Every region is scanned by its own task with a fresh [StatsScanner]. Returns the merged
/// records.
pub async fn compute_stats(
    store: Arc<dyn SortedStore>,
    options: StatsOptions,
) -> Result<Vec<StatsRecord>, StatsError> {
    let target = options.validate()?;
    let table: Arc<str> = options.table.as_str().into();
    let regions = {
        let store = Arc::clone(&store);
        let table = Arc::clone(&table);
        tokio::task::spawn_blocking(move || store.regions(&table)).await??
    };
    tracing::info!(table = %table, regions = regions.len(), "Computing statistics");

    let mut tasks = JoinSet::new();
    let mut partials = Vec::new();
    for region in regions {
        while tasks.len() >= options.parallelism {
            if let Some(result) = tasks.join_next().await {
                partials.extend(collect(result, &mut tasks)?);
            }
        }
        let store = Arc::clone(&store);
        let table = Arc::clone(&table);
        tasks.spawn_blocking(move || scan_region(store.as_ref(), &table, &region));
    }
    while let Some(result) = tasks.join_next().await {
        partials.extend(collect(result, &mut tasks)?);
    }

    let records = merge_records(partials);
    let root_graph = options.root_graph;
    tokio::task::spawn_blocking(move || -> Result<_, StatsError> {
        target.write(root_graph.as_ref(), &records)?;
        Ok(records)
    })
    .await?
}

fn collect(
    result: Result<Result<Vec<StatsRecord>, StatsError>, tokio::task::JoinError>,
    tasks: &mut JoinSet<Result<Vec<StatsRecord>, StatsError>>,
) -> Result<Vec<StatsRecord>, StatsError> {
    let records = result.map_err(StatsError::from).and_then(|records| records);
    if records.is_err() {
        tasks.abort_all();
    }
    records
}

fn scan_region(
    store: &dyn SortedStore,
    table: &str,
    region: &Region,
) -> Result<Vec<StatsRecord>, StatsError> {
    let mut scanner = StatsScanner::new();
    let mut rows = 0_u64;
    for row in store.scan(table, region)? {
        scanner.push_row(&row?)?;
        rows += 1;
    }
    tracing::debug!(region = region.index, rows, "Scanned region");
    Ok(scanner.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_graph_replaces_namespace_separator() {
        let root = std::env::temp_dir().join("store");
        let iri = root_graph_iri(&root, "ns:quads").unwrap();
        let expected = Url::from_directory_path(&root).unwrap().join("ns/quads").unwrap();
        assert_eq!(iri.as_str(), expected.as_str());
        assert!(iri.as_str().starts_with("file://"));
        assert!(iri.as_str().ends_with("/store/ns/quads"));
    }

    #[test]
    fn validation_rejects_unknown_target_format() {
        let root = NamedNode::new("file:///store/quads").unwrap();
        let options = StatsOptions::new("quads", "stats.unknown", root.clone());
        assert!(matches!(options.validate(), Err(StatsError::Configuration(_))));
        assert!(StatsOptions::new("quads", "stats.ttl", root).validate().is_ok());
    }
}
