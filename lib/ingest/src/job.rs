use crate::{
    discover_sources, plan_work_units, run_work_unit, GraphContext, GraphTemplate, IngestError,
    Shuffle, UnitSettings,
};
use hexaplex_storage::{get_or_create_table, SortedStore, MAX_SPLIT_BITS};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// The default upper bound of source bytes grouped into one work unit.
pub const DEFAULT_MAX_SPLIT_SIZE: u64 = 256 * 1024 * 1024;

/// The default number of pre-split bits of a new table.
pub const DEFAULT_SPLIT_BITS: u8 = 3;

/// The options of a bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkLoadOptions {
    /// Comma-delimited source files and directories.
    pub sources: String,
    /// Directory for the sorted segments. Must not exist.
    pub work_dir: PathBuf,
    /// The target table.
    pub table: String,
    /// Abandon files with invalid content instead of failing the load.
    pub skip_invalid: bool,
    /// Validate the lexical form of typed literals.
    pub verify_literals: bool,
    /// Drop all data of the target table right before loading.
    pub truncate: bool,
    /// Pre-split bits used if the target table is created.
    pub split_bits: u8,
    /// Template of the graph of statements without one.
    pub graph_template: Option<String>,
    /// Put every statement into the templated graph.
    pub override_context: bool,
    /// Timestamp of all records in epoch milliseconds. Defaults to the start of the load.
    pub timestamp: Option<u64>,
    pub max_split_size: u64,
    /// Maximum number of concurrently processed work units.
    pub parallelism: usize,
}

impl BulkLoadOptions {
    pub fn new(sources: impl Into<String>, work_dir: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            sources: sources.into(),
            work_dir: work_dir.into(),
            table: table.into(),
            skip_invalid: false,
            verify_literals: false,
            truncate: false,
            split_bits: DEFAULT_SPLIT_BITS,
            graph_template: None,
            override_context: false,
            timestamp: None,
            max_split_size: DEFAULT_MAX_SPLIT_SIZE,
            parallelism: std::thread::available_parallelism().map_or(1, usize::from),
        }
    }

    /// Checks the options and resolves the graph context.
    pub fn validate(&self) -> Result<GraphContext, IngestError> {
        if self.sources.split(',').all(|source| source.trim().is_empty()) {
            return Err(IngestError::configuration("No source given"));
        }
        if self.table.is_empty() {
            return Err(IngestError::configuration("No target table given"));
        }
        if self.work_dir.exists() {
            return Err(IngestError::configuration(format!(
                "The work directory {} already exists",
                self.work_dir.display()
            )));
        }
        if self.split_bits > MAX_SPLIT_BITS {
            return Err(IngestError::configuration(format!(
                "The number of pre-split bits must be between 0 and {MAX_SPLIT_BITS}, got {}",
                self.split_bits
            )));
        }
        if self.max_split_size == 0 {
            return Err(IngestError::configuration("The maximum split size must be positive"));
        }
        if self.parallelism == 0 {
            return Err(IngestError::configuration("The parallelism must be positive"));
        }
        let template = self
            .graph_template
            .as_deref()
            .map(GraphTemplate::new)
            .transpose()?;
        Ok(GraphContext::new(template, self.override_context))
    }
}

/// Counters of a finished bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkLoadSummary {
    pub statements: u64,
    pub records: u64,
    pub files: usize,
    pub skipped: usize,
    pub segments: usize,
    /// Records installed into the target table.
    pub loaded: u64,
}

/// Loads the RDF source files named by the `options` into the target table of the `store`.
///
/// The target table is created with pre-split regions if it does not exist. Either all records of
/// the load become visible or none.
pub async fn bulk_load(
    store: Arc<dyn SortedStore>,
    options: BulkLoadOptions,
) -> Result<BulkLoadSummary, IngestError> {
    let context = options.validate()?;
    let timestamp = options.timestamp.unwrap_or_else(now_millis);

    let (files, regions) = {
        let store = Arc::clone(&store);
        let options = options.clone();
        tokio::task::spawn_blocking(move || -> Result<_, IngestError> {
            let files = discover_sources(&options.sources)?;
            let regions = get_or_create_table(store.as_ref(), &options.table, options.split_bits)?;
            if let Some(parent) = options.work_dir.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::create_dir(&options.work_dir)?;
            Ok((files, regions))
        })
        .await??
    };
    let units = plan_work_units(files, options.max_split_size);
    tracing::info!(
        table = options.table,
        units = units.len(),
        regions = regions.len(),
        timestamp,
        "Starting bulk load"
    );

    let settings = Arc::new(UnitSettings {
        context,
        skip_invalid: options.skip_invalid,
        verify_literals: options.verify_literals,
        timestamp,
        split_points: regions.iter().skip(1).map(|region| region.start.clone()).collect(),
    });
    let permits = Arc::new(Semaphore::new(options.parallelism));
    let mut tasks = JoinSet::new();
    for unit in units {
        let permits = Arc::clone(&permits);
        let settings = Arc::clone(&settings);
        tasks.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| IngestError::Cancelled)?;
            run_work_unit(unit, settings).await
        });
    }

    let mut summary = BulkLoadSummary::default();
    let mut shuffle = Shuffle::new(regions);
    while let Some(result) = tasks.join_next().await {
        let output = match result.map_err(IngestError::from).and_then(|output| output) {
            Ok(output) => output,
            Err(error) => {
                tasks.abort_all();
                return Err(error);
            }
        };
        summary.statements += output.statements;
        summary.records += output.records;
        summary.files += output.files;
        summary.skipped += output.skipped;
        shuffle.absorb(output.regions);
    }

    let segments = {
        let work_dir = options.work_dir.clone();
        tokio::task::spawn_blocking(move || shuffle.write_segments(&work_dir)).await??
    };
    summary.segments = segments.len();

    summary.loaded = tokio::task::spawn_blocking(move || -> Result<u64, IngestError> {
        if options.truncate {
            store.truncate(&options.table)?;
        }
        let paths = segments.into_iter().map(|segment| segment.path).collect::<Vec<_>>();
        Ok(store.bulk_load(&options.table, &paths)?)
    })
    .await??;

    tracing::info!(
        statements = summary.statements,
        records = summary.records,
        files = summary.files,
        skipped = summary.skipped,
        segments = summary.segments,
        loaded = summary.loaded,
        "Bulk load completed"
    );
    Ok(summary)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
