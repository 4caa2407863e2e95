use crate::pump::ParserPump;
use crate::{handoff, GraphContext, IngestError, Progress, WorkUnit};
use hexaplex_encoding::{encode_statement, IndexRecord};
use hexaplex_storage::region_index;
use std::sync::Arc;

const PROGRESS_INTERVAL: u64 = 100_000;

/// Settings shared by all work units of a bulk load.
#[derive(Debug, Clone)]
pub struct UnitSettings {
    pub context: GraphContext,
    pub skip_invalid: bool,
    pub verify_literals: bool,
    /// Epoch milliseconds written to every record.
    pub timestamp: u64,
    /// The split points of the target table, used to partition the records by region.
    pub split_points: Vec<Vec<u8>>,
}

/// The records and counters produced by a work unit.
#[derive(Debug, Clone, Default)]
pub struct WorkUnitOutput {
    /// Unsorted records per region of the target table.
    pub regions: Vec<Vec<IndexRecord>>,
    pub statements: u64,
    pub records: u64,
    pub files: usize,
    pub skipped: usize,
}

/// Parses and encodes all files of the `unit`.
///
/// The files are parsed on a blocking thread that hands statements over one at a time. A failure
/// of the parser is raised when it is taken from the handoff. Dropping the returned future stops
/// the parser at its next statement.
pub async fn run_work_unit(
    unit: WorkUnit,
    settings: Arc<UnitSettings>,
) -> Result<WorkUnitOutput, IngestError> {
    let index = unit.index;
    let progress = Progress::new(unit.total_size());
    tracing::debug!(
        unit = index,
        files = unit.files.len(),
        bytes = unit.total_size(),
        "Starting work unit"
    );

    let (sender, mut receiver) = handoff();
    let pump = ParserPump::new(unit, Arc::clone(&settings), progress.clone(), sender);
    let producer = tokio::task::spawn_blocking(move || pump.run());

    let mut output = WorkUnitOutput {
        regions: vec![Vec::new(); settings.split_points.len() + 1],
        ..WorkUnitOutput::default()
    };
    while let Some(quad) = receiver.recv().await {
        let quad = quad?;
        for record in encode_statement(quad.as_ref(), false, settings.timestamp)? {
            let region = region_index(&settings.split_points, &record.row);
            output.regions[region].push(record);
            output.records += 1;
        }
        output.statements += 1;
        if output.statements % PROGRESS_INTERVAL == 0 {
            tracing::debug!(
                unit = index,
                statements = output.statements,
                progress = progress.fraction(),
                "Work unit progress"
            );
        }
    }

    let summary = producer.await??;
    output.files = summary.files;
    output.skipped = summary.skipped;
    tracing::info!(
        unit = index,
        files = output.files,
        skipped = output.skipped,
        statements = output.statements,
        records = output.records,
        "Finished work unit"
    );
    Ok(output)
}
