use crate::{GraphCounter, StatsError, StatsGraph, StatsMetric, StatsRecord};
use hexaplex_encoding::{qualifier_field, qualifier_trailer, KeyFragment, RowKeyRef, StatementComponent};
use hexaplex_model::vocab::rdf;
use hexaplex_model::CorruptionError;
use hexaplex_storage::ScannedRow;

/// Folds the sorted rows of a scan into per-graph counts.
///
/// Distinct values are counted by comparing each row with its predecessor, so rows must be pushed
/// in key order. The counter of a named graph is flushed as soon as the scan moves on to another
/// graph. A scanner must not be shared between scans.
#[derive(Debug)]
pub struct StatsScanner {
    rdf_type: KeyFragment,
    root: GraphCounter,
    graph: Option<(Vec<u8>, GraphCounter)>,
    /// Key of the previous row. It determines region, context and primary fragment.
    last_key: Option<Vec<u8>>,
    /// Class fragment of the previous `rdf:type` cell of the current row.
    last_class: Option<KeyFragment>,
    emitted: Vec<StatsRecord>,
}

impl Default for StatsScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsScanner {
    pub fn new() -> Self {
        Self {
            rdf_type: KeyFragment::digest(rdf::TYPE.to_string()),
            root: GraphCounter::new(StatsGraph::Root),
            graph: None,
            last_key: None,
            last_class: None,
            emitted: Vec::new(),
        }
    }

    /// Counts the next row of the scan.
    pub fn push_row(&mut self, row: &ScannedRow) -> Result<(), StatsError> {
        if row.cells.is_empty() {
            return Ok(());
        }
        let key = RowKeyRef::parse(&row.key)?;
        let is_new = self.last_key.as_deref() != Some(row.key.as_slice());
        if is_new {
            self.last_class = None;
        }

        let primary = key.permutation().primary();
        let new_classes = if primary == StatementComponent::Predicate
            && key.primary() == self.rdf_type.as_bytes()
        {
            self.count_new_classes(row)?
        } else {
            0
        };

        let counter = self.counter_for(key.context(), row)?;
        let distinct = u64::from(is_new);
        match primary {
            StatementComponent::Subject => {
                counter.add(StatsMetric::DistinctSubjects, distinct);
                counter.add(StatsMetric::Triples, row.cells.len() as u64);
            }
            StatementComponent::Predicate => {
                counter.add(StatsMetric::Properties, distinct);
                counter.add(StatsMetric::Classes, new_classes);
            }
            StatementComponent::Object => counter.add(StatsMetric::DistinctObjects, distinct),
        }

        if is_new {
            self.last_key = Some(row.key.clone());
        }
        Ok(())
    }

    /// Returns the records of all graph counters flushed so far.
    pub fn emitted(&self) -> &[StatsRecord] {
        &self.emitted
    }

    /// Flushes the open counters and returns all records of the scan.
    pub fn finish(mut self) -> Vec<StatsRecord> {
        if let Some((_, counter)) = self.graph.take() {
            self.emitted.extend(counter.into_records());
        }
        self.emitted.extend(self.root.into_records());
        self.emitted
    }

    fn count_new_classes(&mut self, row: &ScannedRow) -> Result<u64, StatsError> {
        let mut count = 0;
        for cell in &row.cells {
            let class = KeyFragment::digest(qualifier_field(&cell.qualifier, 1)?);
            if self.last_class != Some(class) {
                count += 1;
                self.last_class = Some(class);
            }
        }
        Ok(count)
    }

    fn counter_for(
        &mut self,
        context: Option<&[u8]>,
        row: &ScannedRow,
    ) -> Result<&mut GraphCounter, StatsError> {
        let Some(context) = context else {
            return Ok(&mut self.root);
        };
        let current = match self.graph.take() {
            Some((current, counter)) if current == context => (current, counter),
            previous => {
                if let Some((_, counter)) = previous {
                    tracing::trace!(graph = ?counter.graph(), "Flushing graph counter");
                    self.emitted.extend(counter.into_records());
                }
                (context.to_vec(), GraphCounter::new(graph_name(row)?))
            }
        };
        Ok(&mut self.graph.insert(current).1)
    }
}

/// Reads the graph name from the trailer of the row's first qualifier.
fn graph_name(row: &ScannedRow) -> Result<StatsGraph, StatsError> {
    let Some(cell) = row.cells.first() else {
        return Err(CorruptionError::msg("Graph-scoped row without cells").into());
    };
    let trailer = qualifier_trailer(&cell.qualifier)?;
    if trailer.is_empty() {
        return Err(CorruptionError::msg("Graph-scoped qualifier without graph name").into());
    }
    let graph = std::str::from_utf8(trailer).map_err(CorruptionError::new)?;
    Ok(StatsGraph::Named(graph.to_owned()))
}
