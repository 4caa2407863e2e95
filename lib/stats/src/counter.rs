use hexaplex_model::vocab::void;
use hexaplex_model::NamedNodeRef;
use std::fmt;

/// A statistic counted per graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatsMetric {
    Triples,
    DistinctSubjects,
    Properties,
    DistinctObjects,
    Classes,
}

impl StatsMetric {
    pub const ALL: [StatsMetric; 5] = [
        StatsMetric::Triples,
        StatsMetric::DistinctSubjects,
        StatsMetric::Properties,
        StatsMetric::DistinctObjects,
        StatsMetric::Classes,
    ];

    /// Returns the VoID property of this metric.
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            StatsMetric::Triples => void::TRIPLES,
            StatsMetric::DistinctSubjects => void::DISTINCT_SUBJECTS,
            StatsMetric::Properties => void::PROPERTIES,
            StatsMetric::DistinctObjects => void::DISTINCT_OBJECTS,
            StatsMetric::Classes => void::CLASSES,
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatsMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iri = self.iri().as_str();
        f.write_str(iri.strip_prefix(void::NAMESPACE).unwrap_or(iri))
    }
}

/// The graph a statistic belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatsGraph {
    /// All statements of the table regardless of their graph.
    Root,
    /// A named graph, identified by its canonical N-Triples text.
    Named(String),
}

/// A partial or merged count of a metric of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatsRecord {
    pub graph: StatsGraph,
    pub metric: StatsMetric,
    pub count: u64,
}

/// The counts of all metrics of a graph within one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphCounter {
    graph: StatsGraph,
    counts: [u64; 5],
}

impl GraphCounter {
    pub fn new(graph: StatsGraph) -> Self {
        Self {
            graph,
            counts: [0; 5],
        }
    }

    pub fn graph(&self) -> &StatsGraph {
        &self.graph
    }

    pub fn get(&self, metric: StatsMetric) -> u64 {
        self.counts[metric.position()]
    }

    pub fn add(&mut self, metric: StatsMetric, count: u64) {
        self.counts[metric.position()] += count;
    }

    /// Returns a record for every metric with a non-zero count.
    pub fn into_records(self) -> impl Iterator<Item = StatsRecord> {
        let graph = self.graph;
        StatsMetric::ALL
            .into_iter()
            .zip(self.counts)
            .filter(|(_, count)| *count > 0)
            .map(move |(metric, count)| StatsRecord {
                graph: graph.clone(),
                metric,
                count,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_non_zero_metrics_are_reported() {
        let mut counter = GraphCounter::new(StatsGraph::Root);
        counter.add(StatsMetric::Triples, 3);
        counter.add(StatsMetric::Classes, 1);
        counter.add(StatsMetric::Classes, 1);

        let records = counter.into_records().collect::<Vec<_>>();
        assert_eq!(
            records,
            vec![
                StatsRecord {
                    graph: StatsGraph::Root,
                    metric: StatsMetric::Triples,
                    count: 3
                },
                StatsRecord {
                    graph: StatsGraph::Root,
                    metric: StatsMetric::Classes,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn metrics_display_as_void_local_names() {
        assert_eq!(StatsMetric::DistinctSubjects.to_string(), "distinctSubjects");
        assert_eq!(StatsMetric::Properties.to_string(), "properties");
    }
}
