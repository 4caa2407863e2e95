use crate::{StatsError, StatsGraph, StatsRecord};
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use hexaplex_encoding::parse_named_or_blank_node;
use hexaplex_model::vocab::{sd, void, xsd};
use hexaplex_model::{Literal, NamedNodeRef, NamedOrBlankNode, Subject, TripleRef};
use oxrdfio::{RdfFormat, RdfSerializer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// The compression of the statistics document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCompression {
    None,
    Gzip,
    Bzip2,
}

/// Destination of the statistics document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsTarget {
    pub path: PathBuf,
    pub format: RdfFormat,
    pub compression: OutputCompression,
}

impl StatsTarget {
    /// Resolves a file path or `file:` URL.
    ///
    /// A trailing `.gz` or `.bz2` selects the compression, the extension before it the format.
    pub fn parse(target: &str) -> Result<Self, StatsError> {
        let path = if target.starts_with("file:") {
            Url::parse(target)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .ok_or_else(|| StatsError::configuration(format!("Invalid target URL {target}")))?
        } else {
            PathBuf::from(target)
        };

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StatsError::configuration(format!("Invalid target file {target}")))?;
        let (compression, stem) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if ext.eq_ignore_ascii_case("gz") => (OutputCompression::Gzip, stem),
            Some((stem, ext)) if ext.eq_ignore_ascii_case("bz2") => {
                (OutputCompression::Bzip2, stem)
            }
            _ => (OutputCompression::None, file_name),
        };
        let format = Path::new(stem)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(RdfFormat::from_extension)
            .ok_or_else(|| {
                StatsError::configuration(format!(
                    "Unsupported target file format extension: {target}"
                ))
            })?;

        Ok(Self {
            path,
            format,
            compression,
        })
    }

    /// Writes the `records` as VoID statements about their graphs.
    ///
    /// Statistics of the [StatsGraph::Root] graph are attached to `root_graph`.
    pub fn write(&self, root_graph: NamedNodeRef<'_>, records: &[StatsRecord]) -> Result<(), StatsError> {
        let root_namespace = root_graph
            .as_str()
            .rfind('/')
            .map_or(root_graph.as_str(), |end| &root_graph.as_str()[..=end]);
        let mut serializer = RdfSerializer::from_format(self.format)
            .with_prefix("", root_namespace)
            .and_then(|s| s.with_prefix("sd", sd::NAMESPACE))
            .and_then(|s| s.with_prefix("void", void::NAMESPACE))
            .map_err(|e| StatsError::configuration(format!("Invalid namespace: {e}")))?
            .for_writer(OutputWriter::create(&self.path, self.compression)?);

        let root: Subject = root_graph.into_owned().into();
        for record in records {
            let subject = match &record.graph {
                StatsGraph::Root => root.clone(),
                StatsGraph::Named(graph) => match parse_named_or_blank_node(graph) {
                    Ok(NamedOrBlankNode::NamedNode(node)) => node.into(),
                    Ok(NamedOrBlankNode::BlankNode(node)) => node.into(),
                    Err(_) => return Err(StatsError::InvalidGraphName(graph.clone())),
                },
            };
            let count = Literal::new_typed_literal(record.count.to_string(), xsd::INTEGER);
            serializer.serialize_triple(TripleRef::new(
                subject.as_ref(),
                record.metric.iri(),
                count.as_ref(),
            ))?;
        }
        serializer.finish()?.finish()?;
        tracing::info!(
            target = %self.path.display(),
            records = records.len(),
            "Wrote statistics"
        );
        Ok(())
    }
}

enum OutputWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Bzip2(BzEncoder<BufWriter<File>>),
}

impl OutputWriter {
    fn create(path: &Path, compression: OutputCompression) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(match compression {
            OutputCompression::None => Self::Plain(file),
            OutputCompression::Gzip => Self::Gzip(GzEncoder::new(file, flate2::Compression::default())),
            OutputCompression::Bzip2 => Self::Bzip2(BzEncoder::new(file, bzip2::Compression::default())),
        })
    }

    fn finish(self) -> io::Result<()> {
        let writer = match self {
            Self::Plain(writer) => writer,
            Self::Gzip(encoder) => encoder.finish()?,
            Self::Bzip2(encoder) => encoder.finish()?,
        };
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(writer) => writer.write(buf),
            Self::Gzip(writer) => writer.write(buf),
            Self::Bzip2(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(writer) => writer.flush(),
            Self::Gzip(writer) => writer.flush(),
            Self::Bzip2(writer) => writer.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatsMetric;
    use assert_fs::TempDir;
    use bzip2::read::BzDecoder;
    use flate2::read::GzDecoder;
    use hexaplex_model::NamedNode;
    use std::io::Read;

    fn records() -> Vec<StatsRecord> {
        vec![
            StatsRecord {
                graph: StatsGraph::Root,
                metric: StatsMetric::Triples,
                count: 12,
            },
            StatsRecord {
                graph: StatsGraph::Named("<http://example.com/g>".into()),
                metric: StatsMetric::DistinctSubjects,
                count: 3,
            },
        ]
    }

    #[test]
    fn resolves_format_and_compression() {
        let target = StatsTarget::parse("/tmp/stats.ttl.gz").unwrap();
        assert_eq!(target.format, RdfFormat::Turtle);
        assert_eq!(target.compression, OutputCompression::Gzip);
        assert_eq!(target.path, PathBuf::from("/tmp/stats.ttl.gz"));

        let target = StatsTarget::parse("stats.nt.bz2").unwrap();
        assert_eq!(target.format, RdfFormat::NTriples);
        assert_eq!(target.compression, OutputCompression::Bzip2);

        let target = StatsTarget::parse("file:///tmp/stats.trig").unwrap();
        assert_eq!(target.format, RdfFormat::TriG);
        assert_eq!(target.path, PathBuf::from("/tmp/stats.trig"));
    }

    #[test]
    fn rejects_unknown_formats() {
        for target in ["stats.txt", "stats.gz", "stats"] {
            assert!(
                matches!(StatsTarget::parse(target), Err(StatsError::Configuration(_))),
                "{target}"
            );
        }
    }

    #[test]
    fn writes_ntriples() {
        let dir = TempDir::new().unwrap();
        let target = StatsTarget::parse(dir.path().join("stats.nt").to_str().unwrap()).unwrap();
        let root = NamedNode::new("file:///data/store/quads").unwrap();
        target.write(root.as_ref(), &records()).unwrap();

        let content = std::fs::read_to_string(&target.path).unwrap();
        assert!(content.contains(
            "<file:///data/store/quads> <http://rdfs.org/ns/void#triples> \"12\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
        ));
        assert!(content.contains(
            "<http://example.com/g> <http://rdfs.org/ns/void#distinctSubjects> \"3\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
        ));
    }

    #[test]
    fn writes_compressed_turtle() {
        let dir = TempDir::new().unwrap();
        let root = NamedNode::new("file:///data/store/quads").unwrap();
        for name in ["stats.ttl.gz", "stats.ttl.bz2"] {
            let target = StatsTarget::parse(dir.path().join(name).to_str().unwrap()).unwrap();
            target.write(root.as_ref(), &records()).unwrap();

            let file = File::open(&target.path).unwrap();
            let mut content = String::new();
            if target.compression == OutputCompression::Gzip {
                GzDecoder::new(file).read_to_string(&mut content).unwrap();
            } else {
                BzDecoder::new(file).read_to_string(&mut content).unwrap();
            }
            assert!(content.contains("@prefix void: <http://rdfs.org/ns/void#> ."));
            assert!(content.contains("void:triples 12"));
        }
    }
}
