use crate::{HandoffSender, IngestError, Progress, SourceError, SourceFile, UnitSettings, WorkUnit};
use hexaplex_model::{validate_literal, Quad, Term};
use oxrdfio::{RdfParseError, RdfParser};
use std::fs::File;
use std::sync::Arc;
use url::Url;

/// Files handled by one pump.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PumpSummary {
    pub files: usize,
    pub skipped: usize,
}

/// Parses the files of a work unit one after another and hands every statement to the consumer.
///
/// Runs on a blocking thread. A failure is handed over instead of a statement, except for invalid
/// files that are skipped.
pub(crate) struct ParserPump {
    unit: WorkUnit,
    settings: Arc<UnitSettings>,
    progress: Progress,
    sender: HandoffSender,
}

impl ParserPump {
    pub fn new(
        unit: WorkUnit,
        settings: Arc<UnitSettings>,
        progress: Progress,
        sender: HandoffSender,
    ) -> Self {
        Self {
            unit,
            settings,
            progress,
            sender,
        }
    }

    /// Returns an error only if the consumer went away.
    pub fn run(self) -> Result<PumpSummary, IngestError> {
        let mut summary = PumpSummary::default();
        let mut offset = 0;
        for file in &self.unit.files {
            tracing::debug!(unit = self.unit.index, file = %file.path.display(), "Parsing");
            match self.pump_file(file) {
                Ok(()) => summary.files += 1,
                Err(IngestError::Cancelled) => return Err(IngestError::Cancelled),
                Err(error) if self.settings.skip_invalid && error.is_invalid_source() => {
                    tracing::warn!(file = %file.path.display(), %error, "Skipping invalid source file");
                    summary.skipped += 1;
                }
                Err(error) => {
                    self.sender.fail(error)?;
                    return Ok(summary);
                }
            }
            offset += file.size;
            self.progress.complete_through(offset);
        }
        Ok(summary)
    }

    fn pump_file(&self, file: &SourceFile) -> Result<(), IngestError> {
        let policy = self.settings.context.for_file(&file.path)?;
        let read_error = |source: std::io::Error| IngestError::Read {
            file: file.path.clone(),
            source,
        };
        let parse_error = |source: SourceError| IngestError::Parse {
            file: file.path.clone(),
            source,
        };

        let reader = File::open(&file.path).map_err(read_error)?;
        let reader = file
            .compression
            .decoder(self.progress.reader(reader))
            .map_err(read_error)?;
        let base_iri = Url::from_file_path(&file.path).map_err(|()| {
            IngestError::configuration(format!("{} is not an absolute path", file.path.display()))
        })?;
        let parser = RdfParser::from_format(file.format)
            .with_base_iri(base_iri.as_str())
            .map_err(|error| IngestError::configuration(format!("Invalid base IRI {base_iri}: {error}")))?;

        for quad in parser.for_reader(reader) {
            let quad = quad.map_err(|error| match error {
                RdfParseError::Io(error) => read_error(error),
                RdfParseError::Syntax(error) => parse_error(error.into()),
            })?;
            if self.settings.verify_literals {
                verify_literals(&quad).map_err(parse_error)?;
            }
            self.sender.send(policy.apply(quad))?;
        }
        Ok(())
    }
}

fn verify_literals(quad: &Quad) -> Result<(), SourceError> {
    if let Term::Literal(literal) = &quad.object {
        validate_literal(literal.as_ref())?;
    }
    Ok(())
}
