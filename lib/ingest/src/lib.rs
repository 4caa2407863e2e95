//! Bulk loading of RDF source files into the six permutation indexes of a [SortedStore].
//!
//! A load discovers the source files, groups them into work units and runs each unit as a pair of
//! tasks: a blocking parser that pumps statements through a single-slot handoff and an async
//! consumer that encodes them into index records. The records of all units are sorted per region,
//! written as segment files and installed into the target table in one atomic bulk load.
//!
//! [SortedStore]: hexaplex_storage::SortedStore

mod compression;
mod context;
mod error;
mod format;
mod handoff;
mod job;
mod progress;
mod pump;
mod shuffle;
mod source;
mod work_unit;

pub use compression::Compression;
pub use context::{ContextPolicy, GraphContext, GraphTemplate};
pub use error::{IngestError, SourceError};
pub use format::{format_for_extension, supported_extensions};
pub use handoff::{handoff, HandoffReceiver, HandoffSender};
pub use job::{
    bulk_load, BulkLoadOptions, BulkLoadSummary, DEFAULT_MAX_SPLIT_SIZE, DEFAULT_SPLIT_BITS,
};
pub use progress::{CountingReader, Progress};
pub use shuffle::Shuffle;
pub use source::{discover_sources, plan_work_units, SourceFile, WorkUnit};
pub use work_unit::{run_work_unit, UnitSettings, WorkUnitOutput};
