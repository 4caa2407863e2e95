use clap::{value_parser, ArgAction, Parser, Subcommand, ValueHint};
use hexaplex_ingest::{DEFAULT_MAX_SPLIT_SIZE, DEFAULT_SPLIT_BITS};
use std::path::PathBuf;

const VERSION: &str = concat!("version ", env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(about, name = "hexaplex", version = VERSION, disable_version_flag = true)]
/// Hexaplex bulk loading and statistics tools for six-index RDF stores
pub struct Args {
    /// Print version information
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load RDF files into a table of the store
    ///
    /// Source files are parsed, encoded into the six permutation indexes, sorted into segments
    /// and installed into the target table in one atomic step. Supported file extensions are
    /// ttl, nt, nq, trig, rdf, owl, xml and n3, optionally compressed with gz, bz2 or zst.
    #[command(version = VERSION, disable_version_flag = true)]
    Bulkload(BulkLoadArgs),
    /// Compute VoID statistics of a table of the store
    ///
    /// The format of the target file is chosen from its extension. A trailing .gz or .bz2
    /// compresses the output.
    #[command(version = VERSION, disable_version_flag = true)]
    Stats(StatsArgs),
}

#[derive(clap::Args)]
pub struct BulkLoadArgs {
    /// Print version information
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
    /// Directory of the store
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub store: PathBuf,
    /// Source files or directories to load, comma-delimited
    ///
    /// Directories are searched recursively.
    #[arg(short, long)]
    pub source: String,
    /// Directory for the sorted segments, must not exist yet
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub work_dir: PathBuf,
    /// Target table, created if it does not exist
    #[arg(short, long)]
    pub target: String,
    /// Skip invalid source files instead of failing the load
    #[arg(short = 'i', long)]
    pub skip_invalid: bool,
    /// Verify the values of typed literals
    #[arg(short = 'd', long)]
    pub verify_data_types: bool,
    /// Truncate the target table before loading
    #[arg(short = 'r', long)]
    pub truncate_target: bool,
    /// Number of bits used to pre-split a new target table
    #[arg(short = 'b', long, default_value_t = DEFAULT_SPLIT_BITS, value_parser = value_parser!(u8).range(0..=16))]
    pub pre_split_bits: u8,
    /// Graph of statements without one
    ///
    /// "{0}" is replaced by the file URL, "{1}" by its path and "{2}" by the file name.
    #[arg(short = 'g', long)]
    pub graph_context: Option<String>,
    /// Put every statement into the graph given by --graph-context
    ///
    /// Without --graph-context every statement is put into the default graph.
    #[arg(short = 'o', long)]
    pub graph_context_override: bool,
    /// Timestamp of the loaded records in epoch milliseconds, defaults to now
    #[arg(short = 'e', long)]
    pub target_timestamp: Option<u64>,
    /// Maximum number of source bytes parsed by a single task
    #[arg(long, default_value_t = DEFAULT_MAX_SPLIT_SIZE)]
    pub max_split_size: u64,
    /// Maximum number of concurrent tasks, defaults to the number of CPUs
    #[arg(long)]
    pub parallelism: Option<usize>,
}

#[derive(clap::Args)]
pub struct StatsArgs {
    /// Print version information
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
    /// Directory of the store
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub store: PathBuf,
    /// Table to compute the statistics of
    #[arg(short, long)]
    pub source: String,
    /// File path or file: URL of the statistics document
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub target: String,
    /// Maximum number of concurrently scanned regions, defaults to the number of CPUs
    #[arg(long)]
    pub parallelism: Option<usize>,
}
