//! The key encoding of the Hexaplex permutation indexes.
//!
//! Every statement is stored in three graph-agnostic permutation indexes (SPO, POS, OSP) and, if
//! it belongs to a named graph, in three additional graph-scoped indexes (CSPO, CPOS, COSP). A
//! row of an index is addressed by the [Permutation] tag followed by the [KeyFragment]s of the
//! permutation's key terms. All statements sharing these key terms are cells of the same row and
//! are told apart by their qualifier, which holds the canonical text of the statement components.
//!
//! The main entry points are [encode_statement] and [decode_qualifier].

mod codec;
mod digest;
mod error;
mod permutation;
mod qualifier;
mod record;
mod row_key;

pub use codec::*;
pub use digest::*;
pub use error::*;
pub use permutation::*;
pub use qualifier::*;
pub use record::*;
pub use row_key::*;
