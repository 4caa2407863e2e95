//! The RDF data model shared by all Hexaplex crates.
//!
//! A statement is represented by an oxrdf [Quad]. A quad in the [GraphName::DefaultGraph] is a
//! statement without a graph, every other graph name is the statement's context.

mod error;
mod literal;
pub mod vocab;

pub use error::*;
pub use literal::*;

// Re-export some oxrdf types.
pub use oxiri::Iri;
pub use oxrdf::{
    BlankNode, BlankNodeRef, GraphName, GraphNameRef, IriParseError, Literal, LiteralRef,
    NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Subject,
    SubjectRef, Term, TermParseError, TermRef, Triple, TripleRef,
};
