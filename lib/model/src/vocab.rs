//! Vocabularies used when writing dataset statistics.

use oxrdf::NamedNodeRef;

pub mod rdf {
    use super::NamedNodeRef;

    /// The class of class instances.
    pub const TYPE: NamedNodeRef<'_> = oxrdf::vocab::rdf::TYPE;
}

pub mod xsd {
    use super::NamedNodeRef;

    pub const INTEGER: NamedNodeRef<'_> = oxrdf::vocab::xsd::INTEGER;
}

/// [VoID](https://www.w3.org/TR/void/) vocabulary.
pub mod void {
    use super::NamedNodeRef;

    pub const NAMESPACE: &str = "http://rdfs.org/ns/void#";

    pub const TRIPLES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#triples");
    pub const DISTINCT_SUBJECTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#distinctSubjects");
    pub const PROPERTIES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#properties");
    pub const DISTINCT_OBJECTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#distinctObjects");
    pub const CLASSES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#classes");
}

/// [SPARQL 1.1 Service Description](https://www.w3.org/TR/sparql11-service-description/)
/// vocabulary.
pub mod sd {
    pub const NAMESPACE: &str = "http://www.w3.org/ns/sparql-service-description#";
}
