use oxrdfio::RdfFormat;

/// The file name extensions of the supported serializations. Each ambiguous format has a single
/// canonical entry.
const FORMATS: &[(&str, RdfFormat)] = &[
    ("ttl", RdfFormat::Turtle),
    ("nt", RdfFormat::NTriples),
    ("nq", RdfFormat::NQuads),
    ("trig", RdfFormat::TriG),
    ("rdf", RdfFormat::RdfXml),
    ("owl", RdfFormat::RdfXml),
    ("xml", RdfFormat::RdfXml),
    ("n3", RdfFormat::N3),
];

/// Returns the serialization registered for the file name extension `ext`.
pub fn format_for_extension(ext: &str) -> Option<RdfFormat> {
    FORMATS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
        .map(|(_, format)| *format)
}

/// Returns all registered file name extensions.
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    FORMATS.iter().map(|(ext, _)| *ext)
}
