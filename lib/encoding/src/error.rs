/// A statement that cannot be represented in the index layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// A canonical term text does not fit into a 32-bit qualifier length field.
    #[error("A term of {0} bytes exceeds the maximal qualifier field length")]
    FieldTooLarge(usize),
}
