use crate::EncodingError;
use hexaplex_model::CorruptionError;
use std::str;

/// The number of length-prefixed fields at the start of every qualifier.
pub const QUALIFIER_FIELDS: usize = 3;

const LENGTH_LEN: usize = 4;

/// Builds a qualifier payload.
///
/// The payload holds the three statement components in permutation order, each as a 32-bit
/// big-endian length followed by the canonical text, and then the canonical text of the graph
/// without any length prefix. Fails if a field does not fit into its length field.
pub fn encode_qualifier(
    fields: [&str; QUALIFIER_FIELDS],
    graph: Option<&str>,
) -> Result<Vec<u8>, EncodingError> {
    let capacity = fields
        .iter()
        .map(|field| LENGTH_LEN + field.len())
        .sum::<usize>()
        + graph.map_or(0, str::len);
    let mut qualifier = Vec::with_capacity(capacity);
    for field in fields {
        let len = field_len(field.len())?;
        qualifier.extend_from_slice(&len.to_be_bytes());
        qualifier.extend_from_slice(field.as_bytes());
    }
    if let Some(graph) = graph {
        qualifier.extend_from_slice(graph.as_bytes());
    }
    Ok(qualifier)
}

fn field_len(len: usize) -> Result<u32, EncodingError> {
    u32::try_from(len).map_err(|_| EncodingError::FieldTooLarge(len))
}

/// The canonical texts held by a qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedQualifier<'a> {
    /// The statement components in the order of the row's permutation.
    pub fields: [&'a str; QUALIFIER_FIELDS],
    /// The canonical text of the graph for rows of graph-scoped permutations.
    pub graph: Option<&'a str>,
}

/// Decodes a qualifier payload into canonical term texts.
///
/// Any bytes after the declared fields are the graph's canonical text. An empty trailer means the
/// qualifier belongs to a graph-agnostic row.
pub fn decode_qualifier(qualifier: &[u8]) -> Result<DecodedQualifier<'_>, CorruptionError> {
    let mut fields = [""; QUALIFIER_FIELDS];
    let mut rest = qualifier;
    for field in &mut fields {
        let (bytes, remaining) = split_field(rest)?;
        *field = to_str(bytes)?;
        rest = remaining;
    }
    let graph = if rest.is_empty() {
        None
    } else {
        Some(to_str(rest)?)
    };
    Ok(DecodedQualifier { fields, graph })
}

/// Returns the raw bytes of the field at `index` without decoding the others.
pub fn qualifier_field(qualifier: &[u8], index: usize) -> Result<&[u8], CorruptionError> {
    let mut rest = qualifier;
    for current in 0..QUALIFIER_FIELDS {
        let (bytes, remaining) = split_field(rest)?;
        if current == index {
            return Ok(bytes);
        }
        rest = remaining;
    }
    Err(CorruptionError::msg(format!(
        "Qualifier field {index} does not exist"
    )))
}

/// Returns the bytes following the declared fields.
///
/// For rows of graph-scoped permutations this is the canonical text of the graph.
pub fn qualifier_trailer(qualifier: &[u8]) -> Result<&[u8], CorruptionError> {
    let mut rest = qualifier;
    for _ in 0..QUALIFIER_FIELDS {
        rest = split_field(rest)?.1;
    }
    Ok(rest)
}

fn split_field(bytes: &[u8]) -> Result<(&[u8], &[u8]), CorruptionError> {
    if bytes.len() < LENGTH_LEN {
        return Err(CorruptionError::msg(format!(
            "Qualifier ends inside a length field ({} bytes left)",
            bytes.len()
        )));
    }
    let (len, rest) = bytes.split_at(LENGTH_LEN);
    let len = u32::from_be_bytes([len[0], len[1], len[2], len[3]]);
    let len = usize::try_from(len).map_err(CorruptionError::new)?;
    if rest.len() < len {
        return Err(CorruptionError::msg(format!(
            "Qualifier declares a field of {len} bytes but only {} bytes are left",
            rest.len()
        )));
    }
    Ok(rest.split_at(len))
}

fn to_str(bytes: &[u8]) -> Result<&str, CorruptionError> {
    str::from_utf8(bytes).map_err(CorruptionError::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_without_graph() {
        let qualifier = encode_qualifier(["<s>", "<p>", "\"o\""], None).unwrap();
        let decoded = decode_qualifier(&qualifier).unwrap();
        assert_eq!(decoded.fields, ["<s>", "<p>", "\"o\""]);
        assert_eq!(decoded.graph, None);
    }

    #[test]
    fn decode_with_graph() {
        let qualifier = encode_qualifier(["<p>", "<o>", "<s>"], Some("<g>")).unwrap();
        let decoded = decode_qualifier(&qualifier).unwrap();
        assert_eq!(decoded.fields, ["<p>", "<o>", "<s>"]);
        assert_eq!(decoded.graph, Some("<g>"));
    }

    #[test]
    fn layout_is_length_prefixed_big_endian() {
        let qualifier = encode_qualifier(["ab", "", "c"], Some("g")).unwrap();
        assert_eq!(
            qualifier,
            [0, 0, 0, 2, b'a', b'b', 0, 0, 0, 0, 0, 0, 0, 1, b'c', b'g']
        );
    }

    #[test]
    fn field_and_trailer_access() {
        let qualifier = encode_qualifier(["<p>", "<o>", "<s>"], Some("<g>")).unwrap();
        assert_eq!(qualifier_field(&qualifier, 1).unwrap(), b"<o>");
        assert_eq!(qualifier_trailer(&qualifier).unwrap(), b"<g>");
        assert!(qualifier_field(&qualifier, 3).is_err());
    }

    #[test]
    fn declared_length_beyond_payload_is_corrupt() {
        let mut qualifier = encode_qualifier(["<s>", "<p>", "<o>"], None).unwrap();
        qualifier[3] = 200;
        assert!(decode_qualifier(&qualifier).is_err());
    }

    #[test]
    fn truncated_length_field_is_corrupt() {
        let qualifier = encode_qualifier(["<s>", "<p>", "<o>"], None).unwrap();
        assert!(decode_qualifier(&qualifier[..qualifier.len() - 5]).is_err());
        assert!(qualifier_trailer(&[0, 0]).is_err());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_field_is_rejected() {
        let len = usize::try_from(u32::MAX).unwrap() + 1;
        assert_eq!(field_len(len), Err(EncodingError::FieldTooLarge(len)));
        assert_eq!(field_len(3), Ok(3));
    }

    #[test]
    fn invalid_utf8_is_corrupt() {
        let qualifier = [0, 0, 0, 1, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(decode_qualifier(&qualifier).is_err());
    }
}
