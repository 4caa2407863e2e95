use crate::{KeyFragment, Permutation, FRAGMENT_LEN};
use hexaplex_model::CorruptionError;

/// The length of a row key of a graph-agnostic permutation.
pub const ROW_KEY_LEN: usize = 1 + FRAGMENT_LEN;

/// The length of a row key of a graph-scoped permutation.
pub const CONTEXT_ROW_KEY_LEN: usize = 1 + 2 * FRAGMENT_LEN;

/// Builds the row key `[tag][context?][primary]`.
///
/// `context` must be given exactly for graph-scoped permutations.
pub fn row_key(
    permutation: Permutation,
    context: Option<&KeyFragment>,
    primary: &KeyFragment,
) -> Vec<u8> {
    debug_assert_eq!(
        permutation.is_graph_scoped(),
        context.is_some(),
        "Graph-scoped rows require a context fragment"
    );
    let mut key = Vec::with_capacity(CONTEXT_ROW_KEY_LEN);
    key.push(permutation.tag());
    if let Some(context) = context {
        key.extend_from_slice(context.as_bytes());
    }
    key.extend_from_slice(primary.as_bytes());
    key
}

/// A parsed view on a row key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowKeyRef<'a> {
    permutation: Permutation,
    context: Option<&'a [u8]>,
    primary: &'a [u8],
}

impl<'a> RowKeyRef<'a> {
    /// Parses a row key.
    ///
    /// Returns an error if the tag is unknown or the key length does not match the permutation.
    pub fn parse(key: &'a [u8]) -> Result<Self, CorruptionError> {
        let (&tag, rest) = key
            .split_first()
            .ok_or_else(|| CorruptionError::msg("Empty row key"))?;
        let permutation = Permutation::from_tag(tag)
            .ok_or_else(|| CorruptionError::msg(format!("Unknown permutation tag {tag}")))?;

        let expected = if permutation.is_graph_scoped() {
            CONTEXT_ROW_KEY_LEN
        } else {
            ROW_KEY_LEN
        };
        if key.len() != expected {
            return Err(CorruptionError::msg(format!(
                "Row key of {permutation} has {} bytes, expected {expected}",
                key.len()
            )));
        }

        let (context, primary) = if permutation.is_graph_scoped() {
            let (context, primary) = rest.split_at(FRAGMENT_LEN);
            (Some(context), primary)
        } else {
            (None, rest)
        };
        Ok(Self {
            permutation,
            context,
            primary,
        })
    }

    pub fn permutation(&self) -> Permutation {
        self.permutation
    }

    /// The fragment of the graph, for graph-scoped permutations.
    pub fn context(&self) -> Option<&'a [u8]> {
        self.context
    }

    /// The fragment of the permutation's first component.
    pub fn primary(&self) -> &'a [u8] {
        self.primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_agnostic_row_key_layout() {
        let primary = KeyFragment::digest("<http://example.com/s>");
        let key = row_key(Permutation::Pos, None, &primary);
        assert_eq!(key.len(), ROW_KEY_LEN);
        assert_eq!(key[0], 1);
        assert_eq!(&key[1..], primary.as_bytes());
    }

    #[test]
    fn graph_scoped_row_key_layout() {
        let context = KeyFragment::digest("<http://example.com/g>");
        let primary = KeyFragment::digest("<http://example.com/s>");
        let key = row_key(Permutation::Cosp, Some(&context), &primary);
        assert_eq!(key.len(), CONTEXT_ROW_KEY_LEN);
        assert_eq!(key[0], 5);

        let parsed = RowKeyRef::parse(&key).unwrap();
        assert_eq!(parsed.permutation(), Permutation::Cosp);
        assert_eq!(parsed.context(), Some(context.as_bytes().as_slice()));
        assert_eq!(parsed.primary(), primary.as_bytes().as_slice());
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let primary = KeyFragment::digest("<http://example.com/s>");
        let mut key = row_key(Permutation::Spo, None, &primary);
        key.push(0);
        assert!(RowKeyRef::parse(&key).is_err());
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        let mut key = vec![9];
        key.extend_from_slice(&[0; FRAGMENT_LEN]);
        assert!(RowKeyRef::parse(&key).is_err());
    }
}
