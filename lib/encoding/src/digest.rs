use sha1::{Digest, Sha1};
use std::fmt::{Debug, Formatter};

/// The number of bytes of a [KeyFragment].
pub const FRAGMENT_LEN: usize = 20;

/// A fixed-width digest of the canonical text of an RDF term.
///
/// Fragments are used as row key material. Distinct terms are assumed to have distinct fragments.
/// This is not verified. Two colliding terms would share their rows.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyFragment([u8; FRAGMENT_LEN]);

impl KeyFragment {
    /// Computes the fragment of the given canonical term text.
    pub fn digest(canonical_text: impl AsRef<[u8]>) -> Self {
        let hash = Sha1::digest(canonical_text.as_ref());
        let mut bytes = [0; FRAGMENT_LEN];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Reads a fragment from the first [FRAGMENT_LEN] bytes of `bytes`.
    ///
    /// Returns [None] if `bytes` is too short.
    pub fn from_prefix(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..FRAGMENT_LEN)?;
        let mut fragment = [0; FRAGMENT_LEN];
        fragment.copy_from_slice(bytes);
        Some(Self(fragment))
    }

    pub fn as_bytes(&self) -> &[u8; FRAGMENT_LEN] {
        &self.0
    }
}

impl Debug for KeyFragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyFragment({})", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for KeyFragment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn digest_is_deterministic() {
        let text = "<http://example.com/s>";
        assert_eq!(KeyFragment::digest(text), KeyFragment::digest(text));
    }

    #[test]
    fn digest_is_sha1() {
        let fragment = KeyFragment::digest("abc");
        assert_eq!(
            hex::encode(fragment.as_bytes()),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn digest_has_no_collisions_in_sample() {
        let fragments = (0..10_000)
            .map(|i| KeyFragment::digest(format!("<http://example.com/resource/{i}>")))
            .collect::<HashSet<_>>();
        assert_eq!(fragments.len(), 10_000);
    }

    #[test]
    fn from_prefix_requires_enough_bytes() {
        let fragment = KeyFragment::digest("x");
        let mut bytes = fragment.as_bytes().to_vec();
        bytes.push(7);
        assert_eq!(KeyFragment::from_prefix(&bytes), Some(fragment));
        assert_eq!(KeyFragment::from_prefix(&bytes[..10]), None);
    }

    #[test]
    fn debug_prints_hex() {
        let fragment = KeyFragment::digest("abc");
        assert_eq!(
            format!("{fragment:?}"),
            "KeyFragment(a9993e364706816aba3e25717850c26c9cd0d89d)"
        );
    }
}
