use std::fmt::{Display, Formatter};

/// Represents what part of an RDF statement is stored at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementComponent {
    /// The subject
    Subject,
    /// The predicate
    Predicate,
    /// The object
    Object,
}

impl Display for StatementComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementComponent::Subject => write!(f, "S"),
            StatementComponent::Predicate => write!(f, "P"),
            StatementComponent::Object => write!(f, "O"),
        }
    }
}

/// One of the six physical orderings of a statement.
///
/// The discriminant is the tag byte that starts every row key of the permutation. Rows of the
/// graph-agnostic permutations (tags `0..=2`) are keyed by the first component only, rows of the
/// graph-scoped permutations (tags `3..=5`) by the graph followed by the first component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Permutation {
    Spo = 0,
    Pos = 1,
    Osp = 2,
    Cspo = 3,
    Cpos = 4,
    Cosp = 5,
}

impl Permutation {
    /// All permutations in tag order.
    pub const ALL: [Permutation; 6] = [
        Permutation::Spo,
        Permutation::Pos,
        Permutation::Osp,
        Permutation::Cspo,
        Permutation::Cpos,
        Permutation::Cosp,
    ];

    /// The permutations every statement is stored in.
    pub const GRAPH_AGNOSTIC: [Permutation; 3] =
        [Permutation::Spo, Permutation::Pos, Permutation::Osp];

    /// The permutations only statements of a named graph are stored in.
    pub const GRAPH_SCOPED: [Permutation; 3] =
        [Permutation::Cspo, Permutation::Cpos, Permutation::Cosp];

    /// Returns the tag byte of the permutation.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the permutation for the given tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Returns true if rows of this permutation are scoped to a graph.
    pub fn is_graph_scoped(self) -> bool {
        self.tag() >= Permutation::Cspo.tag()
    }

    /// Returns the statement components in the order of this permutation.
    pub fn components(self) -> [StatementComponent; 3] {
        use StatementComponent::{Object, Predicate, Subject};
        match self {
            Permutation::Spo | Permutation::Cspo => [Subject, Predicate, Object],
            Permutation::Pos | Permutation::Cpos => [Predicate, Object, Subject],
            Permutation::Osp | Permutation::Cosp => [Object, Subject, Predicate],
        }
    }

    /// Returns the component the rows of this permutation are keyed by.
    pub fn primary(self) -> StatementComponent {
        self.components()[0]
    }
}

impl Display for Permutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_graph_scoped() {
            write!(f, "C")?;
        }
        for component in self.components() {
            write!(f, "{component}")?;
        }
        Ok(())
    }
}
