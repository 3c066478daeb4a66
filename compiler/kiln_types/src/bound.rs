//! Concrete instantiations of declarations.

use crate::DeclId;

/// Ordered generic arguments of a [`BoundType`].
pub type GenericArgs = Vec<BoundType>;

/// A declaration applied to concrete arguments, e.g. `Pair<Int, Double>`.
///
/// Equality and hashing are structural, which is what planning sessions
/// key on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundType {
    pub decl: DeclId,
    pub args: GenericArgs,
}

impl BoundType {
    #[inline]
    pub fn new(decl: DeclId, args: GenericArgs) -> Self {
        BoundType { decl, args }
    }

    /// A non-generic type.
    #[inline]
    pub fn leaf(decl: DeclId) -> Self {
        BoundType {
            decl,
            args: Vec::new(),
        }
    }

    /// Nesting depth: a leaf is 1, `Box<Box<Int>>` is 3.
    pub fn depth(&self) -> usize {
        1 + self.args.iter().map(BoundType::depth).max().unwrap_or(0)
    }
}
