use core::fmt;

/// A structural invariant broken somewhere in the tree, reported by
/// [`RbSet::validate`](crate::RbSet::validate).
///
/// Lookups and mutations never produce these. A violation means a latent
/// defect in the tree itself, not a runtime condition to recover from, and
/// callers should treat one as a hard bug signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The in-order key sequence is not strictly increasing.
    OutOfOrder,
    /// The sentinel's links or color were modified.
    SentinelCorrupted,
    /// The root node is not black.
    RootNotBlack,
    /// A red node has a red parent.
    DoubleRed,
    /// Two sibling subtrees disagree on the number of black nodes per path.
    BlackHeightMismatch,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::OutOfOrder => "in-order key sequence is not strictly increasing",
            Self::SentinelCorrupted => "sentinel links or color were modified",
            Self::RootNotBlack => "root is not black",
            Self::DoubleRed => "red node has a red parent",
            Self::BlackHeightMismatch => "black-height differs between sibling subtrees",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for InvariantViolation {}
