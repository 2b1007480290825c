use alloc::vec::Vec;

use crate::error::InvariantViolation;
use crate::node::{Color, NIL};
use crate::set::RbSet;

impl<K: Ord> RbSet<K> {
    /// Checks every structural invariant of the tree, reporting the first
    /// violation found.
    ///
    /// Verified in order: the in-order key sequence is strictly increasing,
    /// the sentinel is black with self-referential links, the root is black,
    /// no red node has a red parent, and every node's two subtrees agree on
    /// their black-height.
    ///
    /// This is a test and debugging aid, never run by the mutation path.
    /// O(n); both walks use explicit iteration instead of recursion, so
    /// arbitrarily large trees cannot overflow the call stack.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        // In-order walk via the traversal primitives.
        if self.root != NIL {
            let mut x = self.minimum(self.root);
            loop {
                let next = self.successor(x);
                if next == NIL {
                    break;
                }
                if self.arena.key(next) <= self.arena.key(x) {
                    return Err(InvariantViolation::OutOfOrder);
                }
                x = next;
            }
        }

        // The sentinel must be at rest between mutations.
        let sentinel = self.arena.node_at(NIL);
        if sentinel.left != NIL || sentinel.right != NIL || sentinel.color != Color::Black {
            return Err(InvariantViolation::SentinelCorrupted);
        }

        if self.is_red(self.root) {
            return Err(InvariantViolation::RootNotBlack);
        }

        // Post-order black-height computation over an explicit stack.
        // Red-red adjacency is checked on first visit, heights once both
        // children are done. Slot 0 of `black_height` doubles as the
        // sentinel's height of zero and is never written.
        let mut black_height = vec![0usize; self.arena.slot_count()];
        let mut stack: Vec<(usize, bool)> = vec![(self.root, false)];
        while let Some((x, children_done)) = stack.pop() {
            if x == NIL {
                continue;
            }
            let node = self.arena.node_at(x);
            if children_done {
                let left_height = black_height[node.left];
                let right_height = black_height[node.right];
                if left_height != right_height {
                    return Err(InvariantViolation::BlackHeightMismatch);
                }
                black_height[x] = left_height + usize::from(node.color == Color::Black);
            } else {
                if node.color == Color::Red && self.arena.node_at(node.parent).color == Color::Red {
                    return Err(InvariantViolation::DoubleRed);
                }
                stack.push((x, true));
                stack.push((node.left, false));
                stack.push((node.right, false));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::all)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_trees_pass() {
        let mut set = RbSet::new();
        set.validate().unwrap();
        for k in [10, 5, 11, 1, 7, 0] {
            set.insert(k);
            set.validate().unwrap();
        }
        for k in [5, 10, 0] {
            set.remove(&k);
            set.validate().unwrap();
        }
    }

    #[test]
    fn test_detects_red_root() {
        let mut set = RbSet::new();
        for k in [1, 2, 3] {
            set.insert(k);
        }
        set.arena.node_at_mut(set.root).color = Color::Red;
        assert_eq!(set.validate(), Err(InvariantViolation::RootNotBlack));
    }

    #[test]
    fn test_detects_red_red_adjacency() {
        // 1..=4 builds a black root (2) with black children (1, 3) and a
        // red 4 under 3; repainting 3 red puts two reds in a row.
        let mut set = RbSet::new();
        for k in 1..=4 {
            set.insert(k);
        }
        let three = set.find_node(&3).unwrap();
        set.arena.node_at_mut(three).color = Color::Red;
        assert_eq!(set.validate(), Err(InvariantViolation::DoubleRed));
    }

    #[test]
    fn test_detects_black_height_mismatch() {
        // Repainting the lone red leaf black lengthens one path only.
        let mut set = RbSet::new();
        for k in 1..=4 {
            set.insert(k);
        }
        let four = set.find_node(&4).unwrap();
        set.arena.node_at_mut(four).color = Color::Black;
        assert_eq!(set.validate(), Err(InvariantViolation::BlackHeightMismatch));
    }

    #[test]
    fn test_detects_out_of_order_keys() {
        let mut set = RbSet::new();
        for k in [1, 2, 3] {
            set.insert(k);
        }
        let one = set.find_node(&1).unwrap();
        let three = set.find_node(&3).unwrap();
        set.arena.node_at_mut(one).key = Some(3);
        set.arena.node_at_mut(three).key = Some(1);
        assert_eq!(set.validate(), Err(InvariantViolation::OutOfOrder));
    }

    #[test]
    fn test_detects_sentinel_corruption() {
        let mut set = RbSet::new();
        set.insert(1);
        set.arena.node_at_mut(NIL).color = Color::Red;
        assert_eq!(set.validate(), Err(InvariantViolation::SentinelCorrupted));

        let mut set = RbSet::new();
        set.insert(1);
        let root = set.root;
        set.arena.node_at_mut(NIL).left = root;
        assert_eq!(set.validate(), Err(InvariantViolation::SentinelCorrupted));
    }

    #[test]
    fn test_violation_messages_name_the_invariant() {
        use alloc::string::ToString;

        let violations = [
            InvariantViolation::OutOfOrder,
            InvariantViolation::SentinelCorrupted,
            InvariantViolation::RootNotBlack,
            InvariantViolation::DoubleRed,
            InvariantViolation::BlackHeightMismatch,
        ];
        let mut seen = alloc::vec::Vec::new();
        for violation in violations {
            let msg = violation.to_string();
            assert!(!msg.is_empty());
            assert!(!seen.contains(&msg));
            seen.push(msg);
        }
    }
}
