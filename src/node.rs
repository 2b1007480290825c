use alloc::vec::Vec;

/// Index of the reserved sentinel slot.
///
/// The sentinel stands in for every absent child and for the root's absent
/// parent, so rotations and fixups never special-case "no child" or "no
/// parent". It is always black and, at rest, its links point back at itself.
pub(crate) const NIL: usize = 0;

/// Node colors maintaining the balance properties of the tree.
///
/// The tree stays balanced by ensuring:
/// - Red nodes have black children
/// - All paths from a node down to its leaves carry equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A node slot holding one stored key and its tree relationships.
#[derive(Debug)]
pub(crate) struct Node<K> {
    /// The stored key. `None` only in the sentinel and in vacated slots.
    pub(crate) key: Option<K>,

    /// Color of this node, used for rebalancing.
    pub(crate) color: Color,

    /// Index of the parent node (`NIL` for the root).
    pub(crate) parent: usize,

    /// Index of the left child (`NIL` if none).
    pub(crate) left: usize,

    /// Index of the right child (`NIL` if none).
    pub(crate) right: usize,
}

/// Growable slab of node slots addressed by stable indices.
///
/// Slot 0 is the per-instance sentinel. Slots vacated by removals are kept
/// on a free list and handed back out before the slab grows, so a workload
/// that inserts and removes in roughly equal measure settles on a fixed
/// footprint. Dropping the arena drops every node in one pass, with no
/// recursion over the tree structure.
#[derive(Debug)]
pub(crate) struct Arena<K> {
    nodes: Vec<Node<K>>,
    free: Vec<usize>,
}

impl<K> Arena<K> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Self::sentinel()],
            free: Vec::new(),
        }
    }

    const fn sentinel() -> Node<K> {
        Node {
            key: None,
            color: Color::Black,
            parent: NIL,
            left: NIL,
            right: NIL,
        }
    }

    /// Number of slots ever allocated, vacant ones and the sentinel included.
    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn node_at(&self, idx: usize) -> &Node<K> {
        &self.nodes[idx]
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, idx: usize) -> &mut Node<K> {
        &mut self.nodes[idx]
    }

    /// Returns the key stored at `idx`.
    ///
    /// Precondition: `idx` is a live, non-sentinel slot.
    #[inline]
    pub(crate) fn key(&self, idx: usize) -> &K {
        debug_assert!(idx != NIL, "sentinel carries no key");
        match self.nodes[idx].key.as_ref() {
            Some(key) => key,
            None => panic!("key read from a vacant slot"),
        }
    }

    /// Moves the key out of `src` into `dst`, leaving `src` key-less.
    pub(crate) fn move_key(&mut self, src: usize, dst: usize) {
        debug_assert!(src != NIL && dst != NIL);
        let key = self.nodes[src].key.take();
        self.nodes[dst].key = key;
    }

    /// Hands out a slot holding a fresh red node with sentinel children.
    ///
    /// Reuses a vacated slot when one is available, otherwise grows the slab.
    pub(crate) fn allocate(&mut self, key: K, parent: usize) -> usize {
        let node = Node {
            key: Some(key),
            color: Color::Red,
            parent,
            left: NIL,
            right: NIL,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Vacates `idx` and queues it for reuse.
    pub(crate) fn release(&mut self, idx: usize) {
        debug_assert!(idx != NIL, "cannot release the sentinel");
        self.nodes[idx].key = None;
        self.free.push(idx);
    }

    /// Puts the sentinel back in its rest state.
    ///
    /// Deletion splicing may write the sentinel's parent link; this undoes
    /// that before the mutation returns.
    pub(crate) fn reset_sentinel(&mut self) {
        self.nodes[NIL] = Self::sentinel();
    }

    /// Drops every node except the sentinel.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.reset_sentinel();
        self.free.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::all)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_initial_state() {
        let arena = Arena::<i32>::new();
        let sentinel = arena.node_at(NIL);
        assert_eq!(sentinel.color, Color::Black);
        assert_eq!(sentinel.parent, NIL);
        assert_eq!(sentinel.left, NIL);
        assert_eq!(sentinel.right, NIL);
        assert!(sentinel.key.is_none());
        assert_eq!(arena.slot_count(), 1);
    }

    #[test]
    fn test_allocate_reuses_released_slots() {
        let mut arena = Arena::<i32>::new();
        let a = arena.allocate(1, NIL);
        let b = arena.allocate(2, a);
        assert_eq!(arena.slot_count(), 3);

        arena.release(b);
        assert!(arena.node_at(b).key.is_none());

        let c = arena.allocate(3, NIL);
        assert_eq!(c, b);
        assert_eq!(arena.slot_count(), 3);
        assert_eq!(*arena.key(c), 3);
        assert_eq!(arena.node_at(c).color, Color::Red);
        assert_eq!(arena.node_at(c).left, NIL);
        assert_eq!(arena.node_at(c).right, NIL);
    }

    #[test]
    fn test_move_key_vacates_source() {
        let mut arena = Arena::<i32>::new();
        let a = arena.allocate(1, NIL);
        let b = arena.allocate(2, a);

        arena.move_key(b, a);
        assert_eq!(*arena.key(a), 2);
        assert!(arena.node_at(b).key.is_none());
    }

    #[test]
    fn test_reset_sentinel_undoes_writes() {
        let mut arena = Arena::<i32>::new();
        let a = arena.allocate(1, NIL);
        arena.node_at_mut(NIL).parent = a;

        arena.reset_sentinel();
        let sentinel = arena.node_at(NIL);
        assert_eq!(sentinel.parent, NIL);
        assert_eq!(sentinel.color, Color::Black);
    }

    #[test]
    fn test_clear_keeps_only_sentinel() {
        let mut arena = Arena::<i32>::new();
        let a = arena.allocate(1, NIL);
        arena.allocate(2, a);
        arena.release(a);

        arena.clear();
        assert_eq!(arena.slot_count(), 1);

        let b = arena.allocate(7, NIL);
        assert_eq!(b, 1);
        assert_eq!(*arena.key(b), 7);
    }
}
