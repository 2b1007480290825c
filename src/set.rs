use core::cmp::Ordering;

use crate::node::{Arena, Color, NIL};

/// An ordered set of unique keys backed by an arena-allocated red-black tree.
///
/// Keys need nothing beyond [`Ord`]. Insertion, removal, and membership run
/// in O(log n); the length is tracked in O(1). Nodes live in a growable
/// arena addressed by stable indices, with slot 0 reserved for the
/// per-instance sentinel that stands in for every absent child and for the
/// root's absent parent.
///
/// After every completed mutation the structure upholds the red-black
/// properties: the root and the sentinel are black, no red node has a red
/// parent, every root-to-leaf path carries the same number of black nodes,
/// and an in-order walk yields the keys in strictly increasing order.
/// [`RbSet::validate`] checks all of them on demand.
///
/// `RbSet` deliberately implements neither `Clone` nor `Copy`: deep-copying
/// the arena is a non-goal, and a shallow copy would be meaningless.
#[derive(Debug)]
pub struct RbSet<K> {
    pub(crate) arena: Arena<K>,
    pub(crate) root: usize,
    pub(crate) len: usize,
}

impl<K: Ord> RbSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: NIL,
            len: 0,
        }
    }

    /// Number of keys currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no keys are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` iff `key` is present. O(log n), no side effects.
    pub fn contains(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Smallest key in the set, or `None` when empty.
    pub fn min(&self) -> Option<&K> {
        if self.root == NIL {
            return None;
        }
        Some(self.arena.key(self.minimum(self.root)))
    }

    /// Largest key in the set, or `None` when empty.
    pub fn max(&self) -> Option<&K> {
        if self.root == NIL {
            return None;
        }
        Some(self.arena.key(self.maximum(self.root)))
    }

    /// Inserts `key` if absent. Returns `true` iff the set changed.
    ///
    /// Duplicates are rejected silently: inserting a key that is already
    /// present leaves the set untouched and returns `false`.
    pub fn insert(&mut self, key: K) -> bool {
        // Descend as in a lookup, remembering the last real node visited
        // so the new node can be linked under it.
        let mut parent = NIL;
        let mut cur = self.root;
        while cur != NIL {
            parent = cur;
            cur = match key.cmp(self.arena.key(cur)) {
                Ordering::Equal => return false,
                Ordering::Less => self.left(cur),
                Ordering::Greater => self.right(cur),
            };
        }

        let idx = self.arena.allocate(key, parent);
        if parent == NIL {
            self.root = idx;
        } else if self.arena.key(idx) < self.arena.key(parent) {
            self.arena.node_at_mut(parent).left = idx;
        } else {
            self.arena.node_at_mut(parent).right = idx;
        }

        self.len += 1;
        self.insert_fixup(idx);
        true
    }

    /// Removes `key` if present. Returns `true` iff the set changed.
    ///
    /// Removing an absent key is a no-op, not an error.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(z) = self.find_node(key) else {
            return false;
        };

        // y is the node physically spliced out: z itself when z has at most
        // one real child, otherwise z's successor, which has no left child.
        let y = if self.left(z) == NIL || self.right(z) == NIL {
            z
        } else {
            self.successor(z)
        };
        let x = if self.left(y) != NIL {
            self.left(y)
        } else {
            self.right(y)
        };

        // Splice y out by linking x into y's parent slot. The parent link
        // is written even when x is the sentinel: the fixup reads it to
        // locate x's position in the tree.
        let y_parent = self.parent(y);
        self.arena.node_at_mut(x).parent = y_parent;
        if y_parent == NIL {
            self.root = x;
        } else if y == self.left(y_parent) {
            self.arena.node_at_mut(y_parent).left = x;
        } else {
            self.arena.node_at_mut(y_parent).right = x;
        }

        // When the successor was spliced out, its key survives in z.
        if y != z {
            self.arena.move_key(y, z);
        }

        let y_was_black = self.is_black(y);
        self.arena.release(y);
        if y_was_black {
            self.remove_fixup(x);
        }

        self.arena.reset_sentinel();
        self.len -= 1;
        true
    }

    /// Drops every key, keeping the allocation of the sentinel slot.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = NIL;
        self.len = 0;
    }

    /// Locates the slot holding `key`, descending from the root.
    pub(crate) fn find_node(&self, key: &K) -> Option<usize> {
        let mut cur = self.root;
        while cur != NIL {
            match key.cmp(self.arena.key(cur)) {
                Ordering::Equal => return Some(cur),
                Ordering::Less => cur = self.left(cur),
                Ordering::Greater => cur = self.right(cur),
            }
        }
        None
    }

    /// Leftmost node of the subtree rooted at `x`. Precondition: `x != NIL`.
    pub(crate) fn minimum(&self, mut x: usize) -> usize {
        debug_assert!(x != NIL);
        while self.left(x) != NIL {
            x = self.left(x);
        }
        x
    }

    /// Rightmost node of the subtree rooted at `x`. Precondition: `x != NIL`.
    pub(crate) fn maximum(&self, mut x: usize) -> usize {
        debug_assert!(x != NIL);
        while self.right(x) != NIL {
            x = self.right(x);
        }
        x
    }

    /// Node holding the next larger key, or `NIL` if `x` is the maximum.
    pub(crate) fn successor(&self, mut x: usize) -> usize {
        if self.right(x) != NIL {
            return self.minimum(self.right(x));
        }
        let mut y = self.parent(x);
        while y != NIL && x == self.right(y) {
            x = y;
            y = self.parent(y);
        }
        y
    }

    /// Node holding the next smaller key, or `NIL` if `x` is the minimum.
    #[allow(dead_code)]
    pub(crate) fn predecessor(&self, mut x: usize) -> usize {
        if self.left(x) != NIL {
            return self.maximum(self.left(x));
        }
        let mut y = self.parent(x);
        while y != NIL && x == self.left(y) {
            x = y;
            y = self.parent(y);
        }
        y
    }

    #[inline]
    fn parent(&self, idx: usize) -> usize {
        self.arena.node_at(idx).parent
    }

    #[inline]
    fn left(&self, idx: usize) -> usize {
        self.arena.node_at(idx).left
    }

    #[inline]
    fn right(&self, idx: usize) -> usize {
        self.arena.node_at(idx).right
    }

    #[inline]
    fn color_of(&self, idx: usize) -> Color {
        self.arena.node_at(idx).color
    }

    #[inline]
    pub(crate) fn is_red(&self, idx: usize) -> bool {
        self.color_of(idx) == Color::Red
    }

    #[inline]
    fn is_black(&self, idx: usize) -> bool {
        self.color_of(idx) == Color::Black
    }

    /// Recolors `idx`, ignoring writes aimed at the sentinel.
    #[inline]
    fn set_color(&mut self, idx: usize, color: Color) {
        if idx != NIL {
            self.arena.node_at_mut(idx).color = color;
        }
    }

    /// Promotes `x`'s right child into `x`'s position.
    ///
    /// In-order sequence is preserved; only links around the `x`-child edge
    /// change. Precondition: the right child is not the sentinel.
    fn rotate_left(&mut self, x: usize) {
        let y = self.right(x);
        debug_assert!(y != NIL, "left rotation requires a real right child");

        let y_left = self.left(y);
        self.arena.node_at_mut(x).right = y_left;
        if y_left != NIL {
            self.arena.node_at_mut(y_left).parent = x;
        }

        let x_parent = self.parent(x);
        self.arena.node_at_mut(y).parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if x == self.left(x_parent) {
            self.arena.node_at_mut(x_parent).left = y;
        } else {
            self.arena.node_at_mut(x_parent).right = y;
        }

        self.arena.node_at_mut(y).left = x;
        self.arena.node_at_mut(x).parent = y;
    }

    /// Promotes `x`'s left child into `x`'s position. Mirror of
    /// [`RbSet::rotate_left`].
    fn rotate_right(&mut self, x: usize) {
        let y = self.left(x);
        debug_assert!(y != NIL, "right rotation requires a real left child");

        let y_right = self.right(y);
        self.arena.node_at_mut(x).left = y_right;
        if y_right != NIL {
            self.arena.node_at_mut(y_right).parent = x;
        }

        let x_parent = self.parent(x);
        self.arena.node_at_mut(y).parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if x == self.left(x_parent) {
            self.arena.node_at_mut(x_parent).left = y;
        } else {
            self.arena.node_at_mut(x_parent).right = y;
        }

        self.arena.node_at_mut(y).right = x;
        self.arena.node_at_mut(x).parent = y;
    }

    /// Restores the red-black properties after linking in the red node `x`.
    ///
    /// Walks upward while `x`'s parent is red; the sentinel being black
    /// bounds the loop at the root.
    fn insert_fixup(&mut self, mut x: usize) {
        while self.is_red(self.parent(x)) {
            let p = self.parent(x);
            let g = self.parent(p);
            if p == self.left(g) {
                let u = self.right(g);
                if self.is_red(u) {
                    // Red uncle: recolor and retry two levels up.
                    self.set_color(p, Color::Black);
                    self.set_color(u, Color::Black);
                    self.set_color(g, Color::Red);
                    x = g;
                } else {
                    if x == self.right(p) {
                        // Inner grandchild: rotate into the outer case.
                        x = p;
                        self.rotate_left(x);
                    }
                    let p = self.parent(x);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let u = self.left(g);
                if self.is_red(u) {
                    self.set_color(p, Color::Black);
                    self.set_color(u, Color::Black);
                    self.set_color(g, Color::Red);
                    x = g;
                } else {
                    if x == self.left(p) {
                        x = p;
                        self.rotate_right(x);
                    }
                    let p = self.parent(x);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Resolves the black deficiency carried by `x` after a black node was
    /// spliced out of `x`'s position.
    ///
    /// `x` may be the sentinel; its parent link was set during splicing so
    /// the sibling lookups below still land on the right nodes.
    fn remove_fixup(&mut self, mut x: usize) {
        while x != self.root && self.is_black(x) {
            let p = self.parent(x);
            if x == self.left(p) {
                let mut w = self.right(p);
                if self.is_red(w) {
                    // Red sibling: rotate it above x so the cases below
                    // see a black one.
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_left(p);
                    w = self.right(self.parent(x));
                }
                if self.is_black(self.left(w)) && self.is_black(self.right(w)) {
                    // Deficiency moves up to the parent.
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.is_black(self.right(w)) {
                        // Near child red, far child black: rotate into the
                        // far-child case.
                        let w_left = self.left(w);
                        self.set_color(w_left, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(self.parent(x));
                    }
                    let p = self.parent(x);
                    self.set_color(w, self.color_of(p));
                    self.set_color(p, Color::Black);
                    let w_right = self.right(w);
                    self.set_color(w_right, Color::Black);
                    self.rotate_left(p);
                    x = self.root;
                }
            } else {
                let mut w = self.left(p);
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_right(p);
                    w = self.left(self.parent(x));
                }
                if self.is_black(self.right(w)) && self.is_black(self.left(w)) {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.is_black(self.left(w)) {
                        let w_right = self.right(w);
                        self.set_color(w_right, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(self.parent(x));
                    }
                    let p = self.parent(x);
                    self.set_color(w, self.color_of(p));
                    self.set_color(p, Color::Black);
                    let w_left = self.left(w);
                    self.set_color(w_left, Color::Black);
                    self.rotate_right(p);
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}

impl<K: Ord> Default for RbSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
