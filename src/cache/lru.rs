//! LRU Recency List Module
//!
//! Implements the recency order used for LRU eviction as a doubly-linked list
//! threaded through a slot arena, so that touching, inserting and evicting an
//! entry are all O(1).

use crate::cache::CacheEntry;

/// Position of a node inside the arena.
pub type NodeIndex = usize;

/// Sentinel for "no neighbour".
const NULL_INDEX: NodeIndex = usize::MAX;

#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    /// Neighbour towards the front (more recently used)
    prev: NodeIndex,
    /// Neighbour towards the back (less recently used)
    next: NodeIndex,
}

// == Recency List ==
/// Access order of the live entries.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Vacated slots are recycled through a free list and dropped eagerly, so a
/// removed value does not linger in memory until its slot is reused.
#[derive(Debug)]
pub struct RecencyList {
    slots: Vec<Option<Node>>,
    free: Vec<NodeIndex>,
    head: NodeIndex,
    tail: NodeIndex,
    len: usize,
}

impl Default for RecencyList {
    fn default() -> Self {
        Self::new()
    }
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: NULL_INDEX,
            tail: NULL_INDEX,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an entry as the most recently used one and returns its position.
    pub fn push_front(&mut self, entry: CacheEntry) -> NodeIndex {
        let node = Node {
            entry,
            prev: NULL_INDEX,
            next: NULL_INDEX,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks the entry at `idx` as most recently used.
    ///
    /// Returns false if `idx` does not hold a live node.
    pub fn move_to_front(&mut self, idx: NodeIndex) -> bool {
        if self.head == idx {
            return self.node(idx).is_some();
        }
        if !self.unlink(idx) {
            return false;
        }
        self.link_front(idx);
        true
    }

    // == Remove ==
    /// Removes the entry at `idx` and hands it back.
    pub fn remove(&mut self, idx: NodeIndex) -> Option<CacheEntry> {
        if !self.unlink(idx) {
            return None;
        }
        let node = self.slots.get_mut(idx)?.take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry> {
        if self.tail == NULL_INDEX {
            return None;
        }
        self.remove(self.tail)
    }

    /// Position of the least recently used entry.
    pub fn back(&self) -> Option<NodeIndex> {
        (self.tail != NULL_INDEX).then_some(self.tail)
    }

    /// Position of the most recently used entry.
    pub fn front(&self) -> Option<NodeIndex> {
        (self.head != NULL_INDEX).then_some(self.head)
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&CacheEntry> {
        self.node(idx).map(|node| &node.entry)
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut CacheEntry> {
        self.node_mut(idx).map(|node| &mut node.entry)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = NULL_INDEX;
        self.tail = NULL_INDEX;
        self.len = 0;
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Link Consistency ==
    /// Walks the list in both directions and checks that the links are
    /// symmetric and that both walks visit exactly `len` nodes.
    pub fn links_consistent(&self) -> bool {
        let mut forward = 0;
        let mut prev = NULL_INDEX;
        let mut cursor = self.head;
        while cursor != NULL_INDEX {
            let Some(node) = self.node(cursor) else {
                return false;
            };
            if node.prev != prev || forward > self.len {
                return false;
            }
            forward += 1;
            prev = cursor;
            cursor = node.next;
        }
        if prev != self.tail || forward != self.len {
            return false;
        }

        let mut backward = 0;
        let mut cursor = self.tail;
        while cursor != NULL_INDEX {
            let Some(node) = self.node(cursor) else {
                return false;
            };
            backward += 1;
            if backward > self.len {
                return false;
            }
            cursor = node.prev;
        }
        backward == self.len && self.slots.len() == self.len + self.free.len()
    }

    // == Internal: Links ==

    fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn set_prev(&mut self, idx: NodeIndex, prev: NodeIndex) {
        if let Some(node) = self.node_mut(idx) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, idx: NodeIndex, next: NodeIndex) {
        if let Some(node) = self.node_mut(idx) {
            node.next = next;
        }
    }

    /// Detaches a live node from its neighbours, leaving it in its slot.
    fn unlink(&mut self, idx: NodeIndex) -> bool {
        let Some(node) = self.node(idx) else {
            return false;
        };
        let (prev, next) = (node.prev, node.next);

        if prev == NULL_INDEX {
            self.head = next;
        } else {
            self.set_next(prev, next);
        }
        if next == NULL_INDEX {
            self.tail = prev;
        } else {
            self.set_prev(next, prev);
        }

        self.set_prev(idx, NULL_INDEX);
        self.set_next(idx, NULL_INDEX);
        true
    }

    /// Attaches a detached node at the front.
    fn link_front(&mut self, idx: NodeIndex) {
        let old_head = self.head;
        self.set_prev(idx, NULL_INDEX);
        self.set_next(idx, old_head);
        if old_head != NULL_INDEX {
            self.set_prev(old_head, idx);
        }
        self.head = idx;
        if self.tail == NULL_INDEX {
            self.tail = idx;
        }
    }
}

/// Front-to-back iterator over `(position, entry)` pairs.
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: NodeIndex,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeIndex, &'a CacheEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor;
        let node = self.list.node(idx)?;
        self.cursor = node.next;
        Some((idx, &node.entry))
    }
}
