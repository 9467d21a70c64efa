//! Arena-backed doubly linked list
//!
//! Nodes live in the slots of a `Vec` and link to each other by slot index,
//! so there are no owning pointers in either direction. Removed slots go on a
//! free list and are reused by the next insertion.
//!
//! `head` is the newest / most recently touched node, `tail` the eldest.

use crate::error::{Error, Result};

/// Stable handle to a node in a [`LinkedSlab`]
///
/// A handle is valid from the insertion that returned it until the node is
/// removed. After that the slot may be reused by another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Raw slot index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node in the doubly-linked list
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list stored in a slab
#[derive(Debug)]
pub struct LinkedSlab<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> LinkedSlab<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of linked nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Newest node
    pub fn head(&self) -> Option<SlotId> {
        self.head.map(SlotId)
    }

    /// Eldest node
    pub fn tail(&self) -> Option<SlotId> {
        self.tail.map(SlotId)
    }

    /// Key and value stored at `id`
    pub fn get(&self, id: SlotId) -> Option<(&K, &V)> {
        self.node(id.0).map(|node| (&node.key, &node.value))
    }

    /// Mutable access to the value stored at `id`
    pub fn value_mut(&mut self, id: SlotId) -> Option<&mut V> {
        self.node_mut(id.0).map(|node| &mut node.value)
    }

    /// Link a new node at the head and return its handle
    pub fn push_front(&mut self, key: K, value: V) -> SlotId {
        let idx = self.alloc_node(Node {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_front(idx);
        self.len += 1;
        SlotId(idx)
    }

    /// Relink an existing node at the head
    pub fn move_to_front(&mut self, id: SlotId) -> Result<()> {
        if self.head == Some(id.0) {
            return Ok(()); // Already at front
        }

        self.unlink(id.0)?;
        self.link_front(id.0);
        Ok(())
    }

    /// Splice the node at `id` out of the list and free its slot
    ///
    /// Removing a slot that holds no node (never allocated, or already
    /// removed) is rejected with [`Error::InvalidState`] and leaves the list
    /// untouched.
    pub fn remove(&mut self, id: SlotId) -> Result<(K, V)> {
        self.unlink(id.0)?;
        let node = self.nodes[id.0]
            .take()
            .ok_or_else(|| vacant_slot(id.0))?;
        self.free_list.push(id.0);
        self.len -= 1;
        Ok((node.key, node.value))
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate from head (newest) to tail (eldest)
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slab: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Walk the chain in both directions and verify the links agree
    pub fn check_invariants(&self) -> Result<()> {
        let mut forward = Vec::with_capacity(self.len);
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.node(idx).ok_or_else(|| vacant_slot(idx))?;
            if node.prev != prev {
                return Err(Error::InvalidState(format!(
                    "slot {} links back to {:?}, expected {:?}",
                    idx, node.prev, prev
                )));
            }
            forward.push(idx);
            if forward.len() > self.len {
                return Err(Error::InvalidState("cycle in forward chain".to_string()));
            }
            prev = Some(idx);
            cursor = node.next;
        }

        if prev != self.tail {
            return Err(Error::InvalidState(format!(
                "forward walk ends at {:?}, tail is {:?}",
                prev, self.tail
            )));
        }
        if forward.len() != self.len {
            return Err(Error::InvalidState(format!(
                "{} nodes reachable, len is {}",
                forward.len(),
                self.len
            )));
        }

        let mut backward = Vec::with_capacity(self.len);
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            backward.push(idx);
            if backward.len() > self.len {
                return Err(Error::InvalidState("cycle in backward chain".to_string()));
            }
            cursor = self.node(idx).and_then(|node| node.prev);
        }
        backward.reverse();
        if backward != forward {
            return Err(Error::InvalidState(
                "backward walk disagrees with forward walk".to_string(),
            ));
        }

        let occupied = self.nodes.iter().filter(|slot| slot.is_some()).count();
        if occupied != self.len || occupied + self.free_list.len() != self.nodes.len() {
            return Err(Error::InvalidState(format!(
                "{} occupied + {} free slots for {} total",
                occupied,
                self.free_list.len(),
                self.nodes.len()
            )));
        }

        Ok(())
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.nodes.get(idx).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(idx).and_then(|slot| slot.as_mut())
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_idx) => {
                if let Some(head) = self.node_mut(head_idx) {
                    head.prev = Some(idx);
                }
            }
            None => {
                self.tail = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) -> Result<()> {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return Err(vacant_slot(idx)),
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.node_mut(prev_idx) {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.node_mut(next_idx) {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
        Ok(())
    }

    fn alloc_node(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }
}

impl<K, V> Default for LinkedSlab<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn vacant_slot(idx: usize) -> Error {
    Error::InvalidState(format!("slot {} holds no linked node", idx))
}

/// Head-to-tail iterator over a [`LinkedSlab`]
pub struct Iter<'a, K, V> {
    slab: &'a LinkedSlab<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.slab.node(idx)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
