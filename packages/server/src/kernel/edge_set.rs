//! A many-to-many relation stored once, with indexed lookups on both ends.
//!
//! The forward and reverse indexes are private and only change together,
//! so `right_of(a).contains(b)` holds exactly when `left_of(b).contains(a)`.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct EdgeSet<L, R> {
    forward: HashMap<L, BTreeSet<R>>,
    reverse: HashMap<R, BTreeSet<L>>,
    len: usize,
}

impl<L, R> Default for EdgeSet<L, R> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
            len: 0,
        }
    }
}

impl<L, R> EdgeSet<L, R>
where
    L: Copy + Eq + Hash + Ord,
    R: Copy + Eq + Hash + Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the edge. Returns false if it was already present.
    pub fn insert(&mut self, left: L, right: R) -> bool {
        if !self.forward.entry(left).or_default().insert(right) {
            return false;
        }
        self.reverse.entry(right).or_default().insert(left);
        self.len += 1;
        true
    }

    /// Removes the edge. Returns false if it was not present.
    pub fn remove(&mut self, left: L, right: R) -> bool {
        let removed = match self.forward.get_mut(&left) {
            Some(rights) => rights.remove(&right),
            None => false,
        };
        if !removed {
            return false;
        }
        prune(&mut self.forward, &left);
        if let Some(lefts) = self.reverse.get_mut(&right) {
            lefts.remove(&left);
        }
        prune(&mut self.reverse, &right);
        self.len -= 1;
        true
    }

    pub fn contains(&self, left: L, right: R) -> bool {
        self.forward
            .get(&left)
            .is_some_and(|rights| rights.contains(&right))
    }

    /// Right ends of every edge leaving `left`, in ascending order.
    pub fn right_of(&self, left: L) -> Vec<R> {
        self.forward
            .get(&left)
            .map(|rights| rights.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Left ends of every edge arriving at `right`, in ascending order.
    pub fn left_of(&self, right: R) -> Vec<L> {
        self.reverse
            .get(&right)
            .map(|lefts| lefts.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drops every edge whose left end is `left`.
    pub fn remove_left(&mut self, left: L) -> usize {
        let Some(rights) = self.forward.remove(&left) else {
            return 0;
        };
        for right in &rights {
            if let Some(lefts) = self.reverse.get_mut(right) {
                lefts.remove(&left);
            }
            prune(&mut self.reverse, right);
        }
        self.len -= rights.len();
        rights.len()
    }

    /// Drops every edge whose right end is `right`.
    pub fn remove_right(&mut self, right: R) -> usize {
        let Some(lefts) = self.reverse.remove(&right) else {
            return 0;
        };
        for left in &lefts {
            if let Some(rights) = self.forward.get_mut(left) {
                rights.remove(&right);
            }
            prune(&mut self.forward, left);
        }
        self.len -= lefts.len();
        lefts.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn prune<K: Eq + Hash, V>(index: &mut HashMap<K, BTreeSet<V>>, key: &K) {
    if index.get(key).is_some_and(BTreeSet::is_empty) {
        index.remove(key);
    }
}
