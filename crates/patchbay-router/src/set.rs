//! Ordered listener sets

/// Insertion-ordered set of listener handles.
///
/// Iteration follows insertion order so a dispatch visits listeners in the
/// order they joined. Sets stay small (one entry per listener), so
/// membership is a linear scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSet<L> {
    members: Vec<L>,
}

impl<L: Copy + Eq> ListenerSet<L> {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Add a listener; returns false if it was already present
    pub fn insert(&mut self, listener: L) -> bool {
        if self.contains(listener) {
            return false;
        }
        self.members.push(listener);
        true
    }

    /// Remove a listener; returns false if it was not present
    pub fn remove(&mut self, listener: L) -> bool {
        match self.members.iter().position(|m| *m == listener) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: L) -> bool {
        self.members.contains(&listener)
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = L> + '_ {
        self.members.iter().copied()
    }

    pub fn as_slice(&self) -> &[L] {
        &self.members
    }
}

impl<L: Copy + Eq> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Copy + Eq> FromIterator<L> for ListenerSet<L> {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut set = Self::new();
        for listener in iter {
            set.insert(listener);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut set = ListenerSet::new();
        assert!(set.insert(1));
        assert!(set.insert(2));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_insertion_order_survives_removal() {
        let mut set: ListenerSet<u32> = [3, 1, 2].into_iter().collect();
        assert!(set.remove(1));
        assert!(!set.remove(1));
        set.insert(1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_clear() {
        let mut set: ListenerSet<u32> = [1, 2].into_iter().collect();
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(1));
    }
}
