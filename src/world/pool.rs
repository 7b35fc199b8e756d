use log::debug;

/// Fixed-capacity collection with swap-remove deletion.
///
/// Order is not stable: removing an element moves the last one into its
/// slot. Pushing onto a full pool drops the item.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    items: Vec<T>,
    cap: usize,
}

impl<T> Pool<T> {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Returns `false` when the pool is full and `item` was dropped.
    pub fn push(&mut self, item: T) -> bool {
        if self.items.len() >= self.cap {
            debug!("pool full ({}), item dropped", self.cap);
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn swap_remove(&mut self, idx: usize) -> Option<T> {
        (idx < self.items.len()).then(|| self.items.swap_remove(idx))
    }

    /// Keep the items for which `keep` is true, swap-removing the rest.
    ///
    /// `keep` may mutate the item, which lets update-and-expire happen in
    /// one pass.
    pub fn retain_swap<F: FnMut(&mut T) -> bool>(&mut self, mut keep: F) {
        let mut i = 0;
        while i < self.items.len() {
            if keep(&mut self.items[i]) {
                i += 1;
            } else {
                self.items.swap_remove(i);
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_beyond_capacity_is_dropped() {
        let mut pool = Pool::with_capacity(2);
        assert!(pool.push(1));
        assert!(pool.push(2));
        assert!(pool.is_full());
        assert!(!pool.push(3));
        assert_eq!(pool.as_slice(), &[1, 2]);
    }

    #[test]
    fn swap_remove_moves_last_into_hole() {
        let mut pool = Pool::with_capacity(4);
        for i in 0..4 {
            pool.push(i);
        }
        assert_eq!(pool.swap_remove(1), Some(1));
        assert_eq!(pool.as_slice(), &[0, 3, 2]);
        assert_eq!(pool.swap_remove(7), None);
    }

    #[test]
    fn retain_swap_visits_moved_items() {
        let mut pool = Pool::with_capacity(8);
        for i in [1, 2, 2, 3, 2] {
            pool.push(i);
        }
        pool.retain_swap(|v| *v != 2);
        let mut left = pool.as_slice().to_vec();
        left.sort();
        assert_eq!(left, vec![1, 3]);
    }
}
