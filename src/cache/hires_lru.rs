use std::collections::VecDeque;

/// Recency list of cards holding a large texture. Most recent at the tail.
#[derive(Clone, Debug)]
pub struct HiResLru<K> {
    order: VecDeque<K>,
    cap: usize,
}

impl<K: Copy + Eq> HiResLru<K> {
    pub fn new(cap: usize) -> Self {
        Self {
            order: VecDeque::new(),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
    }

    /// Move `key` to the tail, inserting it if absent.
    pub fn touch(&mut self, key: K) {
        self.remove(key);
        self.order.push_back(key);
    }

    pub fn remove(&mut self, key: K) -> bool {
        match self.order.iter().position(|k| *k == key) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.order.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Pop from the head while over capacity and return the evicted keys.
    ///
    /// A hovered head is moved to the tail and the pass stops, so hovered cards are never
    /// evicted and the list may stay over capacity until they are released.
    pub fn evict_if_needed(&mut self, mut is_hovered: impl FnMut(K) -> bool) -> Vec<K> {
        let mut evicted = Vec::new();
        while self.order.len() > self.cap {
            let Some(head) = self.order.pop_front() else {
                break;
            };
            if is_hovered(head) {
                self.order.push_back(head);
                break;
            }
            evicted.push(head);
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/hires_lru.rs"]
mod tests;
