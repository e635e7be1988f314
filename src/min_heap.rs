use thiserror::Error;

/// Ordering key of a heap entry. Entries compare by `weight` first and then
/// by `order`, the position at which they were inserted, so equal weights
/// leave the heap first-in first-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeapKey {
    pub weight: u64,
    pub order: u64,
}

#[derive(Debug, Clone)]
struct HeapEntry<T> {
    key: HeapKey,
    value: T,
}

/// Binary min-heap over `(weight, insertion order)` keys.
///
/// The stored values never take part in comparisons.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<HeapEntry<T>>,
    next_order: u64,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap {
            elements: vec![],
            next_order: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
            next_order: 0,
        }
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapErr {
    #[error("index {0} out of range for heap of size {1}")]
    KeyError(usize, usize),
    #[error("extract from empty heap")]
    HeapUnderflow,
}

impl<T> MinHeap<T> {
    /// Builds a heap from `(weight, value)` pairs. Insertion order is the
    /// iteration order of `source`.
    pub fn build<I>(source: I) -> Result<Self, HeapErr>
    where
        I: IntoIterator<Item = (u64, T)>,
    {
        let source = source.into_iter();
        let mut heap = MinHeap::with_capacity(source.size_hint().0);
        for (weight, value) in source {
            let order = heap.take_order();
            heap.elements.push(HeapEntry {
                key: HeapKey { weight, order },
                value,
            });
        }
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.min_heapify(i)?;
        }
        Ok(heap)
    }

    fn take_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size())
            .all(|i| self.elements[Self::parent(i)].key <= self.elements[i].key)
    }

    pub fn min_heapify(&mut self, i: usize) -> Result<(), HeapErr> {
        if i >= self.heap_size() {
            return Err(HeapErr::KeyError(i, self.heap_size()));
        }
        let l = Self::left(i);
        let r = Self::right(i);
        let mut smallest = i;

        if l < self.heap_size() && self.elements[l].key < self.elements[smallest].key {
            smallest = l;
        }
        if r < self.heap_size() && self.elements[r].key < self.elements[smallest].key {
            smallest = r;
        }

        if smallest != i {
            self.elements.swap(i, smallest);
            return self.min_heapify(smallest);
        }

        Ok(())
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i].key < self.elements[p].key {
                self.elements.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
    }

    pub fn insert(&mut self, weight: u64, value: T) {
        let order = self.take_order();
        self.elements.push(HeapEntry {
            key: HeapKey { weight, order },
            value,
        });
        self.sift_up(self.heap_size() - 1);
    }

    /// Removes the entry with the smallest key.
    pub fn extract_min(&mut self) -> Result<(HeapKey, T), HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let n = self.heap_size() - 1;
        self.elements.swap(0, n);
        let result = self.elements.pop().ok_or(HeapErr::HeapUnderflow)?;
        if !self.is_empty() {
            self.min_heapify(0)?;
        }
        Ok((result.key, result.value))
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extract_from_empty_heap_underflows() {
        let mut heap: MinHeap<()> = MinHeap::new();
        assert_eq!(heap.extract_min().unwrap_err(), HeapErr::HeapUnderflow);
    }

    #[test]
    fn extracts_in_weight_order() {
        let mut heap = MinHeap::build(vec![(5, 'e'), (1, 'a'), (3, 'c')]).unwrap();
        heap.insert(2, 'b');
        heap.insert(4, 'd');
        assert!(heap.valid_min_heap());

        let drained: Vec<char> = std::iter::from_fn(|| heap.extract_min().ok())
            .map(|(_, v)| v)
            .collect();
        assert_eq!(drained, vec!['a', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn equal_weights_leave_in_insertion_order() {
        let mut heap = MinHeap::build((0..8).map(|i| (7, i))).unwrap();
        for i in 8..16 {
            heap.insert(7, i);
        }
        let drained: Vec<i32> = std::iter::from_fn(|| heap.extract_min().ok())
            .map(|(_, v)| v)
            .collect();
        assert_eq!(drained, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn heapify_rejects_out_of_range_index() {
        let mut heap = MinHeap::build(vec![(1, ())]).unwrap();
        assert_eq!(heap.min_heapify(4), Err(HeapErr::KeyError(4, 1)));
    }

    #[test]
    fn stays_valid_under_interleaved_operations() {
        let mut heap = MinHeap::new();
        for i in 0u64..500 {
            heap.insert((i * 7919) % 211, i);
            if i % 3 == 0 {
                heap.extract_min().unwrap();
            }
            assert!(heap.valid_min_heap());
        }
        let mut prev = HeapKey { weight: 0, order: 0 };
        while let Ok((key, _)) = heap.extract_min() {
            assert!(key.weight >= prev.weight);
            prev = key;
        }
    }
}
