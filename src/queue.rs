//! Binary min-heap ordered by a caller-supplied comparator.
//!
//! `std::collections::BinaryHeap` needs `Ord` on the element type, while each search
//! strategy orders the same `SearchState` differently (by g, by h or by f). This heap takes
//! the ordering as a closure instead.
use std::cmp::Ordering;

/// A binary min-heap: `pop` returns the element that compares smallest under `cmp`.
///
/// Equal elements come out in no particular order.
///
/// # Examples
/// ```
/// use rush_hour_solver::queue::PriorityQueue;
/// let mut q = PriorityQueue::new(|a: &u32, b: &u32| a.cmp(b));
/// for x in [5, 1, 4, 2] {
///     q.push(x);
/// }
/// assert_eq!(q.pop(), Some(1));
/// assert_eq!(q.pop(), Some(2));
/// assert_eq!(q.len(), 2);
/// ```
pub struct PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    items: Vec<T>,
    cmp: F,
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(cmp: F) -> Self {
        PriorityQueue {
            items: Vec::new(),
            cmp,
        }
    }

    pub fn with_capacity(capacity: usize, cmp: F) -> Self {
        PriorityQueue {
            items: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Adds `item`, sifting it up towards the root. O(log n) amortised.
    pub fn push(&mut self, item: T) {
        let mut index = self.items.len();
        self.items.push(item);

        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.cmp)(&self.items[parent], &self.items[index]) != Ordering::Greater {
                break;
            }
            self.items.swap(parent, index);
            index = parent;
        }
    }

    /// Removes and returns the smallest element. O(log n).
    ///
    /// The last element takes the root's place and is sifted down.
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let result = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(result)
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && (self.cmp)(&self.items[left], &self.items[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && (self.cmp)(&self.items[right], &self.items[smallest]) == Ordering::Less
            {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.items.swap(index, smallest);
            index = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_empty_queue() {
        let mut q = PriorityQueue::new(|a: &i32, b: &i32| a.cmp(b));
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.peek(), None);
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_pops_in_ascending_order() {
        let mut rng = SmallRng::seed_from_u64(514514);
        let mut q = PriorityQueue::with_capacity(200, |a: &u32, b: &u32| a.cmp(b));
        let mut expected: Vec<u32> = (0..200).map(|_| rng.gen_range(0..50)).collect();
        for &x in &expected {
            q.push(x);
        }
        assert_eq!(q.len(), 200);
        expected.sort_unstable();

        let mut popped = Vec::new();
        while let Some(x) = q.pop() {
            popped.push(x);
        }
        assert_eq!(popped, expected);
        assert!(q.is_empty());
    }

    #[test]
    fn test_custom_comparator_orders_by_key() {
        // Max-heap on the second field by reversing the comparison.
        let mut q = PriorityQueue::new(|a: &(char, u32), b: &(char, u32)| b.1.cmp(&a.1));
        q.push(('a', 1));
        q.push(('b', 7));
        q.push(('c', 3));
        assert_eq!(q.peek(), Some(&('b', 7)));
        assert_eq!(q.pop().map(|x| x.0), Some('b'));
        assert_eq!(q.pop().map(|x| x.0), Some('c'));
        assert_eq!(q.pop().map(|x| x.0), Some('a'));
    }

    #[test]
    fn test_interleaved_push_and_pop() {
        let mut q = PriorityQueue::new(|a: &i32, b: &i32| a.cmp(b));
        q.push(10);
        q.push(3);
        assert_eq!(q.pop(), Some(3));
        q.push(1);
        q.push(7);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(7));
        assert_eq!(q.pop(), Some(10));
        assert_eq!(q.pop(), None);
    }
}
