//! Queue that reports the minimum of the values it currently holds.

use std::collections::VecDeque;

/// A FIFO queue with O(1) amortized access to its minimum.
///
/// Values dominated by a newer, smaller-or-equal value can never become the
/// minimum again, so they are folded into that newer entry as a counter. The
/// deque is therefore monotonic: its front always holds the minimum.
#[derive(Debug, Clone)]
pub struct MinQueue<T> {
    data: VecDeque<(T, usize)>,
    len: usize,
}

impl<T: PartialOrd> MinQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        MinQueue {
            data: VecDeque::new(),
            len: 0,
        }
    }

    /// Current minimum, or `None` when the queue is empty.
    pub fn min(&self) -> Option<&T> {
        self.data.front().map(|(value, _)| value)
    }

    /// Append a value at the back of the queue.
    pub fn push(&mut self, value: T) {
        let mut count = 1;
        while let Some((back, folded)) = self.data.back() {
            if value <= *back {
                count += folded;
                self.data.pop_back();
            } else {
                break;
            }
        }
        self.data.push_back((value, count));
        self.len += 1;
    }

    /// Remove the oldest value. The removed value is not necessarily the minimum.
    pub fn pop(&mut self) {
        if let Some(front) = self.data.front_mut() {
            if front.1 == 1 {
                self.data.pop_front();
            } else {
                front.1 -= 1;
            }
            self.len -= 1;
        }
    }

    /// Number of values pushed and not yet popped.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: PartialOrd> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
