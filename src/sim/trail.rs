//! Fixed-capacity rocket trail

use glam::Vec2;

/// Circular buffer of recent positions, oldest first when iterated
///
/// Once full, each push overwrites the oldest point.
#[derive(Debug, Clone)]
pub struct Trail<const N: usize> {
    points: [Vec2; N],
    /// Index of the oldest point
    head: usize,
    len: usize,
}

impl<const N: usize> Default for Trail<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Trail<N> {
    pub const fn new() -> Self {
        Self {
            points: [Vec2::ZERO; N],
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, point: Vec2) {
        if N == 0 {
            return;
        }
        if self.len < N {
            self.points[(self.head + self.len) % N] = point;
            self.len += 1;
        } else {
            self.points[self.head] = point;
            self.head = (self.head + 1) % N;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Point `i` counted from the oldest
    pub fn get(&self, i: usize) -> Option<Vec2> {
        (i < self.len).then(|| self.points[(self.head + i) % N])
    }

    pub fn newest(&self) -> Option<Vec2> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        (0..self.len).map(move |i| self.points[(self.head + i) % N])
    }
}
