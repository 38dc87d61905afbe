//! Shuffle bag over problem indices.
//!
//! Draws without replacement until every index has been handed out, then
//! refills with the full pool. Every problem is shown once before any repeats.

use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Default)]
pub struct ShuffleBag {
    size: usize,
    /// Undrawn indices; the next draw pops from the back.
    remaining: Vec<usize>,
    last: Option<usize>,
}

impl ShuffleBag {
    /// Creates an empty bag over `0..size`. The first draw fills it.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            remaining: Vec::new(),
            last: None,
        }
    }

    /// Creates an empty bag that will not open with `last`.
    ///
    /// Used when the pool is replaced while one of its problems is on screen.
    pub fn following(size: usize, last: Option<usize>) -> Self {
        Self {
            size,
            remaining: Vec::new(),
            last: last.filter(|&index| index < size),
        }
    }

    /// Number of indices the bag cycles through.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Indices left before the next refill.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Draws the next index, refilling and reshuffling once exhausted.
    ///
    /// Returns `None` only for an empty pool.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.size == 0 {
            return None;
        }
        if self.remaining.is_empty() {
            self.refill(rng);
        }
        let index = self.remaining.pop()?;
        self.last = Some(index);
        Some(index)
    }

    fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.remaining = (0..self.size).collect();
        self.remaining.shuffle(rng);

        // No back-to-back repeat across a refill boundary.
        if self.size > 1
            && let Some(last) = self.last
            && self.remaining.last() == Some(&last)
        {
            let end = self.remaining.len() - 1;
            self.remaining.swap(0, end);
        }
    }
}
