//! Element buffer holding the values being sorted.

/// Values `0..n` in some permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBuffer {
    values: Vec<u32>,
}

impl ElementBuffer {
    /// Buffer of `len` elements in ascending order.
    pub fn new(len: u32) -> Self {
        Self {
            values: (0..len).collect(),
        }
    }

    /// Buffer of `len` elements shuffled with `seed`.
    pub fn shuffled(len: u32, seed: u64) -> Self {
        let mut buffer = Self::new(len);
        buffer.randomize(seed);
        buffer
    }

    /// Fisher-Yates shuffle driven by a linear congruential generator, so
    /// the same seed always produces the same permutation.
    pub fn randomize(&mut self, seed: u64) {
        let mut state = seed;
        let a: u64 = 6364136223846793005;
        let c: u64 = 1442695040888963407;

        for i in (1..self.values.len()).rev() {
            state = state.wrapping_mul(a).wrapping_add(c);
            // high bits of an LCG are the well-distributed ones
            let j = ((state >> 33) % (i as u64 + 1)) as usize;
            self.values.swap(i, j);
        }
    }

    /// Restore ascending order without reallocating.
    pub fn fill_ascending(&mut self) {
        for (i, v) in self.values.iter_mut().enumerate() {
            *v = i as u32;
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.values
    }
}

impl From<Vec<u32>> for ElementBuffer {
    fn from(values: Vec<u32>) -> Self {
        Self { values }
    }
}
