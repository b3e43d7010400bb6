// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rolling window storage for frame intervals.

/// A fixed-size circular buffer for storing numerical samples.
///
/// The capacity is chosen at construction; once full, each push overwrites
/// the oldest value.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: Vec<T>,
    index: usize,
    count: usize,
}

impl<T: Default + Copy> RingBuffer<T> {
    /// Creates a new, empty ring buffer. A zero capacity is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![T::default(); capacity.max(1)],
            index: 0,
            count: 0,
        }
    }

    /// Pushes a new value into the buffer, overwriting the oldest if full.
    pub fn push(&mut self, value: T) {
        let capacity = self.data.len();
        self.data[self.index] = value;
        self.index = (self.index + 1) % capacity;
        if self.count < capacity {
            self.count += 1;
        }
    }

    /// Returns the number of elements currently in the buffer.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the maximum number of elements the buffer holds.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been pushed since the last clear.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.index = 0;
        self.count = 0;
    }

    /// Returns an iterator over the values in chronological order (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        // Until the buffer wraps, the oldest value sits at index 0.
        let start = if self.count < self.data.len() { 0 } else { self.index };
        let (older, newer) = (&self.data[start..self.count], &self.data[..start]);
        older.iter().chain(newer.iter())
    }
}

impl RingBuffer<f64> {
    /// Calculates the arithmetic mean of the values in the buffer.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.iter().sum::<f64>() / self.count as f64)
    }

    /// Calculates the population variance of the values in the buffer.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let avg = self.average().unwrap_or_default();
        let sum_sq: f64 = self.iter().map(|v| (v - avg) * (v - avg)).sum();
        sum_sq / self.count as f64
    }

    /// Returns the minimum value in the buffer.
    pub fn min(&self) -> Option<f64> {
        self.iter().copied().reduce(f64::min)
    }

    /// Returns the maximum value in the buffer.
    pub fn max(&self) -> Option<f64> {
        self.iter().copied().reduce(f64::max)
    }

    /// Returns the values sorted ascending.
    pub fn sorted(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self.iter().copied().collect();
        values.sort_by(f64::total_cmp);
        values
    }
}

/// Nearest-rank percentile of an ascending slice. Returns 0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}
