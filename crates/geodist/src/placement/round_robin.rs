//! Interleaved weighted round robin.
//!
//! Each item carries an integer weight. The selector keeps a rotating index
//! and a current-weight threshold that drops by the gcd of all weights each
//! time the index wraps, resetting to the maximum weight once exhausted. An
//! item is picked when its weight meets the threshold, so over a full cycle
//! every item is picked in proportion to its weight and heavy items are
//! spread through the cycle instead of bunched.

/// Endless weighted selector over a fixed set of items.
#[derive(Debug, Clone)]
pub struct WeightedRoundRobin<T> {
    items: Vec<(T, u32)>,
    gcd: u32,
    max_weight: u32,
    index: Option<usize>,
    current_weight: i64,
}

impl<T> Default for WeightedRoundRobin<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            gcd: 0,
            max_weight: 0,
            index: None,
            current_weight: 0,
        }
    }
}

impl<T: Copy> WeightedRoundRobin<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. A zero weight counts as 1.
    pub fn add(&mut self, item: T, weight: u32) {
        let weight = weight.max(1);
        if self.items.is_empty() {
            self.gcd = weight;
            self.max_weight = weight;
        } else {
            self.gcd = gcd(self.gcd, weight);
            self.max_weight = self.max_weight.max(weight);
        }
        self.items.push((item, weight));
        self.reset();
    }

    /// Restart the cycle from the first item.
    pub fn reset(&mut self) {
        self.index = None;
        self.current_weight = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Copy> Iterator for WeightedRoundRobin<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self.items.len() {
            0 => return None,
            1 => return Some(self.items[0].0),
            _ => {}
        }
        loop {
            let index = self.index.map_or(0, |i| (i + 1) % self.items.len());
            self.index = Some(index);
            if index == 0 {
                self.current_weight -= i64::from(self.gcd);
                if self.current_weight <= 0 {
                    self.current_weight = i64::from(self.max_weight);
                }
            }
            let (item, weight) = self.items[index];
            if i64::from(weight) >= self.current_weight {
                return Some(item);
            }
        }
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
