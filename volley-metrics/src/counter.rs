use fnv::FnvHashMap;
use std::hash::Hash;

/// Monotonic counters keyed by an arbitrary hashable key.
///
/// Keys materialize on first increment, so a `Counters` that was never
/// incremented stays empty rather than reporting zero-valued entries.
#[derive(Debug)]
pub struct Counters<T> {
    data: FnvHashMap<T, u64>,
}

impl<T> Default for Counters<T>
where
    T: Hash + Eq,
{
    fn default() -> Self {
        Counters::new()
    }
}

impl<T> Counters<T>
where
    T: Hash + Eq,
{
    /// Create a blank `Counters` object
    pub fn new() -> Counters<T> {
        Counters {
            data: FnvHashMap::default(),
        }
    }

    /// Increment the counter with the given key by the given value,
    /// creating it at zero first if it was never seen.
    pub fn increment_by(&mut self, key: T, val: u64) {
        *self.data.entry(key).or_insert(0) += val;
    }

    /// Increment the counter with the given key by one.
    pub fn increment(&mut self, key: T) {
        self.increment_by(key, 1);
    }

    /// Get the value of the counter with the given key, zero if never incremented.
    pub fn get(&self, key: &T) -> u64 {
        self.data.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.data.values().sum()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.data.iter().map(|(k, v)| (k, *v))
    }
}

impl<T> Counters<T>
where
    T: Hash + Eq + Clone,
{
    /// Add every counter from `other` into `self`.
    pub fn merge(&mut self, other: &Counters<T>) {
        for (k, v) in other.iter() {
            self.increment_by(k.clone(), v);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn untouched_counters_stay_empty() {
        let c: Counters<&'static str> = Counters::new();
        assert!(c.is_empty());
        assert_eq!(c.get(&"timeout"), 0);
        assert_eq!(c.total(), 0);
    }

    #[test]
    fn increments_accumulate_per_key() {
        let mut c = Counters::new();
        c.increment("timeout");
        c.increment("timeout");
        c.increment_by("connect", 3);
        assert_eq!(c.get(&"timeout"), 2);
        assert_eq!(c.get(&"connect"), 3);
        assert_eq!(c.total(), 5);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn merge_sums_counts_per_key() {
        let mut a = Counters::new();
        a.increment_by("timeout", 2);
        let mut b = Counters::new();
        b.increment_by("timeout", 1);
        b.increment_by("connect", 4);
        a.merge(&b);
        assert_eq!(a.get(&"timeout"), 3);
        assert_eq!(a.get(&"connect"), 4);
        assert_eq!(a.total(), 7);
    }
}
