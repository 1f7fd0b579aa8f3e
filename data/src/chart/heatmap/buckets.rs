use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Insertion-ordered map keyed by a bucket bound.
///
/// Iteration follows insertion order, which is also the order cells get rendered in.
/// Overwriting an existing key keeps its position, removing one shifts the later entries.
#[derive(Debug, Clone)]
pub struct BucketMap<T> {
    entries: Vec<(f64, T)>,
    index: FxHashMap<OrderedFloat<f64>, usize>,
}

impl<T> Default for BucketMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T> BucketMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: f64) -> bool {
        self.index.contains_key(&OrderedFloat(key))
    }

    pub fn get(&self, key: f64) -> Option<&T> {
        self.index
            .get(&OrderedFloat(key))
            .map(|&idx| &self.entries[idx].1)
    }

    pub fn get_mut(&mut self, key: f64) -> Option<&mut T> {
        self.index
            .get(&OrderedFloat(key))
            .map(|&idx| &mut self.entries[idx].1)
    }

    pub fn get_or_insert_with<F>(&mut self, key: f64, default: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let idx = match self.index.get(&OrderedFloat(key)) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push((key, default()));
                self.index.insert(OrderedFloat(key), idx);
                idx
            }
        };

        &mut self.entries[idx].1
    }

    /// Returns the previous value when the key was already present.
    pub fn insert(&mut self, key: f64, value: T) -> Option<T> {
        match self.index.get(&OrderedFloat(key)) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.index.insert(OrderedFloat(key), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: f64) -> Option<T> {
        let idx = self.index.remove(&OrderedFloat(key))?;
        let (_, value) = self.entries.remove(idx);

        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }

        Some(value)
    }

    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }
}

impl<T: PartialEq> PartialEq for BucketMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Serialize> Serialize for BucketMap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for value in self.values() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}
