//! Fixed-capacity history ring.

use alloc::collections::VecDeque;

/// An ordered history holding at most `N` entries.
///
/// Pushing onto a full ring evicts the oldest entry. Serialized as a plain
/// array, oldest first; deserializing an array longer than `N` keeps the
/// newest `N` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounded<T, const N: usize> {
    entries: VecDeque<T>,
}

impl<T, const N: usize> Bounded<T, N> {
    /// Maximum number of entries retained.
    pub const CAPACITY: usize = N;

    /// Create an empty ring.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(N),
        }
    }

    /// Append an entry, evicting the oldest if full.
    pub fn push(&mut self, entry: T) {
        if N == 0 {
            return;
        }
        if self.entries.len() == N {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Append every entry in order, evicting as needed.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, entries: I) {
        for entry in entries {
            self.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by age: index 0 is the oldest retained entry.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Entry counted back from the newest: `nth_back(0)` is the newest.
    pub fn nth_back(&self, n: usize) -> Option<&T> {
        let len = self.entries.len();
        if n >= len {
            return None;
        }
        self.entries.get(len - 1 - n)
    }

    /// Most recently pushed entry.
    pub fn newest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }
}

impl<T, const N: usize> Default for Bounded<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FromIterator<T> for Bounded<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ring = Self::new();
        ring.extend(iter);
        ring
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize, const N: usize> serde::Serialize for Bounded<T, N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>, const N: usize> serde::Deserialize<'de> for Bounded<T, N> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = alloc::vec::Vec::<T>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
