use super::Scalar;
use std::collections::HashMap;

/// An insertion-ordered mapping from synthesized keys to scalars.
///
/// Re-inserting an existing key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    entries: Vec<(String, Scalar)>,
    index: HashMap<String, usize>,
}

impl FlatRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Scalar) {
        let key = key.into();
        if let Some(&pos) = self.index.get(&key) {
            self.entries[pos].1 = value;
        } else {
            let _ = self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    /// Merge another record into this one, last write wins.
    pub fn extend(&mut self, other: Self) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for FlatRecord {
    fn from_iter<T: IntoIterator<Item = (K, Scalar)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let record: FlatRecord = [("b", Scalar::from(1)), ("a", Scalar::from(2))].into_iter().collect();
        assert_eq!(record.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut record = FlatRecord::new();
        record.insert("x", Scalar::from(1));
        record.insert("y", Scalar::from(2));
        record.insert("x", Scalar::from(3));

        assert_eq!(record.keys().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(record.get("x"), Some(&Scalar::from(3)));
    }

    #[test]
    fn test_extend_merges() {
        let mut left: FlatRecord = [("id", Scalar::from("d1"))].into_iter().collect();
        let right: FlatRecord = [("number_value", Scalar::from("7")), ("id", Scalar::from("d2"))].into_iter().collect();
        left.extend(right);

        assert_eq!(left.keys().collect::<Vec<_>>(), ["id", "number_value"]);
        assert_eq!(left.get("id"), Some(&Scalar::from("d2")));
    }

    #[test]
    fn test_empty() {
        let record = FlatRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.get("missing"), None);
    }
}
