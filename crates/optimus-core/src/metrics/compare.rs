use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Values of one key on both sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pair<V> {
    pub a: V,
    pub b: V,
}

/// Three-way classification of two keyed mappings.
///
/// Every key of either input lands in exactly one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSet<V> {
    pub common: BTreeMap<String, Pair<V>>,
    pub different: BTreeMap<String, Pair<V>>,
    pub only_in_a: BTreeMap<String, V>,
    pub only_in_b: BTreeMap<String, V>,
}

impl<V> Default for ComparisonSet<V> {
    fn default() -> Self {
        Self {
            common: BTreeMap::new(),
            different: BTreeMap::new(),
            only_in_a: BTreeMap::new(),
            only_in_b: BTreeMap::new(),
        }
    }
}

impl<V> ComparisonSet<V> {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.common.len() + self.different.len() + self.only_in_a.len() + self.only_in_b.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.common.contains_key(key)
            || self.different.contains_key(key)
            || self.only_in_a.contains_key(key)
            || self.only_in_b.contains_key(key)
    }

    /// All keys across the four partitions.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.common
            .keys()
            .chain(self.different.keys())
            .chain(self.only_in_a.keys())
            .chain(self.only_in_b.keys())
            .map(String::as_str)
            .collect()
    }

    /// Build from partitions reported by a backend. A key claimed by more
    /// than one partition keeps the first claim, in the order different,
    /// only-in-A, only-in-B, common, so the result stays disjoint.
    pub fn from_partitions(
        different: impl IntoIterator<Item = (String, Pair<V>)>,
        only_in_a: impl IntoIterator<Item = (String, V)>,
        only_in_b: impl IntoIterator<Item = (String, V)>,
        common: impl IntoIterator<Item = (String, Pair<V>)>,
    ) -> Self {
        let mut set = Self::default();

        for (key, pair) in different {
            if !set.contains_key(&key) {
                set.different.insert(key, pair);
            }
        }
        for (key, value) in only_in_a {
            if !set.contains_key(&key) {
                set.only_in_a.insert(key, value);
            }
        }
        for (key, value) in only_in_b {
            if !set.contains_key(&key) {
                set.only_in_b.insert(key, value);
            }
        }
        for (key, pair) in common {
            if !set.contains_key(&key) {
                set.common.insert(key, pair);
            }
        }

        set
    }
}

/// Partition `a` and `b` into common, different, only-in-A and only-in-B.
pub fn three_way<V: Clone + PartialEq>(
    a: &BTreeMap<String, V>,
    b: &BTreeMap<String, V>,
) -> ComparisonSet<V> {
    let mut set = ComparisonSet::default();

    for (key, value_a) in a {
        match b.get(key) {
            Some(value_b) if value_b == value_a => {
                set.common.insert(
                    key.clone(),
                    Pair {
                        a: value_a.clone(),
                        b: value_b.clone(),
                    },
                );
            }
            Some(value_b) => {
                set.different.insert(
                    key.clone(),
                    Pair {
                        a: value_a.clone(),
                        b: value_b.clone(),
                    },
                );
            }
            None => {
                set.only_in_a.insert(key.clone(), value_a.clone());
            }
        }
    }

    for (key, value_b) in b {
        if !a.contains_key(key) {
            set.only_in_b.insert(key.clone(), value_b.clone());
        }
    }

    set
}

/// Signed count change of `key` from A to B; a side without the key counts zero.
/// Saturates at the `i64` bounds.
pub fn operator_delta(set: &ComparisonSet<i64>, key: &str) -> i64 {
    if let Some(pair) = set.common.get(key).or_else(|| set.different.get(key)) {
        return pair.b.saturating_sub(pair.a);
    }
    if let Some(a) = set.only_in_a.get(key) {
        return a.saturating_neg();
    }
    set.only_in_b.get(key).copied().unwrap_or(0)
}
