//! Insertion-ordered map.
//!
//! Manifest sections must render in a stable order, so anything keyed that
//! ends up in output goes through [`OrderedMap`] instead of a `HashMap`.
//! Entries live in an arena (`Vec`) and a hash index points into it; iteration
//! always walks the arena.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// A map that remembers the order in which keys were first inserted.
///
/// Re-inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
  entries: Vec<(K, V)>,
  index: HashMap<K, usize>,
}

impl<K, V> Default for OrderedMap<K, V> {
  fn default() -> Self {
    Self {
      entries: Vec::new(),
      index: HashMap::new(),
    }
  }
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or update a value, returning the previous value if the key existed.
  pub fn insert(&mut self, key: K, value: V) -> Option<V> {
    match self.index.get(&key) {
      Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, value)),
      None => {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
      }
    }
  }

  pub fn get<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Eq + Hash + ?Sized,
  {
    self.index.get(key).map(|&slot| &self.entries[slot].1)
  }

  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Eq + Hash + ?Sized,
  {
    self.index.contains_key(key)
  }

  /// Keys in first-insertion order.
  ///
  /// The iterator is cheap to clone, so it can be restarted from the beginning.
  pub fn keys(&self) -> Keys<'_, K, V> {
    Keys {
      inner: self.entries.iter(),
    }
  }

  /// `(key, value)` pairs in first-insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + Clone {
    self.entries.iter().map(|(k, v)| (k, v))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
  fn eq(&self, other: &Self) -> bool {
    self.entries == other.entries
  }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for OrderedMap<K, V> {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut map = Self::new();
    for (key, value) in iter {
      map.insert(key, value);
    }
    map
  }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
  type Item = &'a (K, V);
  type IntoIter = std::slice::Iter<'a, (K, V)>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}

/// Iterator over the keys of an [`OrderedMap`].
#[derive(Debug)]
pub struct Keys<'a, K, V> {
  inner: std::slice::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Keys<'_, K, V> {
  fn clone(&self) -> Self {
    Keys {
      inner: self.inner.clone(),
    }
  }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
  type Item = &'a K;

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next().map(|(k, _)| k)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
