/*
 * Copyright 2021 Luca Fulchir <luker@fenrirproject.org>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Fixed-capacity two-way set-associative cache
//!
//! `N` slots, grouped in `N / 2` bucket pairs. A key can only ever live in
//! the two slots of its pair, `(hash % N) & !1` and the one after it.

use crate::results::{Error, InsertResult};
use crate::tag::Prefilter;
use crate::user::{Key, Val};
use ::hashbrown::hash_map::DefaultHashBuilder;
use ::std::hash::{BuildHasher, Hasher};
use ::tracing::{debug, trace};

/// Fixed-capacity cache where every key has two possible slots
///
/// * all `N` slots are allocated inline at construction, nothing is
///   allocated afterwards
/// * `N` must be a power of two and at least 2, checked at compile time
/// * there is no remove: entries only go away by eviction or `clear()`
/// * inserting a key that is already present is a caller bug
///   (`debug_assert!`), use [`try_insert`](Self::try_insert) for the checked
///   version
///
/// References returned by `find`/`insert` borrow the cache mutably, since the
/// next lookup can swap the two slots of a pair.
///
/// A capacity that is not a power of two does not build:
///
/// ```compile_fail
/// use twoway::FixedCapacityCache;
///
/// let _cache = FixedCapacityCache::<u64, u32, 3>::new();
/// ```
///
/// and neither does one with no bucket pair at all:
///
/// ```compile_fail
/// use twoway::FixedCapacityCache;
///
/// let _cache = FixedCapacityCache::<u64, u32, 0>::new();
/// ```
///
/// ```
/// use twoway::FixedCapacityCache;
///
/// let cache = FixedCapacityCache::<u64, u32, 2>::new();
/// assert_eq!(cache.capacity(), 2);
/// ```
#[derive(Clone)]
pub struct FixedCapacityCache<K, V, const N: usize, S = DefaultHashBuilder> {
    entries: [(K, V); N],
    // parallel to `entries`, 0 == empty slot
    tags: [Prefilter; N],
    usage: usize,
    hash_builder: S,
}

impl<K, V, const N: usize> FixedCapacityCache<K, V, N, DefaultHashBuilder>
where
    K: Key,
    V: Val,
{
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, const N: usize, S> Default for FixedCapacityCache<K, V, N, S>
where
    K: Key,
    V: Val,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, const N: usize, S> FixedCapacityCache<K, V, N, S> {
    const VALID_CAPACITY: () = assert!(
        N >= 2 && N.is_power_of_two(),
        "capacity must be a power of two and at least 2"
    );

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
    /// Number of occupied slots
    #[inline]
    pub fn len(&self) -> usize {
        self.usage
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.usage == 0
    }
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
    /// Iterate over the occupied slots, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.tags
            .iter()
            .zip(self.entries.iter())
            .filter(|(tag, _)| tag.is_occupied())
            .map(|(_, (k, v))| (k, v))
    }

    /// first slot of the bucket pair for `hash`
    #[inline]
    fn pair_base(hash: u64) -> usize {
        ((hash % N as u64) as usize) & !1
    }
}

impl<K, V, const N: usize, S> FixedCapacityCache<K, V, N, S>
where
    K: Key,
    V: Val,
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;
        debug!(capacity = N, "fixed capacity cache created");
        FixedCapacityCache {
            entries: ::std::array::from_fn(|_| (K::empty(), V::default())),
            tags: [Prefilter::EMPTY; N],
            usage: 0,
            hash_builder,
        }
    }

    /// The hash the cache uses for `key`
    ///
    /// Compute it once and pass it to `find_with_hash`/`insert_with_hash` to
    /// avoid hashing twice on a miss-then-insert path
    pub fn hash(&self, key: &K) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    fn holds(&self, idx: usize, tag: Prefilter, key: &K) -> bool {
        self.tags[idx] == tag && self.entries[idx].0 == *key
    }

    #[inline]
    pub fn find(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash(key);
        self.find_with_hash(key, hash)
    }

    /// Look up `key`. A hit on the second slot of the pair is swapped into
    /// the first slot before returning.
    pub fn find_with_hash(&mut self, key: &K, hash: u64) -> Option<&mut V> {
        debug_assert!(!key.is_empty_marker(), "lookup of the empty key");
        let base = Self::pair_base(hash);
        let tag = Prefilter::from_hash::<N>(hash);
        if self.holds(base, tag, key) {
            return Some(&mut self.entries[base].1);
        }
        if self.holds(base + 1, tag, key) {
            self.tags.swap(base, base + 1);
            self.entries.swap(base, base + 1);
            return Some(&mut self.entries[base].1);
        }
        None
    }

    /// Look up `key` without touching the slot order
    pub fn peek(&self, key: &K) -> Option<&V> {
        debug_assert!(!key.is_empty_marker(), "lookup of the empty key");
        let hash = self.hash(key);
        let base = Self::pair_base(hash);
        let tag = Prefilter::from_hash::<N>(hash);
        (base..base + 2)
            .find(|&idx| self.holds(idx, tag, key))
            .map(|idx| &self.entries[idx].1)
    }

    pub fn contains(&self, key: &K) -> bool {
        let hash = self.hash(key);
        self.contains_with_hash(key, hash)
    }

    fn contains_with_hash(&self, key: &K, hash: u64) -> bool {
        let base = Self::pair_base(hash);
        let tag = Prefilter::from_hash::<N>(hash);
        self.holds(base, tag, key) || self.holds(base + 1, tag, key)
    }

    #[inline]
    pub fn insert(&mut self, key: K, val: V) -> &mut V {
        let hash = self.hash(&key);
        self.insert_full_with_hash(key, val, hash).1
    }

    #[inline]
    pub fn insert_with_hash(&mut self, key: K, val: V, hash: u64) -> &mut V {
        self.insert_full_with_hash(key, val, hash).1
    }

    pub fn insert_full(
        &mut self,
        key: K,
        val: V,
    ) -> (InsertResult<K, V>, &mut V) {
        let hash = self.hash(&key);
        self.insert_full_with_hash(key, val, hash)
    }

    /// Store a key that is not in the cache yet.
    ///
    /// Fills the first slot of the pair if it is empty, otherwise overwrites
    /// the second slot and returns its old occupant, if any.
    pub fn insert_full_with_hash(
        &mut self,
        key: K,
        val: V,
        hash: u64,
    ) -> (InsertResult<K, V>, &mut V) {
        debug_assert!(!key.is_empty_marker(), "insert of the empty key");
        debug_assert!(
            !self.contains_with_hash(&key, hash),
            "insert of a key that is already cached"
        );
        let base = Self::pair_base(hash);
        let idx = if self.tags[base].is_occupied() {
            base + 1
        } else {
            base
        };
        let old_tag = ::std::mem::replace(
            &mut self.tags[idx],
            Prefilter::from_hash::<N>(hash),
        );
        let (old_key, old_val) =
            ::std::mem::replace(&mut self.entries[idx], (key, val));
        let res = if old_tag.is_occupied() {
            trace!(slot = idx, "evicted second slot of bucket pair");
            InsertResult::Evicted(old_key, old_val)
        } else {
            self.usage += 1;
            InsertResult::Success
        };
        (res, &mut self.entries[idx].1)
    }

    /// Checked insert: reports the empty sentinel and duplicates as errors
    /// instead of asserting
    pub fn try_insert(&mut self, key: K, val: V) -> Result<&mut V, Error> {
        if key.is_empty_marker() {
            return Err(Error::EmptyKey);
        }
        let hash = self.hash(&key);
        if self.contains_with_hash(&key, hash) {
            return Err(Error::DuplicateKey);
        }
        Ok(self.insert_with_hash(key, val, hash))
    }

    /// Memoize: return the cached value for `key`, or compute it with `f`
    /// and cache it
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.hash(&key);
        if self.find_with_hash(&key, hash).is_some() {
            // a hit always ends up in the first slot
            let base = Self::pair_base(hash);
            return &mut self.entries[base].1;
        }
        self.insert_with_hash(key, f(), hash)
    }

    /// Empty every slot. Keys and values are dropped, nothing is freed or
    /// allocated
    pub fn clear(&mut self) {
        for (tag, entry) in self.tags.iter_mut().zip(self.entries.iter_mut())
        {
            if tag.is_occupied() {
                *entry = (K::empty(), V::default());
                *tag = Prefilter::EMPTY;
            }
        }
        debug!(dropped = self.usage, "fixed capacity cache cleared");
        self.usage = 0;
    }
}

impl<K, V, const N: usize, S> ::std::fmt::Debug
    for FixedCapacityCache<K, V, N, S>
where
    K: ::std::fmt::Debug,
    V: ::std::fmt::Debug,
{
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
