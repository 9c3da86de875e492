// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent hopscotch hash table (§2.2, §4.9).
//!
//! One concurrent writer, protected by an internal [`parking_lot::Mutex`];
//! any number of lock-free readers. A reader never blocks and never takes
//! the writer lock — it tolerates concurrent insert/remove/resize through a
//! per-bucket timestamp protocol: read the home bucket's timestamp, scan its
//! hop window, read the timestamp again, and retry the scan if it changed
//! mid-read. After [`CHH_MAX_TRIES`] retries a reader falls back to a full
//! linear scan, which is always correct (if slower) because it does not
//! depend on any single bucket's hop bits being stable.
//!
//! The bucket array itself is reclaimed through [`crossbeam::epoch`]: a
//! resize publishes a new array and defers freeing the old one until every
//! reader that might still be dereferencing it has passed a quiescent
//! point. This is this crate's chosen answer to §9's "gc callback the
//! embedder wires into its epoch-based or grace-period reclamation scheme."
//!
//! `HOP_RANGE` bounds how far an entry can live from its home bucket (the
//! bucket its hash maps to): every entry for a given home is within the
//! next 32 buckets, so a lookup never has to look further than that to
//! decide an entry is absent. `ADD_RANGE` bounds how far an insert is
//! willing to linear-probe for a free bucket before giving up and resizing;
//! the hopscotch displacement step then walks any such free bucket back
//! into the home's hop window by shuffling occupied entries forward.
//!
//! [`HashTable`] is the sequential (single-writer) counterpart: the same
//! hopscotch displacement scheme with no atomics, locking, or epoch
//! reclamation, for callers that own a table on one thread for its whole
//! lifetime and don't need [`ConcurrentHashTable`]'s concurrency machinery.

use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crossbeam::epoch::{self, Atomic, Owned, Shared};
use parking_lot::Mutex;

/// Entries live within 32 buckets of their home bucket.
const HOP_RANGE: usize = 32;
/// How far an insert will linear-probe for a free bucket before resizing.
const ADD_RANGE: usize = 64;
/// Reader retries before falling back to a full linear scan.
const CHH_MAX_TRIES: u32 = 4;
/// Resize once the table crosses this fill fraction.
const MAX_LOAD_FACTOR: f64 = 0.75;

struct Entry<K, V> {
    key: K,
    value: V,
}

struct Bucket<K, V> {
    /// Bit `i` set means the entry whose home is this bucket lives at
    /// `this + i`.
    hopinfo: AtomicU32,
    /// Bumped (by one) before and after any mutation touching this
    /// bucket's hop window; readers compare before/after to detect a torn
    /// read.
    timestamp: AtomicU32,
    slot: Atomic<Entry<K, V>>,
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self {
            hopinfo: AtomicU32::new(0),
            timestamp: AtomicU32::new(0),
            slot: Atomic::null(),
        }
    }
}

struct Table<K, V> {
    buckets: Box<[Bucket<K, V>]>,
    mask: usize,
}

impl<K, V> Table<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.next_power_of_two().max(HOP_RANGE);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Bucket::default);
        Self {
            buckets: buckets.into_boxed_slice(),
            mask: capacity - 1,
        }
    }

    fn home(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }
}

/// A resizable, open-addressed concurrent hash table using hopscotch
/// hashing (§2.2).
pub struct ConcurrentHashTable<K, V, S = std::collections::hash_map::RandomState> {
    table: Atomic<Table<K, V>>,
    write_lock: Mutex<()>,
    len: AtomicUsize,
    hasher: S,
}

impl<K, V> ConcurrentHashTable<K, V, std::collections::hash_map::RandomState>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(HOP_RANGE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: Atomic::new(Table::with_capacity(capacity)),
            write_lock: Mutex::new(()),
            len: AtomicUsize::new(0),
            hasher: Default::default(),
        }
    }
}

impl<K, V> Default for ConcurrentHashTable<K, V, std::collections::hash_map::RandomState>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ConcurrentHashTable<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn hash_of(&self, key: &K) -> u64 {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Number of entries currently stored. Exact with respect to the writer
    /// (it is only ever mutated under `write_lock`); a concurrent reader
    /// may observe a value that is momentarily stale by one mutation.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lock-free lookup (§4.9 "Lookup"). Never blocks and never takes the
    /// writer lock.
    pub fn get(&self, key: &K) -> Option<V> {
        let guard = epoch::pin();
        let hash = self.hash_of(key);
        let table = unsafe { self.table.load(Ordering::Acquire, &guard).as_ref() }?;
        let home = table.home(hash);

        for _ in 0..CHH_MAX_TRIES {
            let before = table.buckets[home].timestamp.load(Ordering::Acquire);
            if let Some(value) = Self::scan_hop_window(table, home, key, &guard) {
                let after = table.buckets[home].timestamp.load(Ordering::Acquire);
                if before == after {
                    return Some(value);
                }
                continue;
            }
            let after = table.buckets[home].timestamp.load(Ordering::Acquire);
            if before == after {
                return None;
            }
        }

        // Retries exhausted under contention: fall back to a full linear
        // scan, which cannot be torn by a single bucket's hop-bit update.
        Self::linear_scan(table, key, &guard)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn scan_hop_window<'g>(
        table: &Table<K, V>,
        home: usize,
        key: &K,
        guard: &'g epoch::Guard,
    ) -> Option<V> {
        let hopinfo = table.buckets[home].hopinfo.load(Ordering::Acquire);
        for i in 0..HOP_RANGE {
            if hopinfo & (1 << i) == 0 {
                continue;
            }
            let idx = (home + i) & table.mask;
            let slot = table.buckets[idx].slot.load(Ordering::Acquire, guard);
            if let Some(entry) = unsafe { slot.as_ref() } {
                if &entry.key == key {
                    return Some(entry.value.clone());
                }
            }
        }
        None
    }

    fn linear_scan<'g>(table: &Table<K, V>, key: &K, guard: &'g epoch::Guard) -> Option<V> {
        for bucket in table.buckets.iter() {
            let slot = bucket.slot.load(Ordering::Acquire, guard);
            if let Some(entry) = unsafe { slot.as_ref() } {
                if &entry.key == key {
                    return Some(entry.value.clone());
                }
            }
        }
        None
    }

    /// Insert or update `key`'s value. Takes the writer lock; serializes
    /// with every other mutation.
    pub fn insert(&self, key: K, value: V) {
        let _writer = self.write_lock.lock();
        let guard = epoch::pin();

        loop {
            let hash = self.hash_of(&key);
            let shared = self.table.load(Ordering::Acquire, &guard);
            let table = unsafe { shared.as_ref() }.expect("table always present");
            let home = table.home(hash);

            if let Some(idx) = Self::find_in_hop_window(table, home, &key, &guard) {
                Self::publish(table, idx, key, value, &guard);
                return;
            }

            match Self::place_new_entry(table, home, key.clone(), value.clone(), &guard) {
                Some(()) => {
                    self.len.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                None => self.resize(shared, table, &guard),
            }
        }
    }

    fn find_in_hop_window(
        table: &Table<K, V>,
        home: usize,
        key: &K,
        guard: &epoch::Guard,
    ) -> Option<usize> {
        let hopinfo = table.buckets[home].hopinfo.load(Ordering::Acquire);
        for i in 0..HOP_RANGE {
            if hopinfo & (1 << i) == 0 {
                continue;
            }
            let idx = (home + i) & table.mask;
            let slot = table.buckets[idx].slot.load(Ordering::Acquire, guard);
            if let Some(entry) = unsafe { slot.as_ref() } {
                if &entry.key == key {
                    return Some(idx);
                }
            }
        }
        None
    }

    fn publish(table: &Table<K, V>, idx: usize, key: K, value: V, guard: &epoch::Guard) {
        let bucket = &table.buckets[idx];
        bucket.timestamp.fetch_add(1, Ordering::AcqRel);
        let new = Owned::new(Entry { key, value });
        let old = bucket.slot.swap(new, Ordering::AcqRel, guard);
        if !old.is_null() {
            unsafe { guard.defer_destroy(old) };
        }
        bucket.timestamp.fetch_add(1, Ordering::AcqRel);
    }

    /// Find (possibly by displacing entries closer to their own home
    /// buckets) a bucket within `home`'s hop window, then publish the new
    /// entry there. Returns `None` if no free bucket could be brought
    /// within range inside `ADD_RANGE`, signalling the caller to resize.
    fn place_new_entry(
        table: &Table<K, V>,
        home: usize,
        key: K,
        value: V,
        guard: &epoch::Guard,
    ) -> Option<()> {
        let mut free = None;
        for i in 0..ADD_RANGE {
            let idx = (home + i) & table.mask;
            if table.buckets[idx].slot.load(Ordering::Acquire, guard).is_null() {
                free = Some((idx, i));
                break;
            }
        }
        let (mut free_idx, mut free_distance) = free?;

        while free_distance >= HOP_RANGE {
            let moved = Self::find_closer_free_bucket(table, free_idx, guard)?;
            free_idx = moved;
            free_distance = free_idx.wrapping_sub(home) & table.mask;
        }

        let bucket = &table.buckets[home];
        bucket.timestamp.fetch_add(1, Ordering::AcqRel);
        let new = Owned::new(Entry { key, value });
        table.buckets[free_idx].slot.store(new, Ordering::Release);
        bucket.hopinfo.fetch_or(1 << free_distance, Ordering::AcqRel);
        bucket.timestamp.fetch_add(1, Ordering::AcqRel);
        Some(())
    }

    /// Walk backward from `free_idx` looking for an occupied bucket whose
    /// home is within `HOP_RANGE` of `free_idx`, so its entry can move into
    /// `free_idx` and free up a bucket closer to its own home. Mirrors
    /// `ddsrt_chh_find_closer_free_bucket`.
    fn find_closer_free_bucket(
        table: &Table<K, V>,
        free_idx: usize,
        guard: &epoch::Guard,
    ) -> Option<usize> {
        for back in (1..HOP_RANGE).rev() {
            let candidate_home = free_idx.wrapping_sub(back) & table.mask;
            let hopinfo = table.buckets[candidate_home].hopinfo.load(Ordering::Acquire);
            for i in 0..back {
                if hopinfo & (1 << i) == 0 {
                    continue;
                }
                let occupied_idx = (candidate_home + i) & table.mask;
                let slot = table.buckets[occupied_idx].slot.load(Ordering::Acquire, guard);
                let entry = unsafe { slot.as_ref() }?;

                let bucket = &table.buckets[candidate_home];
                bucket.timestamp.fetch_add(1, Ordering::AcqRel);

                let moved = Owned::new(Entry {
                    key: entry.key.clone(),
                    value: entry.value.clone(),
                });
                let old = table.buckets[free_idx].slot.swap(moved, Ordering::AcqRel, guard);
                debug_assert!(old.is_null());

                bucket.hopinfo.fetch_and(!(1 << i), Ordering::AcqRel);
                bucket.hopinfo.fetch_or(1 << back, Ordering::AcqRel);

                let vacated = table.buckets[occupied_idx]
                    .slot
                    .swap(Shared::null(), Ordering::AcqRel, guard);
                unsafe { guard.defer_destroy(vacated) };

                bucket.timestamp.fetch_add(1, Ordering::AcqRel);
                return Some(occupied_idx);
            }
        }
        None
    }

    /// Remove `key`, returning its value if present.
    pub fn remove(&self, key: &K) -> Option<V> {
        let _writer = self.write_lock.lock();
        let guard = epoch::pin();
        let hash = self.hash_of(key);
        let shared = self.table.load(Ordering::Acquire, &guard);
        let table = unsafe { shared.as_ref() }.expect("table always present");
        let home = table.home(hash);

        let hopinfo = table.buckets[home].hopinfo.load(Ordering::Acquire);
        for i in 0..HOP_RANGE {
            if hopinfo & (1 << i) == 0 {
                continue;
            }
            let idx = (home + i) & table.mask;
            let slot = table.buckets[idx].slot.load(Ordering::Acquire, &guard);
            let matches = unsafe { slot.as_ref() }.is_some_and(|entry| &entry.key == key);
            if !matches {
                continue;
            }

            let bucket = &table.buckets[home];
            bucket.timestamp.fetch_add(1, Ordering::AcqRel);
            bucket.hopinfo.fetch_and(!(1 << i), Ordering::AcqRel);
            let old = table.buckets[idx].slot.swap(Shared::null(), Ordering::AcqRel, &guard);
            let value = unsafe { old.as_ref() }.map(|e| e.value.clone());
            unsafe { guard.defer_destroy(old) };
            bucket.timestamp.fetch_add(1, Ordering::AcqRel);
            self.len.fetch_sub(1, Ordering::Relaxed);
            return value;
        }
        None
    }

    /// Snapshot every `(key, value)` currently stored. Used by callers that
    /// need to walk the whole table (e.g. metadata dumps, tests).
    pub fn enumerate(&self) -> Vec<(K, V)> {
        let guard = epoch::pin();
        let shared = self.table.load(Ordering::Acquire, &guard);
        let table = unsafe { shared.as_ref() }.expect("table always present");
        let mut out = Vec::with_capacity(self.len());
        for bucket in table.buckets.iter() {
            let slot = bucket.slot.load(Ordering::Acquire, &guard);
            if let Some(entry) = unsafe { slot.as_ref() } {
                out.push((entry.key.clone(), entry.value.clone()));
            }
        }
        out
    }

    fn resize(&self, old_shared: Shared<Table<K, V>>, old_table: &Table<K, V>, guard: &epoch::Guard) {
        let new_capacity = (old_table.buckets.len() * 2).max(HOP_RANGE);
        let new_table = Table::with_capacity(new_capacity);

        // Every occupied bucket is unlinked from the old table (and its
        // entry handed to the epoch collector) as it is re-inserted into
        // the new one, so no entry is ever reachable from both tables at
        // once and nothing leaks.
        for bucket in old_table.buckets.iter() {
            let old_slot = bucket.slot.swap(Shared::null(), Ordering::AcqRel, guard);
            let Some(entry) = (unsafe { old_slot.as_ref() }) else {
                continue;
            };
            let hash = self.hash_of(&entry.key);
            let home = new_table.home(hash);
            let key = entry.key.clone();
            let value = entry.value.clone();
            Self::place_new_entry(&new_table, home, key, value, guard)
                .expect("freshly doubled table has room for every existing entry");
            unsafe { guard.defer_destroy(old_slot) };
        }

        self.table.store(Owned::new(new_table), Ordering::Release);
        unsafe { guard.defer_destroy(old_shared) };
    }

    /// Whether the table should grow before the next insert, per
    /// [`MAX_LOAD_FACTOR`]. Exposed for callers pre-sizing a table at
    /// topic-registration time.
    pub fn should_grow(&self) -> bool {
        let guard = epoch::pin();
        let table = unsafe { self.table.load(Ordering::Acquire, &guard).as_ref() }
            .expect("table always present");
        self.len() as f64 / table.buckets.len() as f64 > MAX_LOAD_FACTOR
    }
}

impl<K, V, S> Drop for ConcurrentHashTable<K, V, S> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` proves no other thread holds a reference to
        // this table, so every entry can be freed immediately without an
        // epoch guard.
        let shared = self.table.load(Ordering::Relaxed, unsafe { epoch::unprotected() });
        if let Some(table) = unsafe { shared.as_ref() } {
            for bucket in table.buckets.iter() {
                let slot = bucket.slot.load(Ordering::Relaxed, unsafe { epoch::unprotected() });
                if !slot.is_null() {
                    unsafe { drop(slot.into_owned()) };
                }
            }
        }
        if !shared.is_null() {
            unsafe { drop(shared.into_owned()) };
        }
    }
}

// SAFETY: all mutation goes through `write_lock` or the epoch-guarded
// bucket CAS/swap operations; `K: Send + Sync` and `V: Send + Sync` are the
// only additional requirements for moving/sharing the table across threads.
unsafe impl<K: Send + Sync, V: Send + Sync, S: Send> Send for ConcurrentHashTable<K, V, S> {}
unsafe impl<K: Send + Sync, V: Send + Sync, S: Sync> Sync for ConcurrentHashTable<K, V, S> {}

struct SeqBucket<K, V> {
    hopinfo: u32,
    slot: Option<Entry<K, V>>,
}

impl<K, V> Default for SeqBucket<K, V> {
    fn default() -> Self {
        Self { hopinfo: 0, slot: None }
    }
}

/// Sequential (single-writer, single-reader) hopscotch hash table —
/// `ddsrt_hh_*`'s plain counterpart to [`ConcurrentHashTable`]'s
/// `ddsrt_chh_*`. No locking, no epoch reclamation: every operation takes
/// `&mut self` for mutation, or `&self` for read-only lookup with no
/// concurrent-writer protocol to speak of, since there is only ever one
/// accessor. Used where a table is owned by a single thread for its whole
/// lifetime and the concurrent table's lock/epoch overhead buys nothing.
pub struct HashTable<K, V, S = std::collections::hash_map::RandomState> {
    buckets: Vec<SeqBucket<K, V>>,
    mask: usize,
    len: usize,
    hasher: S,
}

impl<K, V> HashTable<K, V, std::collections::hash_map::RandomState>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(HOP_RANGE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.next_power_of_two().max(HOP_RANGE);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, SeqBucket::default);
        Self {
            buckets,
            mask: capacity - 1,
            len: 0,
            hasher: Default::default(),
        }
    }
}

impl<K, V> Default for HashTable<K, V, std::collections::hash_map::RandomState>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn hash_of(&self, key: &K) -> u64 {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn home(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let home = self.home(self.hash_of(key));
        let hopinfo = self.buckets[home].hopinfo;
        for i in 0..HOP_RANGE {
            if hopinfo & (1 << i) == 0 {
                continue;
            }
            let idx = (home + i) & self.mask;
            if let Some(entry) = &self.buckets[idx].slot {
                if &entry.key == key {
                    return Some(&entry.value);
                }
            }
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: K, value: V) {
        loop {
            let home = self.home(self.hash_of(&key));

            let hopinfo = self.buckets[home].hopinfo;
            for i in 0..HOP_RANGE {
                if hopinfo & (1 << i) == 0 {
                    continue;
                }
                let idx = (home + i) & self.mask;
                if self.buckets[idx].slot.as_ref().is_some_and(|e| e.key == key) {
                    self.buckets[idx].slot = Some(Entry { key, value });
                    return;
                }
            }

            if self.place_new_entry(home, key.clone(), value).is_some() {
                self.len += 1;
                return;
            }

            self.resize();
        }
    }

    fn place_new_entry(&mut self, home: usize, key: K, value: V) -> Option<()> {
        let mut free = None;
        for i in 0..ADD_RANGE {
            let idx = (home + i) & self.mask;
            if self.buckets[idx].slot.is_none() {
                free = Some((idx, i));
                break;
            }
        }
        let (mut free_idx, mut free_distance) = free?;

        while free_distance >= HOP_RANGE {
            let moved = self.find_closer_free_bucket(free_idx)?;
            free_idx = moved;
            free_distance = free_idx.wrapping_sub(home) & self.mask;
        }

        self.buckets[free_idx].slot = Some(Entry { key, value });
        self.buckets[home].hopinfo |= 1 << free_distance;
        Some(())
    }

    fn find_closer_free_bucket(&mut self, free_idx: usize) -> Option<usize> {
        for back in (1..HOP_RANGE).rev() {
            let candidate_home = free_idx.wrapping_sub(back) & self.mask;
            let hopinfo = self.buckets[candidate_home].hopinfo;
            for i in 0..back {
                if hopinfo & (1 << i) == 0 {
                    continue;
                }
                let occupied_idx = (candidate_home + i) & self.mask;
                if self.buckets[occupied_idx].slot.is_none() {
                    continue;
                }
                let entry = self.buckets[occupied_idx].slot.take().unwrap();
                self.buckets[free_idx].slot = Some(entry);
                self.buckets[candidate_home].hopinfo &= !(1 << i);
                self.buckets[candidate_home].hopinfo |= 1 << back;
                return Some(occupied_idx);
            }
        }
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let home = self.home(self.hash_of(key));
        let hopinfo = self.buckets[home].hopinfo;
        for i in 0..HOP_RANGE {
            if hopinfo & (1 << i) == 0 {
                continue;
            }
            let idx = (home + i) & self.mask;
            if self.buckets[idx].slot.as_ref().is_some_and(|e| &e.key == key) {
                let entry = self.buckets[idx].slot.take().unwrap();
                self.buckets[home].hopinfo &= !(1 << i);
                self.len -= 1;
                return Some(entry.value);
            }
        }
        None
    }

    /// Iterate every stored `(key, value)` pair. Declaration order matches
    /// bucket order, not insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().filter_map(|b| b.slot.as_ref().map(|e| (&e.key, &e.value)))
    }

    fn resize(&mut self) {
        let new_capacity = (self.buckets.len() * 2).max(HOP_RANGE);
        let old_buckets = std::mem::replace(&mut self.buckets, {
            let mut buckets = Vec::with_capacity(new_capacity);
            buckets.resize_with(new_capacity, SeqBucket::default);
            buckets
        });
        self.mask = new_capacity - 1;

        for bucket in old_buckets {
            if let Some(entry) = bucket.slot {
                let home = self.home(self.hash_of(&entry.key));
                self.place_new_entry(home, entry.key, entry.value)
                    .expect("freshly doubled table has room for every existing entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn insert_then_get_round_trips() {
        let table = ConcurrentHashTable::new();
        table.insert(1u32, "one");
        table.insert(2u32, "two");
        assert_eq!(table.get(&1), Some("one"));
        assert_eq!(table.get(&2), Some("two"));
        assert_eq!(table.get(&3), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn insert_overwrites_existing_key() {
        let table = ConcurrentHashTable::new();
        table.insert(1u32, "one");
        table.insert(1u32, "uno");
        assert_eq!(table.get(&1), Some("uno"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn remove_drops_the_entry() {
        let table = ConcurrentHashTable::new();
        table.insert(1u32, "one");
        assert_eq!(table.remove(&1), Some("one"));
        assert_eq!(table.get(&1), None);
        assert_eq!(table.len(), 0);
        assert_eq!(table.remove(&1), None);
    }

    #[test]
    fn grows_past_initial_capacity_without_losing_entries() {
        let table = ConcurrentHashTable::new();
        for i in 0..5000u32 {
            table.insert(i, i * 2);
        }
        assert_eq!(table.len(), 5000);
        for i in 0..5000u32 {
            assert_eq!(table.get(&i), Some(i * 2));
        }
    }

    #[test]
    fn enumerate_yields_every_surviving_key_once() {
        let table = Arc::new(ConcurrentHashTable::new());
        for i in 0..1000u32 {
            table.insert(i, i);
        }
        for i in 0..500u32 {
            table.remove(&i);
        }
        let mut keys: Vec<u32> = table.enumerate().into_iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        let expected: Vec<u32> = (500..1000).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn concurrent_mutation_and_lookups_stay_linearizable() {
        let table = Arc::new(ConcurrentHashTable::new());
        let mut writers = Vec::new();
        for t in 0..4u32 {
            let table = Arc::clone(&table);
            writers.push(thread::spawn(move || {
                for i in (t..1000).step_by(4) {
                    table.insert(i, i);
                }
                for i in (t..500).step_by(4) {
                    table.remove(&i);
                }
            }));
        }

        let reader_table = Arc::clone(&table);
        let reader = thread::spawn(move || {
            for _ in 0..1_000_000u32 {
                let key = fastrand::u32(0..1000);
                if let Some(v) = reader_table.get(&key) {
                    assert_eq!(v, key);
                }
            }
        });

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        let mut keys: Vec<u32> = table.enumerate().into_iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        let expected: Vec<u32> = (500..1000).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn sequential_table_insert_then_get_round_trips() {
        let mut table = HashTable::new();
        table.insert(1u32, "one");
        table.insert(2u32, "two");
        assert_eq!(table.get(&1), Some(&"one"));
        assert_eq!(table.get(&2), Some(&"two"));
        assert_eq!(table.get(&3), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn sequential_table_insert_overwrites_existing_key() {
        let mut table = HashTable::new();
        table.insert(1u32, "one");
        table.insert(1u32, "uno");
        assert_eq!(table.get(&1), Some(&"uno"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn sequential_table_remove_drops_the_entry() {
        let mut table = HashTable::new();
        table.insert(1u32, "one");
        assert_eq!(table.remove(&1), Some("one"));
        assert_eq!(table.get(&1), None);
        assert_eq!(table.len(), 0);
        assert_eq!(table.remove(&1), None);
    }

    #[test]
    fn sequential_table_grows_past_initial_capacity_without_losing_entries() {
        let mut table = HashTable::new();
        for i in 0..5000u32 {
            table.insert(i, i * 2);
        }
        assert_eq!(table.len(), 5000);
        for i in 0..5000u32 {
            assert_eq!(table.get(&i), Some(&(i * 2)));
        }
    }

    #[test]
    fn sequential_table_iter_yields_every_entry_once() {
        let mut table = HashTable::new();
        for i in 0..200u32 {
            table.insert(i, i);
        }
        for i in 0..100u32 {
            table.remove(&i);
        }
        let mut keys: Vec<u32> = table.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        let expected: Vec<u32> = (100..200).collect();
        assert_eq!(keys, expected);
    }

    /// Cross-checks against [`ConcurrentHashTable`]: the same sequence of
    /// insert/remove operations, applied to both tables, must leave them
    /// agreeing on every surviving key — the sequential table is the
    /// conceptually simpler base the concurrent one generalizes, so their
    /// observable behavior should never diverge.
    #[test]
    fn sequential_and_concurrent_tables_agree() {
        let mut seq = HashTable::new();
        let conc = ConcurrentHashTable::new();
        for i in 0..500u32 {
            seq.insert(i, i * 3);
            conc.insert(i, i * 3);
        }
        for i in 0..200u32 {
            seq.remove(&i);
            conc.remove(&i);
        }
        for i in 0..500u32 {
            assert_eq!(seq.get(&i).copied(), conc.get(&i));
        }
    }
}
