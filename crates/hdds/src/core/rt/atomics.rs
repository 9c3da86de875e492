// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed atomics substrate (§2.1, §5 "Atomics").
//!
//! [`Atomic32`] and [`AtomicPtrCell`] are thin, `'static`-friendly aliases
//! over [`std::sync::atomic`] — aligned 32-bit and pointer-sized atomics are
//! lock-free on every target this crate supports, so there is nothing to
//! emulate there.
//!
//! [`Atomic64`] is the one place §5 calls out graceful degradation: "if the
//! platform provides them, they are used directly; otherwise, they are
//! emulated by a fixed-size array of mutexes indexed by a hash of the
//! atomic's address." `target_has_atomic = "64"` selects between the two
//! bodies at compile time so callers never see the difference.
//!
//! [`fence_ldld`] / [`fence_acqrel`] name the two fences the hopscotch hash
//! table's reader protocol actually needs (§4.9): an acquire fence between
//! reading a bucket's timestamp and its hopinfo/data, and a full fence
//! around publishing a moved entry.
//!
//! [`AtomicLifo`] is the "atomic LIFO built on top of [double-word CAS]"
//! from §2.1. The reference implementation packs a pointer and an ABA
//! counter into one CAS-able word; Rust has no portable equivalent to that
//! trick (and no safe way to dereference a bare atomic pointer without one).
//! [`crossbeam::epoch`] solves the same problem — a reader may still hold a
//! reference to a popped node — with deferred reclamation instead of an ABA
//! counter, which is the idiomatic Rust answer to "where a double-word CAS
//! is absent, a different data structure is chosen by its clients" (§5).

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crossbeam::epoch::{self, Atomic, Owned};

/// 32-bit atomic word. Lock-free on every supported target.
pub type Atomic32 = AtomicU32;

/// Pointer-sized atomic cell, for the hopscotch bucket array pointer and
/// per-bucket data pointer (§4.9 stores these as `ddsrt_atomic_voidp_t`).
#[derive(Debug)]
pub struct AtomicPtrCell<T> {
    inner: std::sync::atomic::AtomicPtr<T>,
}

impl<T> Default for AtomicPtrCell<T> {
    fn default() -> Self {
        Self::new(std::ptr::null_mut())
    }
}

impl<T> AtomicPtrCell<T> {
    pub const fn new(ptr: *mut T) -> Self {
        Self {
            inner: std::sync::atomic::AtomicPtr::new(ptr),
        }
    }

    pub fn load(&self, order: Ordering) -> *mut T {
        self.inner.load(order)
    }

    pub fn store(&self, ptr: *mut T, order: Ordering) {
        self.inner.store(ptr, order)
    }

    pub fn compare_exchange(
        &self,
        current: *mut T,
        new: *mut T,
        success: Ordering,
        failure: Ordering,
    ) -> Result<*mut T, *mut T> {
        self.inner.compare_exchange(current, new, success, failure)
    }
}

/// An acquire fence between reading a bucket's timestamp and scanning its
/// hopinfo/data (§4.9's reader consistency protocol — "a reader reads the
/// timestamp before and after the scan").
#[inline]
pub fn fence_ldld() {
    std::sync::atomic::fence(Ordering::Acquire);
}

/// A full fence around publishing a moved entry during
/// [`super::hash::ConcurrentHashTable`]'s bucket-shuffle or resize.
#[inline]
pub fn fence_acqrel() {
    std::sync::atomic::fence(Ordering::AcqRel);
}

#[cfg(target_has_atomic = "64")]
mod atomic64_impl {
    use std::sync::atomic::{AtomicU64, Ordering};

    /// 64-bit atomic word, direct hardware path.
    #[derive(Debug, Default)]
    pub struct Atomic64(AtomicU64);

    impl Atomic64 {
        pub const fn new(v: u64) -> Self {
            Self(AtomicU64::new(v))
        }
        pub fn load(&self, order: Ordering) -> u64 {
            self.0.load(order)
        }
        pub fn store(&self, v: u64, order: Ordering) {
            self.0.store(v, order)
        }
        pub fn fetch_add(&self, v: u64, order: Ordering) -> u64 {
            self.0.fetch_add(v, order)
        }
        pub fn compare_exchange(
            &self,
            current: u64,
            new: u64,
            success: Ordering,
            failure: Ordering,
        ) -> Result<u64, u64> {
            self.0.compare_exchange(current, new, success, failure)
        }
    }
}

#[cfg(not(target_has_atomic = "64"))]
mod atomic64_impl {
    use parking_lot::Mutex;
    use std::cell::UnsafeCell;
    use std::sync::atomic::Ordering;

    /// Number of mutex shards backing the emulated 64-bit atomics. Matches
    /// §5's "fixed-size array of mutexes indexed by a hash of the atomic's
    /// address" — a single global shard table rather than one mutex per
    /// instance, since on these targets 64-bit atomics are rare enough that
    /// per-instance locks would be wasted memory on the common path.
    const SHARDS: usize = 16;

    static LOCKS: [Mutex<()>; SHARDS] = [
        Mutex::new(()), Mutex::new(()), Mutex::new(()), Mutex::new(()),
        Mutex::new(()), Mutex::new(()), Mutex::new(()), Mutex::new(()),
        Mutex::new(()), Mutex::new(()), Mutex::new(()), Mutex::new(()),
        Mutex::new(()), Mutex::new(()), Mutex::new(()), Mutex::new(()),
    ];

    #[derive(Debug)]
    pub struct Atomic64(UnsafeCell<u64>);

    // SAFETY: all access goes through the address-hashed shard lock below.
    unsafe impl Sync for Atomic64 {}

    impl Default for Atomic64 {
        fn default() -> Self {
            Self::new(0)
        }
    }

    impl Atomic64 {
        pub const fn new(v: u64) -> Self {
            Self(UnsafeCell::new(v))
        }

        fn shard(&self) -> &Mutex<()> {
            let addr = self as *const Self as usize;
            &LOCKS[(addr >> 3) % SHARDS]
        }

        pub fn load(&self, _order: Ordering) -> u64 {
            let _g = self.shard().lock();
            unsafe { *self.0.get() }
        }

        pub fn store(&self, v: u64, _order: Ordering) {
            let _g = self.shard().lock();
            unsafe { *self.0.get() = v };
        }

        pub fn fetch_add(&self, v: u64, _order: Ordering) -> u64 {
            let _g = self.shard().lock();
            unsafe {
                let old = *self.0.get();
                *self.0.get() = old.wrapping_add(v);
                old
            }
        }

        pub fn compare_exchange(
            &self,
            current: u64,
            new: u64,
            _success: Ordering,
            _failure: Ordering,
        ) -> Result<u64, u64> {
            let _g = self.shard().lock();
            unsafe {
                let old = *self.0.get();
                if old == current {
                    *self.0.get() = new;
                    Ok(old)
                } else {
                    Err(old)
                }
            }
        }
    }
}

pub use atomic64_impl::Atomic64;

struct LifoNode<T> {
    value: T,
    next: Atomic<LifoNode<T>>,
}

/// Epoch-reclaimed, lock-free LIFO. See the module doc for why this
/// replaces the reference's double-word-CAS stack rather than porting the
/// ABA-counter trick directly.
#[derive(Debug)]
pub struct AtomicLifo<T> {
    head: Atomic<LifoNode<T>>,
    len: AtomicUsize,
}

impl<T> Default for AtomicLifo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AtomicLifo<T> {
    pub fn new() -> Self {
        Self {
            head: Atomic::null(),
            len: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, value: T) {
        let guard = epoch::pin();
        let mut node = Owned::new(LifoNode {
            value,
            next: Atomic::null(),
        });
        loop {
            let head = self.head.load(Ordering::Acquire, &guard);
            node.next.store(head, Ordering::Relaxed);
            match self
                .head
                .compare_exchange(head, node, Ordering::AcqRel, Ordering::Acquire, &guard)
            {
                Ok(_) => {
                    self.len.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                Err(e) => node = e.new,
            }
        }
    }

    pub fn pop(&self) -> Option<T> {
        let guard = epoch::pin();
        loop {
            let head = self.head.load(Ordering::Acquire, &guard);
            let head_ref = unsafe { head.as_ref() }?;
            let next = head_ref.next.load(Ordering::Acquire, &guard);
            if self
                .head
                .compare_exchange(head, next, Ordering::AcqRel, Ordering::Acquire, &guard)
                .is_ok()
            {
                self.len.fetch_sub(1, Ordering::Relaxed);
                // SAFETY: this thread won the CAS unlinking `head`; no other
                // thread can observe it as reachable from `self.head` again,
                // and the epoch guard defers the actual free until every
                // thread that may still hold a reference has moved on.
                unsafe {
                    let value = std::ptr::read(&head_ref.value);
                    guard.defer_destroy(head);
                    return Some(value);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Drop for AtomicLifo<T> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}

// SAFETY: `AtomicLifo<T>` transfers ownership of `T` between threads
// through the lock-free stack exactly like `std::sync::Mutex<Vec<T>>` would.
unsafe impl<T: Send> Send for AtomicLifo<T> {}
unsafe impl<T: Send> Sync for AtomicLifo<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn atomic64_roundtrips() {
        let a = Atomic64::new(41);
        assert_eq!(a.load(Ordering::SeqCst), 41);
        a.store(100, Ordering::SeqCst);
        assert_eq!(a.fetch_add(1, Ordering::SeqCst), 100);
        assert_eq!(a.load(Ordering::SeqCst), 101);
        assert_eq!(a.compare_exchange(101, 7, Ordering::SeqCst, Ordering::SeqCst), Ok(101));
        assert_eq!(a.compare_exchange(101, 9, Ordering::SeqCst, Ordering::SeqCst), Err(7));
    }

    #[test]
    fn lifo_is_last_in_first_out() {
        let lifo = AtomicLifo::new();
        lifo.push(1);
        lifo.push(2);
        lifo.push(3);
        assert_eq!(lifo.len(), 3);
        assert_eq!(lifo.pop(), Some(3));
        assert_eq!(lifo.pop(), Some(2));
        assert_eq!(lifo.pop(), Some(1));
        assert_eq!(lifo.pop(), None);
        assert!(lifo.is_empty());
    }

    #[test]
    fn lifo_survives_concurrent_push_pop() {
        let lifo = Arc::new(AtomicLifo::new());
        let mut handles = Vec::new();
        for t in 0..8 {
            let lifo = Arc::clone(&lifo);
            handles.push(thread::spawn(move || {
                for i in 0..1000 {
                    lifo.push(t * 1000 + i);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(lifo.len(), 8000);
        let mut popped = Vec::new();
        while let Some(v) = lifo.pop() {
            popped.push(v);
        }
        popped.sort_unstable();
        let expected: Vec<i32> = (0..8000).collect();
        assert_eq!(popped, expected);
    }
}
