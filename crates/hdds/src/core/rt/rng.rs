// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mersenne-Twister-19937 PRNG and name generation (§2.1, §4.10).
//!
//! [`Mt19937`] is a direct port of Matsumoto & Nishimura's reference
//! generator: a 624-word twist state (`N`), period-397 recurrence (`M`), and
//! the standard tempering transform. It is seedable either from a single
//! `u32` or from an 8-word key array, matching the two constructors the
//! original exposes (`ddsrt_prng_init_simple` / `ddsrt_prng_init`).
//!
//! [`PrngInstance`] is the process-global, mutex-guarded instance described
//! in §4.10: lazily seeded from OS entropy on first use, falling back to a
//! mix of wall-clock time, process ID, and a monotonic counter when entropy
//! is unavailable. Tests that need bit-for-bit reproducibility should
//! construct their own [`Mt19937`] rather than reach for the global.
//!
//! [`Mt19937::random_name`] reassembles the syllable-table name generator:
//! a capitalized pregram, two bigrams, and a trigram drawn from one 32-bit
//! draw (6+7+7+10 = 30 bits of entropy), used to synthesize topic and
//! participant identifiers in tests.

use std::process;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// A Mersenne-Twister-19937 generator with its own, independently seeded
/// state. Use this directly whenever a test or algorithm needs a
/// reproducible sequence; [`PrngInstance`] wraps one of these for the
/// shared, process-global case.
#[derive(Clone)]
pub struct Mt19937 {
    mt: [u32; N],
    mti: usize,
}

impl Mt19937 {
    /// Seed from a single 32-bit value (`ddsrt_prng_init_simple`).
    pub fn from_seed(seed: u32) -> Self {
        let mut mt = [0u32; N];
        mt[0] = seed;
        for i in 1..N {
            mt[i] = (1_812_433_253u32
                .wrapping_mul(mt[i - 1] ^ (mt[i - 1] >> 30)))
            .wrapping_add(i as u32);
        }
        Self { mt, mti: N }
    }

    /// Seed from an 8-word key array (`ddsrt_prng_init`), which mixes more
    /// entropy into the initial state than a bare `u32` seed can.
    pub fn from_key(key: &[u32; 8]) -> Self {
        let mut prng = Self::from_seed(19_650_218);
        let mut i = 1usize;
        let mut j = 0usize;
        let key_length = key.len();
        let mut k = N.max(key_length);
        while k > 0 {
            prng.mt[i] = (prng.mt[i]
                ^ ((prng.mt[i - 1] ^ (prng.mt[i - 1] >> 30)).wrapping_mul(1_664_525)))
            .wrapping_add(key[j])
            .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                prng.mt[0] = prng.mt[N - 1];
                i = 1;
            }
            if j >= key_length {
                j = 0;
            }
            k -= 1;
        }
        k = N - 1;
        while k > 0 {
            prng.mt[i] = (prng.mt[i]
                ^ ((prng.mt[i - 1] ^ (prng.mt[i - 1] >> 30)).wrapping_mul(1_566_083_941)))
            .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                prng.mt[0] = prng.mt[N - 1];
                i = 1;
            }
            k -= 1;
        }
        prng.mt[0] = 0x8000_0000;
        prng
    }

    /// Next value on `[0, 0xffffffff]`.
    pub fn next_u32(&mut self) -> u32 {
        const MAG01: [u32; 2] = [0x0, MATRIX_A];

        if self.mti >= N {
            for kk in 0..N - M {
                let y = (self.mt[kk] & UPPER_MASK) | (self.mt[kk + 1] & LOWER_MASK);
                self.mt[kk] = self.mt[kk + M] ^ (y >> 1) ^ MAG01[(y & 1) as usize];
            }
            for kk in N - M..N - 1 {
                let y = (self.mt[kk] & UPPER_MASK) | (self.mt[kk + 1] & LOWER_MASK);
                self.mt[kk] = self.mt[kk + M - N] ^ (y >> 1) ^ MAG01[(y & 1) as usize];
            }
            let y = (self.mt[N - 1] & UPPER_MASK) | (self.mt[0] & LOWER_MASK);
            self.mt[N - 1] = self.mt[M - 1] ^ (y >> 1) ^ MAG01[(y & 1) as usize];
            self.mti = 0;
        }

        let mut y = self.mt[self.mti];
        self.mti += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    /// Synthesize a name of the form `Pregram-bigram-bigram-trigram` (e.g.
    /// `"Trewirekez"`), consuming one draw of randomness.
    pub fn random_name(&mut self) -> String {
        let r = self.next_u32();
        let pregram = PREGRAMS[((r & 0xFC00_0000) >> 26) as usize];
        let bigram1 = BIGRAMS[((r & 0x03F8_0000) >> 19) as usize];
        let bigram2 = BIGRAMS[((r & 0x0007_F000) >> 12) as usize];
        let trigram = TRIGRAMS[((r & 0x0000_0FFC) >> 2) as usize];

        let mut name = String::with_capacity(16);
        let mut chars = pregram.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        name.push_str(bigram1);
        name.push_str(bigram2);
        name.push_str(trigram);
        name
    }
}

/// Process-global PRNG instance (§4.10): lazily seeded on first use, guarded
/// by a mutex so concurrent callers serialize rather than race the state.
pub struct PrngInstance {
    inner: Mutex<Option<Mt19937>>,
}

impl Default for PrngInstance {
    fn default() -> Self {
        Self::new()
    }
}

impl PrngInstance {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Draw the next `u32` from the shared generator, seeding it from OS
    /// entropy (falling back to time/pid/counter) on first use.
    pub fn next_u32(&self) -> u32 {
        let mut guard = self.inner.lock();
        let prng = guard.get_or_insert_with(Self::seed_from_environment);
        prng.next_u32()
    }

    pub fn random_name(&self) -> String {
        let mut guard = self.inner.lock();
        let prng = guard.get_or_insert_with(Self::seed_from_environment);
        prng.random_name()
    }

    /// Re-seed the shared instance explicitly, for callers that need a
    /// reproducible process-wide sequence (e.g. test harnesses).
    pub fn reseed(&self, seed: u32) {
        *self.inner.lock() = Some(Mt19937::from_seed(seed));
    }

    fn seed_from_environment() -> Mt19937 {
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        if let Some(key) = os_entropy_key() {
            return Mt19937::from_key(&key);
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
        let key = [
            process::id(),
            (now >> 32) as u32,
            now as u32,
            counter,
            0,
            0,
            0,
            0,
        ];
        Mt19937::from_key(&key)
    }
}

/// Best-effort OS entropy source for the initial seed. Returns `None` when
/// no entropy facility is reachable, triggering the time/pid/counter
/// fallback described in §4.10.
fn os_entropy_key() -> Option<[u32; 8]> {
    #[cfg(unix)]
    {
        use std::fs::File;
        use std::io::Read;
        let mut file = File::open("/dev/urandom").ok()?;
        let mut buf = [0u8; 32];
        file.read_exact(&mut buf).ok()?;
        let mut key = [0u32; 8];
        for (i, chunk) in buf.chunks_exact(4).enumerate() {
            key[i] = u32::from_le_bytes(chunk.try_into().unwrap());
        }
        Some(key)
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// Process-global MT-19937 instance used for identifier generation and
/// timing jitter (§4.10).
pub static GLOBAL: PrngInstance = PrngInstance::new();

include!("rng_tables.rs");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_5489_matches_reference_sequence() {
        let mut prng = Mt19937::from_seed(5489);
        let expected: [u32; 10] = [
            3499211612, 581869302, 3890346734, 3586334585, 545404204, 4161255391, 3922919429,
            949333985, 2715962298, 1323567403,
        ];
        for want in expected {
            assert_eq!(prng.next_u32(), want);
        }
    }

    #[test]
    fn key_seeded_stream_is_deterministic_and_repeatable() {
        let key = [0xDEADBEEFu32, 0, 0, 0, 0, 0, 0, 0];
        let mut a = Mt19937::from_key(&key);
        let mut b = Mt19937::from_key(&key);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn key_seeded_distribution_passes_chi_square_at_p_0_001() {
        let key = [0xDEADBEEFu32, 0, 0, 0, 0, 0, 0, 0];
        let mut prng = Mt19937::from_key(&key);
        let mut buckets = [0u32; 128];
        const SAMPLES: u32 = 10_000;
        for _ in 0..SAMPLES {
            let v = (prng.next_u32() % 128) as usize;
            buckets[v] += 1;
        }
        let expected = SAMPLES as f64 / 128.0;
        let chi_square: f64 = buckets
            .iter()
            .map(|&count| {
                let diff = count as f64 - expected;
                diff * diff / expected
            })
            .sum();
        assert!(
            chi_square <= 181.993,
            "chi-square {chi_square} exceeds upper bound for 127 degrees of freedom at p=0.001"
        );
    }

    #[test]
    fn random_name_is_well_formed() {
        let mut prng = Mt19937::from_seed(1);
        for _ in 0..100 {
            let name = prng.random_name();
            assert!(name.chars().next().unwrap().is_uppercase());
            assert!(name.len() >= 8);
        }
    }

    #[test]
    fn global_instance_is_reseedable_for_tests() {
        GLOBAL.reseed(5489);
        assert_eq!(GLOBAL.next_u32(), 3499211612);
    }
}
