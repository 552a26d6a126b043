//! Optional TTL-bounded range-proof cache (spec.md §4.J, §5).
//!
//! spec.md §4.J: "keyed by `(value, blinding)`, TTL-bounded; a hit returns
//! the previously computed range proof verbatim." This is a convenience the
//! privacy façade may use in front of [`crate::range_proof::RangeProof`]; it
//! is never consulted by `TransferProof::prove`/`verify` directly, so callers
//! opt in explicitly.
//!
//! Cache correctness requires that callers never reuse `(value, blinding)`
//! pairs across distinct commitments they expect to be unlinkable — spec.md
//! §4.J is explicit that this is a user contract, not an invariant the cache
//! enforces. Entry-count bounding (spec.md §5: "implementations should cap it
//! by entry count to bound memory") evicts the oldest entry once `max_entries`
//! is exceeded.
//!
//! Only available under the `std` feature: TTL expiry needs a wall clock,
//! and `SystemTime::now()` is non-deterministic by construction (fine here —
//! this is a non-consensus, caller-opt-in convenience, not part of any
//! proof's transcript).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use curve25519_dalek::scalar::Scalar;

use crate::range_proof::RangeProof;

/// `(value, blinding)`, the cache key named in spec.md §4.J. Blindings are
/// compared by their canonical byte encoding so the key is `Eq + Hash`
/// without leaning on `Scalar`'s own (constant-time-only) equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    value: u64,
    blinding_bytes: [u8; 32],
}

impl CacheKey {
    fn new(value: u64, blinding: &Scalar) -> Self {
        CacheKey {
            value,
            blinding_bytes: *blinding.as_bytes(),
        }
    }
}

struct Entry {
    proof: RangeProof,
    inserted_at: Instant,
    sequence: u64,
}

struct Inner {
    entries: HashMap<CacheKey, Entry>,
    ttl: Duration,
    max_entries: usize,
    next_sequence: u64,
}

/// A TTL- and entry-count-bounded cache of range proofs keyed by
/// `(value, blinding)` (spec.md §4.J).
pub struct ProofCache {
    inner: Mutex<Inner>,
}

impl ProofCache {
    /// Create a cache with the given TTL and maximum entry count. A `max_entries`
    /// of `0` disables the cache (every lookup misses, every insert is a no-op).
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        ProofCache {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                ttl,
                max_entries,
                next_sequence: 0,
            }),
        }
    }

    /// Look up a previously cached proof for `(value, blinding)`. Returns
    /// `None` on a miss or on an expired entry (expired entries are evicted
    /// lazily, on the next access that would have returned them).
    pub fn get(&self, value: u64, blinding: &Scalar) -> Option<RangeProof> {
        let key = CacheKey::new(value, blinding);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let ttl = inner.ttl;
        match inner.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() <= ttl => Some(entry.proof.clone()),
            Some(_) => {
                inner.entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Insert a freshly computed proof for `(value, blinding)`. If the cache
    /// is at `max_entries`, the oldest entry (by insertion order) is evicted
    /// first (spec.md §5: "implementations should cap it by entry count").
    pub fn insert(&self, value: u64, blinding: &Scalar, proof: RangeProof) {
        let key = CacheKey::new(value, blinding);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.max_entries == 0 {
            return;
        }
        if inner.entries.len() >= inner.max_entries && !inner.entries.contains_key(&key) {
            if let Some(oldest_key) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.sequence)
                .map(|(k, _)| *k)
            {
                inner.entries.remove(&oldest_key);
            }
        }
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.entries.insert(
            key,
            Entry {
                proof,
                inserted_at: Instant::now(),
                sequence,
            },
        );
    }

    /// Number of live (not necessarily unexpired) entries currently held.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }

    /// `true` iff the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry whose TTL has elapsed.
    pub fn evict_expired(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let ttl = inner.ttl;
        inner.entries.retain(|_, entry| entry.inserted_at.elapsed() <= ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{BulletproofGens, PedersenGens};
    use crate::transcript::Transcript;
    use rand::rngs::OsRng;

    fn sample_proof(v: u64, blinding: &Scalar) -> RangeProof {
        let bp_gens = BulletproofGens::new(8);
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;
        let mut t = Transcript::new(b"cache test");
        RangeProof::prove_single_with_rng(&bp_gens, &pc_gens, &mut t, v, blinding, 8, &mut rng)
            .unwrap()
    }

    #[test]
    fn hit_returns_the_cached_proof_verbatim() {
        let cache = ProofCache::new(Duration::from_secs(60), 16);
        let blinding = Scalar::from(42u64);
        let proof = sample_proof(7, &blinding);

        assert!(cache.get(7, &blinding).is_none());
        cache.insert(7, &blinding, proof.clone());

        let hit = cache.get(7, &blinding).expect("cache hit");
        assert_eq!(hit.to_bytes(), proof.to_bytes());
    }

    #[test]
    fn different_key_misses() {
        let cache = ProofCache::new(Duration::from_secs(60), 16);
        let blinding = Scalar::from(42u64);
        cache.insert(7, &blinding, sample_proof(7, &blinding));

        assert!(cache.get(8, &blinding).is_none());
        assert!(cache.get(7, &Scalar::from(43u64)).is_none());
    }

    #[test]
    fn expired_entry_is_evicted_on_access() {
        let cache = ProofCache::new(Duration::from_millis(0), 16);
        let blinding = Scalar::from(1u64);
        cache.insert(1, &blinding, sample_proof(1, &blinding));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(1, &blinding).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn entry_count_is_bounded_by_eviction() {
        let cache = ProofCache::new(Duration::from_secs(60), 2);
        let b0 = Scalar::from(100u64);
        let b1 = Scalar::from(101u64);
        let b2 = Scalar::from(102u64);
        cache.insert(1, &b0, sample_proof(1, &b0));
        cache.insert(2, &b1, sample_proof(2, &b1));
        cache.insert(3, &b2, sample_proof(3, &b2));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(1, &b0).is_none());
        assert!(cache.get(2, &b1).is_some());
        assert!(cache.get(3, &b2).is_some());
    }

    #[test]
    fn zero_capacity_cache_never_stores() {
        let cache = ProofCache::new(Duration::from_secs(60), 0);
        let blinding = Scalar::from(5u64);
        cache.insert(5, &blinding, sample_proof(5, &blinding));
        assert!(cache.is_empty());
        assert!(cache.get(5, &blinding).is_none());
    }
}
