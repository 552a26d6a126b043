//! Deterministic generator derivation (spec.md §4.B, §4.D).
//!
//! Two independent concerns share this module: the single fixed Pedersen
//! blinding generator `H` (§4.B), and the two infinite vector-generator
//! streams `{G_i}`/`{H_i}` used by the range proof and inner-product
//! argument (§4.D). Both are process-wide, initialize-once-then-read-only
//! data (spec.md §5) — there is no mutation once a point has been derived.

use alloc::vec::Vec;
use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use digest::{Digest, ExtendableOutput, Update, XofReader};
use sha2::Sha256;
use sha3::Shake256;

/// An infinite iterator of deterministic `RistrettoPoint`s, seeded from
/// `"GeneratorsChain" || label` and squeezed 64 bytes at a time from a
/// SHAKE256 XOF (spec.md §4.D). Each 64-byte block is mapped to a point by
/// reducing it mod the group order and multiplying the basepoint (spec.md
/// §3, §4.A "`Point::from_uniform_bytes`") — NOT
/// `curve25519-dalek`'s `RistrettoPoint::from_uniform_bytes`, which is an
/// Elligator-based hash-to-curve and a different map entirely despite the
/// shared name. Interoperable implementations must reproduce the
/// scalar-reduce-then-multiply map exactly, so this crate's own
/// `field::scalar_from_wide_bytes` is used instead.
struct GeneratorsChain {
    reader: <Shake256 as ExtendableOutput>::Reader,
}

impl GeneratorsChain {
    fn new(label: &[u8]) -> Self {
        let mut shake = Shake256::default();
        shake.update(b"GeneratorsChain");
        shake.update(label);
        GeneratorsChain {
            reader: shake.finalize_xof(),
        }
    }
}

impl Iterator for GeneratorsChain {
    type Item = RistrettoPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let mut uniform_bytes = [0u8; 64];
        self.reader.read(&mut uniform_bytes);
        let s = crate::field::scalar_from_wide_bytes(&uniform_bytes);
        Some(s * RISTRETTO_BASEPOINT_POINT)
    }
}

/// Vector generators for the range proof and inner-product argument.
///
/// Caches the `G_i`/`H_i` streams by index so repeated requests for the same
/// prefix never re-derive a point (spec.md §4.D: "Generators are immutable
/// and cached per index"). The cache only ever grows, bounded in practice by
/// the largest bitsize this system uses (64, per spec.md §5).
#[derive(Clone, Debug)]
pub struct BulletproofGens {
    g_vec: Vec<RistrettoPoint>,
    h_vec: Vec<RistrettoPoint>,
}

impl BulletproofGens {
    /// Create a generator set with at least `n` points cached in each
    /// stream. `n` need not be a power of two; callers that need exactly a
    /// power-of-two prefix slice it themselves.
    pub fn new(n: usize) -> Self {
        let mut gens = BulletproofGens {
            g_vec: Vec::new(),
            h_vec: Vec::new(),
        };
        gens.ensure_capacity(n);
        gens
    }

    /// Grow the cache so that at least `n` generators are available in each
    /// stream. Re-derives the whole prefix from the seed on each growth
    /// call rather than resuming the XOF mid-stream; the result is
    /// identical either way since the stream is a deterministic function
    /// of its seed, but callers relying on this for very large `n` should
    /// note it is `O(n)` work per call, not `O(n - len)`.
    pub fn ensure_capacity(&mut self, n: usize) {
        if self.g_vec.len() < n {
            let mut chain = GeneratorsChain::new(b"G");
            self.g_vec = chain.by_ref().take(n).collect();
        }
        if self.h_vec.len() < n {
            let mut chain = GeneratorsChain::new(b"H");
            self.h_vec = chain.by_ref().take(n).collect();
        }
    }

    /// The first `n` points of the `G` stream.
    pub fn g(&self, n: usize) -> &[RistrettoPoint] {
        &self.g_vec[..n]
    }

    /// The first `n` points of the `H` stream.
    pub fn h(&self, n: usize) -> &[RistrettoPoint] {
        &self.h_vec[..n]
    }
}

impl Default for BulletproofGens {
    fn default() -> Self {
        BulletproofGens::new(64)
    }
}

/// Generators for Pedersen commitments: the Ristretto basepoint `G`, and a
/// fixed independent generator `H`.
///
/// `H` is derived once as `Scalar::from_bytes_mod_order(SHA256(b"pedersen_h_generator")) * G`
/// (spec.md §4.B, §9 — a deliberate hash-to-scalar-then-multiply choice,
/// preserved verbatim for wire compatibility rather than a true hash-to-curve).
#[derive(Copy, Clone, Debug)]
pub struct PedersenGens {
    /// The value-component base `G` (the Ristretto basepoint).
    pub b: RistrettoPoint,
    /// The blinding-component base `H`.
    pub b_blinding: RistrettoPoint,
}

impl PedersenGens {
    /// `commit(v, r) = v*G + r*H`.
    pub fn commit(&self, value: Scalar, blinding: Scalar) -> RistrettoPoint {
        RistrettoPoint::multiscalar_mul_pair(value, self.b, blinding, self.b_blinding)
    }
}

impl Default for PedersenGens {
    fn default() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"pedersen_h_generator");
        let digest: [u8; 32] = hasher.finalize().into();
        let h_scalar = Scalar::from_bytes_mod_order(digest);

        PedersenGens {
            b: RISTRETTO_BASEPOINT_POINT,
            b_blinding: h_scalar * RISTRETTO_BASEPOINT_POINT,
        }
    }
}

/// Small helper trait so `PedersenGens::commit` reads as a single multiscalar
/// multiplication rather than two separate scalar muls plus an add, without
/// pulling in the full variable-length MSM machinery from [`crate::field`]
/// for just two terms.
trait MultiscalarMulPair {
    fn multiscalar_mul_pair(
        a: Scalar,
        p: RistrettoPoint,
        b: Scalar,
        q: RistrettoPoint,
    ) -> RistrettoPoint;
}

impl MultiscalarMulPair for RistrettoPoint {
    fn multiscalar_mul_pair(
        a: Scalar,
        p: RistrettoPoint,
        b: Scalar,
        q: RistrettoPoint,
    ) -> RistrettoPoint {
        a * p + b * q
    }
}
