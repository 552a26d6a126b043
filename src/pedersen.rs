//! Pedersen commitments (spec.md §4.B).
//!
//! `PedersenGens::commit` (spec.md §4.D/§4.B) already provides
//! `commit(v, r) = v*G + r*H`. This module adds the homomorphic operations
//! and the opening check spec.md §4.B names, expressed over
//! `RistrettoPoint`/`CompressedRistretto` directly — a commitment has no
//! state of its own beyond the point it already is.

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;

use crate::generators::PedersenGens;

/// `C1 + C2`, homomorphically combining two commitments' values and
/// blindings.
pub fn add(c1: RistrettoPoint, c2: RistrettoPoint) -> RistrettoPoint {
    c1 + c2
}

/// `C1 - C2`.
pub fn sub(c1: RistrettoPoint, c2: RistrettoPoint) -> RistrettoPoint {
    c1 - c2
}

/// Recompute `commit(v, r)` and compare against `commitment` in constant
/// time over the encoded bytes.
pub fn verify(
    pc_gens: &PedersenGens,
    commitment: &CompressedRistretto,
    v: Scalar,
    r: Scalar,
) -> bool {
    let recomputed = pc_gens.commit(v, r).compress();
    crate::field::points_equal_ct(&recomputed, commitment)
}

/// `commit(0, 0)` is the identity element.
pub fn commitment_to_zero_is_identity(pc_gens: &PedersenGens) -> bool {
    pc_gens.commit(Scalar::ZERO, Scalar::ZERO).is_identity()
}
