//! Schnorr-style equality proof: two commitments hide the same value
//! (spec.md §4.G).

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;

use crate::errors::ProofError;
use crate::generators::PedersenGens;
use crate::transcript::{Transcript, TranscriptProtocol};

/// A proof that `C1` and `C2` commit to the same value (spec.md §3
/// `EqualityProof`).
#[derive(Clone, Copy, Debug)]
pub struct EqualityProof {
    R: CompressedRistretto,
    s: Scalar,
}

impl EqualityProof {
    /// Prove `C1 = v*G + r1*H` and `C2 = v*G + r2*H` hide the same `v`,
    /// given the openings. The prover sanity-checks that `(v, r1, r2)`
    /// actually reproduce `C1, C2` (spec.md §4.G) — this only catches
    /// programmer error, since the caller already holds the commitments.
    pub fn prove_with_rng<T: rand_core::RngCore + rand_core::CryptoRng>(
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        c1: &CompressedRistretto,
        c2: &CompressedRistretto,
        v: Scalar,
        r1: Scalar,
        r2: Scalar,
        rng: &mut T,
    ) -> Result<EqualityProof, ProofError> {
        if pc_gens.commit(v, r1).compress() != *c1 || pc_gens.commit(v, r2).compress() != *c2 {
            return Err(ProofError::BalanceMismatch);
        }

        transcript.equality_dom_sep();
        transcript.validate_and_append_point(b"C1", c1)?;
        transcript.validate_and_append_point(b"C2", c2)?;

        let k = Scalar::random(rng);
        let R = (k * pc_gens.b_blinding).compress();
        transcript.validate_and_append_point(b"R", &R)?;

        let c = transcript.challenge_scalar(b"c");
        let s = k + c * (r1 - r2);

        Ok(EqualityProof { R, s })
    }

    /// Prove using the thread-local RNG.
    #[cfg(feature = "std")]
    pub fn prove(
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        c1: &CompressedRistretto,
        c2: &CompressedRistretto,
        v: Scalar,
        r1: Scalar,
        r2: Scalar,
    ) -> Result<EqualityProof, ProofError> {
        EqualityProof::prove_with_rng(
            pc_gens,
            transcript,
            c1,
            c2,
            v,
            r1,
            r2,
            &mut rand::thread_rng(),
        )
    }

    /// Verify `s*H == R + c*(C1 - C2)` after replaying the transcript.
    pub fn verify(
        &self,
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        c1: &CompressedRistretto,
        c2: &CompressedRistretto,
    ) -> Result<(), ProofError> {
        transcript.equality_dom_sep();
        transcript.validate_and_append_point(b"C1", c1)?;
        transcript.validate_and_append_point(b"C2", c2)?;
        transcript.validate_and_append_point(b"R", &self.R)?;
        let c = transcript.challenge_scalar(b"c");

        let c1_point = c1.decompress().ok_or(ProofError::InvalidEncoding)?;
        let c2_point = c2.decompress().ok_or(ProofError::InvalidEncoding)?;
        let r_point = self.R.decompress().ok_or(ProofError::InvalidEncoding)?;

        let lhs = self.s * pc_gens.b_blinding;
        let rhs = r_point + c * (c1_point - c2_point);

        if lhs == rhs {
            Ok(())
        } else {
            #[cfg(feature = "detailed-errors")]
            {
                Err(ProofError::VerificationFailed {
                    stage: crate::errors::VerificationStage::EqualityIdentity,
                })
            }
            #[cfg(not(feature = "detailed-errors"))]
            {
                Err(ProofError::ProofInvalid)
            }
        }
    }

    /// Construct directly from a commitment pair's point difference, for
    /// callers (spec.md §4.H) that already computed `C2` as a sum of other
    /// commitments rather than holding it as a standalone value.
    pub fn prove_for_points_with_rng<T: rand_core::RngCore + rand_core::CryptoRng>(
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        c1_point: RistrettoPoint,
        c2_point: RistrettoPoint,
        v: Scalar,
        r1: Scalar,
        r2: Scalar,
        rng: &mut T,
    ) -> Result<EqualityProof, ProofError> {
        EqualityProof::prove_with_rng(
            pc_gens,
            transcript,
            &c1_point.compress(),
            &c2_point.compress(),
            v,
            r1,
            r2,
            rng,
        )
    }

    pub fn r(&self) -> &CompressedRistretto {
        &self.R
    }

    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// Serialize as `R || s` (64 bytes).
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(self.R.as_bytes());
        out[32..].copy_from_slice(self.s.as_bytes());
        out
    }

    /// Deserialize from the layout in [`EqualityProof::to_bytes`].
    pub fn from_bytes(bytes: &[u8; 64]) -> Result<EqualityProof, ProofError> {
        let mut r_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&bytes[..32]);
        let mut s_bytes = [0u8; 32];
        s_bytes.copy_from_slice(&bytes[32..]);
        let s = Option::from(Scalar::from_canonical_bytes(s_bytes))
            .ok_or(ProofError::InvalidEncoding)?;
        Ok(EqualityProof {
            R: CompressedRistretto(r_bytes),
            s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn accepts_matching_openings_rejects_swapped_commitments() {
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;
        let v = Scalar::from(42u64);
        let r1 = Scalar::from(12345u64);
        let r2 = Scalar::from(67890u64);
        let c1 = pc_gens.commit(v, r1).compress();
        let c2 = pc_gens.commit(v, r2).compress();

        let mut pt = Transcript::new(b"equality test");
        let proof =
            EqualityProof::prove_with_rng(&pc_gens, &mut pt, &c1, &c2, v, r1, r2, &mut rng)
                .unwrap();

        let mut vt = Transcript::new(b"equality test");
        assert!(proof.verify(&pc_gens, &mut vt, &c1, &c2).is_ok());

        let mut vt_swapped = Transcript::new(b"equality test");
        assert!(proof.verify(&pc_gens, &mut vt_swapped, &c2, &c1).is_err());
    }

    #[test]
    fn mismatched_openings_are_rejected_at_prove_time() {
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;
        let v = Scalar::from(1u64);
        let r1 = Scalar::from(2u64);
        let r2 = Scalar::from(3u64);
        let c1 = pc_gens.commit(v, r1).compress();
        let wrong_c2 = pc_gens.commit(v + Scalar::ONE, r2).compress();

        let mut pt = Transcript::new(b"mismatch test");
        let result =
            EqualityProof::prove_with_rng(&pc_gens, &mut pt, &c1, &wrong_c2, v, r1, r2, &mut rng);
        assert_eq!(result.unwrap_err(), ProofError::BalanceMismatch);
    }
}
