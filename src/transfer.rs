//! The privacy façade: orchestrates range and validity proofs into a single
//! `TransferProof` for a confidential transfer (spec.md §4.J).
//!
//! A transfer moves `amount` from a sender whose balance commitment goes
//! from `C_before` to `C_after`. This module composes [`RangeProof`] (run
//! twice, once each for `amount` and `sender_after`) with [`ValidityProof`]
//! (which checks the three commitments balance) into one proof object, and
//! exposes batch entry points that fan out over independent transfers with
//! no shared mutable state (spec.md §5).

use alloc::vec::Vec;

use curve25519_dalek::ristretto::CompressedRistretto;
use curve25519_dalek::scalar::Scalar;

use crate::errors::ProofError;
use crate::generators::{BulletproofGens, PedersenGens};
use crate::range_proof::RangeProof;
use crate::transcript::Transcript;
use crate::validity_proof::{RecipientValidity, ValidityProof};

/// The openings a prover needs for one confidential transfer (spec.md §4.J
/// step 1-2).
#[derive(Clone, Copy, Debug)]
pub struct TransferRequest {
    /// Sender's balance before the transfer.
    pub sender_before: u64,
    /// The amount moved.
    pub amount: u64,
    /// Sender's balance after the transfer (must equal `sender_before - amount`).
    pub sender_after: u64,
    /// Blinding factor for `C_before`.
    pub r_before: Scalar,
    /// Blinding factor for `C_amount`.
    pub r_amount: Scalar,
    /// Blinding factor for `C_after`.
    pub r_after: Scalar,
    /// Bitsize both range proofs are generated for (spec.md §3: one of
    /// `{2,4,8,16,32,64}`).
    pub n: usize,
}

/// Additional openings needed to also prove the recipient-side balance
/// equation (spec.md §4.H: "if recipient balances are available").
#[derive(Clone, Copy, Debug)]
pub struct RecipientRequest {
    pub recipient_old: CompressedRistretto,
    pub recipient_new: CompressedRistretto,
    pub recipient_value: Scalar,
    pub r_recipient_old: Scalar,
    pub r_recipient_new: Scalar,
}

/// A composite proof for one confidential transfer (spec.md §3
/// `TransferProof`): three commitments plus the range and validity proofs
/// that bind them.
#[derive(Clone, Debug)]
pub struct TransferProof {
    c_before: CompressedRistretto,
    c_amount: CompressedRistretto,
    c_after: CompressedRistretto,
    amount_range: RangeProof,
    after_range: RangeProof,
    validity: ValidityProof,
}

impl TransferProof {
    pub fn c_before(&self) -> &CompressedRistretto {
        &self.c_before
    }

    pub fn c_amount(&self) -> &CompressedRistretto {
        &self.c_amount
    }

    pub fn c_after(&self) -> &CompressedRistretto {
        &self.c_after
    }

    pub fn amount_range(&self) -> &RangeProof {
        &self.amount_range
    }

    pub fn after_range(&self) -> &RangeProof {
        &self.after_range
    }

    pub fn validity(&self) -> &ValidityProof {
        &self.validity
    }

    /// Build the full `TransferProof` for one transfer (spec.md §4.J
    /// steps 1-5).
    ///
    /// Step 1's balance check runs before any commitment or proof is
    /// generated: `sender_before < amount` or
    /// `sender_before - amount != sender_after` both reject with
    /// [`ProofError::BalanceMismatch`]. Out-of-range values are instead
    /// caught by the underlying range proofs as [`ProofError::OutOfRange`].
    pub fn prove_with_rng<T: rand_core::RngCore + rand_core::CryptoRng>(
        bp_gens: &BulletproofGens,
        pc_gens: &PedersenGens,
        request: &TransferRequest,
        recipient: Option<(&RecipientRequest, Scalar)>,
        rng: &mut T,
    ) -> Result<TransferProof, ProofError> {
        if request.sender_before < request.amount {
            return Err(ProofError::BalanceMismatch);
        }
        if request.sender_before - request.amount != request.sender_after {
            return Err(ProofError::BalanceMismatch);
        }

        let c_before = pc_gens
            .commit(Scalar::from(request.sender_before), request.r_before)
            .compress();
        let c_amount = pc_gens
            .commit(Scalar::from(request.amount), request.r_amount)
            .compress();
        let c_after = pc_gens
            .commit(Scalar::from(request.sender_after), request.r_after)
            .compress();

        let mut amount_transcript = Transcript::new(b"TransferProof-AmountRange");
        let amount_range = RangeProof::prove_single_with_rng(
            bp_gens,
            pc_gens,
            &mut amount_transcript,
            request.amount,
            &request.r_amount,
            request.n,
            rng,
        )?;

        let mut after_transcript = Transcript::new(b"TransferProof-AfterRange");
        let after_range = RangeProof::prove_single_with_rng(
            bp_gens,
            pc_gens,
            &mut after_transcript,
            request.sender_after,
            &request.r_after,
            request.n,
            rng,
        )?;

        let recipient_validity = recipient.map(|(r, recipient_value)| RecipientValidity {
            recipient_old: r.recipient_old,
            recipient_new: r.recipient_new,
            recipient_value,
            r_recipient_old: r.r_recipient_old,
            r_recipient_new: r.r_recipient_new,
        });

        let mut validity_transcript = Transcript::new(b"TransferProof-Validity");
        let validity = ValidityProof::prove_with_rng(
            pc_gens,
            &mut validity_transcript,
            &c_before,
            &c_amount,
            &c_after,
            Scalar::from(request.sender_before),
            request.r_before,
            request.r_amount,
            request.r_after,
            recipient_validity,
            rng,
        )?;

        Ok(TransferProof {
            c_before,
            c_amount,
            c_after,
            amount_range,
            after_range,
            validity,
        })
    }

    /// Prove using the thread-local RNG.
    #[cfg(feature = "std")]
    pub fn prove(
        bp_gens: &BulletproofGens,
        pc_gens: &PedersenGens,
        request: &TransferRequest,
        recipient: Option<(&RecipientRequest, Scalar)>,
    ) -> Result<TransferProof, ProofError> {
        TransferProof::prove_with_rng(bp_gens, pc_gens, request, recipient, &mut rand::thread_rng())
    }

    /// Verify every sub-proof: both range proofs and the validity proof
    /// must all accept (spec.md §4.J).
    pub fn verify(
        &self,
        bp_gens: &BulletproofGens,
        pc_gens: &PedersenGens,
        recipient_old: Option<&CompressedRistretto>,
        recipient_new: Option<&CompressedRistretto>,
    ) -> Result<(), ProofError> {
        let mut amount_transcript = Transcript::new(b"TransferProof-AmountRange");
        self.amount_range
            .verify_single(bp_gens, pc_gens, &mut amount_transcript)?;

        let mut after_transcript = Transcript::new(b"TransferProof-AfterRange");
        self.after_range
            .verify_single(bp_gens, pc_gens, &mut after_transcript)?;

        if self.amount_range.commitment() != &self.c_amount {
            return Err(ProofError::ProofInvalid);
        }
        if self.after_range.commitment() != &self.c_after {
            return Err(ProofError::ProofInvalid);
        }

        let mut validity_transcript = Transcript::new(b"TransferProof-Validity");
        self.validity.verify(
            pc_gens,
            &mut validity_transcript,
            &self.c_before,
            &self.c_amount,
            &self.c_after,
            recipient_old,
            recipient_new,
        )
    }
}

/// Prove a batch of independent transfers. Each request is handled with no
/// shared mutable state beyond the read-only generator tables, so callers
/// needing parallelism can dispatch these across threads themselves
/// (spec.md §5) — this entry point itself just fans out sequentially.
pub fn prove_batch_with_rng<T: rand_core::RngCore + rand_core::CryptoRng>(
    bp_gens: &BulletproofGens,
    pc_gens: &PedersenGens,
    requests: &[TransferRequest],
    rng: &mut T,
) -> Vec<Result<TransferProof, ProofError>> {
    requests
        .iter()
        .map(|r| TransferProof::prove_with_rng(bp_gens, pc_gens, r, None, rng))
        .collect()
}

/// Verify a batch of independent transfers. Succeeds iff every individual
/// transfer verifies (spec.md §8 "Batch consistency").
pub fn verify_batch(
    bp_gens: &BulletproofGens,
    pc_gens: &PedersenGens,
    proofs: &[TransferProof],
) -> Result<(), ProofError> {
    for proof in proofs {
        proof.verify(bp_gens, pc_gens, None, None)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn request(sender_before: u64, amount: u64, sender_after: u64, n: usize) -> TransferRequest {
        TransferRequest {
            sender_before,
            amount,
            sender_after,
            r_before: Scalar::from(111u64),
            r_amount: Scalar::from(222u64),
            r_after: Scalar::from(333u64),
            n,
        }
    }

    #[test]
    fn transfer_proves_and_verifies() {
        let bp_gens = BulletproofGens::new(64);
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;

        let req = request(100_000_000_000, 10_000_000_000, 90_000_000_000, 64);
        let proof =
            TransferProof::prove_with_rng(&bp_gens, &pc_gens, &req, None, &mut rng).unwrap();

        assert!(proof.verify(&bp_gens, &pc_gens, None, None).is_ok());
    }

    #[test]
    fn forged_sender_after_rejected_at_prove_time() {
        let bp_gens = BulletproofGens::new(64);
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;

        let req = request(100_000_000_000, 10_000_000_000, 89_000_000_000, 64);
        let result = TransferProof::prove_with_rng(&bp_gens, &pc_gens, &req, None, &mut rng);
        assert_eq!(result.unwrap_err(), ProofError::BalanceMismatch);
    }

    #[test]
    fn sender_before_less_than_amount_is_balance_mismatch() {
        let bp_gens = BulletproofGens::new(64);
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;

        let req = request(5, 10, 0, 64);
        let result = TransferProof::prove_with_rng(&bp_gens, &pc_gens, &req, None, &mut rng);
        assert_eq!(result.unwrap_err(), ProofError::BalanceMismatch);
    }

    #[test]
    fn batch_consistency() {
        let bp_gens = BulletproofGens::new(8);
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;

        let requests = [
            request(10, 3, 7, 8),
            request(255, 255, 0, 8),
            request(42, 12, 30, 8),
        ];
        let proofs: Vec<TransferProof> = prove_batch_with_rng(&bp_gens, &pc_gens, &requests, &mut rng)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert!(verify_batch(&bp_gens, &pc_gens, &proofs).is_ok());

        let mut broken = proofs.clone();
        broken[1].c_before = broken[0].c_before;
        assert!(verify_batch(&bp_gens, &pc_gens, &broken).is_err());
    }
}
