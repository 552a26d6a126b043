//! Validity proof: a transfer's three commitments balance
//! (spec.md §4.H).

use curve25519_dalek::ristretto::CompressedRistretto;
use curve25519_dalek::scalar::Scalar;

use crate::equality_proof::EqualityProof;
use crate::errors::ProofError;
use crate::generators::PedersenGens;
use crate::pedersen;
use crate::transcript::Transcript;

/// `{sender_equality, optional recipient_equality}` (spec.md §3
/// `ValidityProof`).
#[derive(Clone, Copy, Debug)]
pub struct ValidityProof {
    sender_equality: EqualityProof,
    recipient_equality: Option<EqualityProof>,
}

impl ValidityProof {
    /// Prove `C_before = C_amount + C_after` (value-level), and optionally
    /// that `C_recipient_new = C_recipient_old + C_amount` (spec.md §4.H).
    #[allow(clippy::too_many_arguments)]
    pub fn prove_with_rng<T: rand_core::RngCore + rand_core::CryptoRng>(
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        c_before: &CompressedRistretto,
        c_amount: &CompressedRistretto,
        c_after: &CompressedRistretto,
        sender_before: Scalar,
        r_before: Scalar,
        r_amount: Scalar,
        r_after: Scalar,
        recipient: Option<RecipientValidity>,
        rng: &mut T,
    ) -> Result<ValidityProof, ProofError> {
        let amount_plus_after_point = c_amount
            .decompress()
            .ok_or(ProofError::InvalidEncoding)?
            + c_after.decompress().ok_or(ProofError::InvalidEncoding)?;

        let sender_equality = EqualityProof::prove_for_points_with_rng(
            pc_gens,
            transcript,
            c_before.decompress().ok_or(ProofError::InvalidEncoding)?,
            amount_plus_after_point,
            sender_before,
            r_before,
            r_amount + r_after,
            rng,
        )?;

        let recipient_equality = match recipient {
            Some(r) => {
                let old_plus_amount = r
                    .recipient_old
                    .decompress()
                    .ok_or(ProofError::InvalidEncoding)?
                    + c_amount.decompress().ok_or(ProofError::InvalidEncoding)?;
                Some(EqualityProof::prove_for_points_with_rng(
                    pc_gens,
                    transcript,
                    r.recipient_new
                        .decompress()
                        .ok_or(ProofError::InvalidEncoding)?,
                    old_plus_amount,
                    r.recipient_value,
                    r.r_recipient_new,
                    r.r_recipient_old + r_amount,
                    rng,
                )?)
            }
            None => None,
        };

        Ok(ValidityProof {
            sender_equality,
            recipient_equality,
        })
    }

    /// Prove using the thread-local RNG.
    #[cfg(feature = "std")]
    #[allow(clippy::too_many_arguments)]
    pub fn prove(
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        c_before: &CompressedRistretto,
        c_amount: &CompressedRistretto,
        c_after: &CompressedRistretto,
        sender_before: Scalar,
        r_before: Scalar,
        r_amount: Scalar,
        r_after: Scalar,
        recipient: Option<RecipientValidity>,
    ) -> Result<ValidityProof, ProofError> {
        ValidityProof::prove_with_rng(
            pc_gens,
            transcript,
            c_before,
            c_amount,
            c_after,
            sender_before,
            r_before,
            r_amount,
            r_after,
            recipient,
            &mut rand::thread_rng(),
        )
    }

    /// Verify both equality proofs (the recipient one only if present).
    pub fn verify(
        &self,
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        c_before: &CompressedRistretto,
        c_amount: &CompressedRistretto,
        c_after: &CompressedRistretto,
        recipient_old: Option<&CompressedRistretto>,
        recipient_new: Option<&CompressedRistretto>,
    ) -> Result<(), ProofError> {
        let amount_plus_after = pedersen::add(
            c_amount.decompress().ok_or(ProofError::InvalidEncoding)?,
            c_after.decompress().ok_or(ProofError::InvalidEncoding)?,
        )
        .compress();

        self.sender_equality
            .verify(pc_gens, transcript, c_before, &amount_plus_after)?;

        match (self.recipient_equality, recipient_old, recipient_new) {
            (Some(eq), Some(old), Some(new)) => {
                let old_plus_amount = pedersen::add(
                    old.decompress().ok_or(ProofError::InvalidEncoding)?,
                    c_amount.decompress().ok_or(ProofError::InvalidEncoding)?,
                )
                .compress();
                eq.verify(pc_gens, transcript, new, &old_plus_amount)
            }
            (None, None, None) => Ok(()),
            _ => Err(ProofError::LengthMismatch),
        }
    }

    pub fn sender_equality(&self) -> &EqualityProof {
        &self.sender_equality
    }

    pub fn recipient_equality(&self) -> Option<&EqualityProof> {
        self.recipient_equality.as_ref()
    }
}

/// The openings needed to additionally prove the recipient-side balance
/// equation (spec.md §4.H: "if recipient balances are available").
#[derive(Clone, Copy, Debug)]
pub struct RecipientValidity {
    pub recipient_old: CompressedRistretto,
    pub recipient_new: CompressedRistretto,
    pub recipient_value: Scalar,
    pub r_recipient_old: Scalar,
    pub r_recipient_new: Scalar,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn sender_only_validity_proof_round_trips() {
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;

        let sender_before = Scalar::from(100u64);
        let amount = Scalar::from(10u64);
        let sender_after = Scalar::from(90u64);
        let r_before = Scalar::from(1u64);
        let r_amount = Scalar::from(2u64);
        let r_after = Scalar::from(3u64);

        let c_before = pc_gens.commit(sender_before, r_before).compress();
        let c_amount = pc_gens.commit(amount, r_amount).compress();
        let c_after = pc_gens.commit(sender_after, r_after).compress();

        let mut pt = Transcript::new(b"validity test");
        let proof = ValidityProof::prove_with_rng(
            &pc_gens, &mut pt, &c_before, &c_amount, &c_after, sender_before, r_before,
            r_amount, r_after, None, &mut rng,
        )
        .unwrap();

        let mut vt = Transcript::new(b"validity test");
        assert!(proof
            .verify(&pc_gens, &mut vt, &c_before, &c_amount, &c_after, None, None)
            .is_ok());
    }

    #[test]
    fn forged_sender_after_fails_to_produce_a_valid_proof() {
        let pc_gens = PedersenGens::default();
        let mut rng = OsRng;

        let sender_before = Scalar::from(100u64);
        let amount = Scalar::from(10u64);
        let true_sender_after = Scalar::from(90u64);
        let forged_sender_after = Scalar::from(89u64);
        let r_before = Scalar::from(1u64);
        let r_amount = Scalar::from(2u64);
        let r_after = Scalar::from(3u64);

        let c_before = pc_gens.commit(sender_before, r_before).compress();
        let c_amount = pc_gens.commit(amount, r_amount).compress();
        let c_after = pc_gens.commit(true_sender_after, r_after).compress();

        let mut pt = Transcript::new(b"forged test");
        let proof = ValidityProof::prove_with_rng(
            &pc_gens,
            &mut pt,
            &c_before,
            &c_amount,
            &c_after,
            forged_sender_after,
            r_before,
            r_amount,
            r_after,
            None,
            &mut rng,
        );
        assert_eq!(proof.unwrap_err(), ProofError::BalanceMismatch);
    }
}
