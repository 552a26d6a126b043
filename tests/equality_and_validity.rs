//! Integration tests for the equality and validity proofs (spec.md §8:
//! universal properties + concrete scenarios 5-6).

use confidential_transfer_proofs::{EqualityProof, PedersenGens, ProofError, Transcript, ValidityProof};
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;

#[test]
fn scenario_6_equality_proof_accepts_and_rejects_swap() {
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;

    let v = Scalar::from(42u64);
    let r1 = Scalar::from(12345u64);
    let r2 = Scalar::from(67890u64);
    let c1 = pc_gens.commit(v, r1).compress();
    let c2 = pc_gens.commit(v, r2).compress();

    let mut pt = Transcript::new(b"equality scenario 6");
    let proof = EqualityProof::prove_with_rng(&pc_gens, &mut pt, &c1, &c2, v, r1, r2, &mut rng).unwrap();

    let mut vt = Transcript::new(b"equality scenario 6");
    assert!(proof.verify(&pc_gens, &mut vt, &c1, &c2).is_ok());

    let mut vt_swapped = Transcript::new(b"equality scenario 6");
    assert!(proof.verify(&pc_gens, &mut vt_swapped, &c2, &c1).is_err());
}

#[test]
fn unrelated_commitment_is_rejected() {
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;

    let v = Scalar::from(7u64);
    let r1 = Scalar::from(1u64);
    let r2 = Scalar::from(2u64);
    let c1 = pc_gens.commit(v, r1).compress();
    let c2 = pc_gens.commit(v, r2).compress();
    let unrelated = pc_gens.commit(Scalar::from(99u64), Scalar::from(3u64)).compress();

    let mut pt = Transcript::new(b"unrelated test");
    let proof = EqualityProof::prove_with_rng(&pc_gens, &mut pt, &c1, &c2, v, r1, r2, &mut rng).unwrap();

    let mut vt = Transcript::new(b"unrelated test");
    assert!(proof.verify(&pc_gens, &mut vt, &c1, &unrelated).is_err());
}

#[test]
fn homomorphic_law_holds_for_commitments() {
    let pc_gens = PedersenGens::default();
    let (v1, r1) = (Scalar::from(7u64), Scalar::from(11u64));
    let (v2, r2) = (Scalar::from(5u64), Scalar::from(13u64));

    let c1 = pc_gens.commit(v1, r1);
    let c2 = pc_gens.commit(v2, r2);
    assert_eq!(c1 + c2, pc_gens.commit(v1 + v2, r1 + r2));
}

#[test]
fn scenario_5_forged_sender_after_rejected_at_prove_time() {
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;

    let sender_before = Scalar::from(100_000_000_000u64);
    let amount = Scalar::from(10_000_000_000u64);
    let true_sender_after = Scalar::from(90_000_000_000u64);
    let forged_sender_after = Scalar::from(89_000_000_000u64);
    let r_before = Scalar::from(1u64);
    let r_amount = Scalar::from(2u64);
    let r_after = Scalar::from(3u64);

    let c_before = pc_gens.commit(sender_before, r_before).compress();
    let c_amount = pc_gens.commit(amount, r_amount).compress();
    let c_after = pc_gens.commit(true_sender_after, r_after).compress();

    let mut pt = Transcript::new(b"validity scenario 5");
    let result = ValidityProof::prove_with_rng(
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
    assert_eq!(result.unwrap_err(), ProofError::BalanceMismatch);
}

#[test]
fn validity_proof_with_recipient_leg_round_trips() {
    use confidential_transfer_proofs::RecipientValidity;

    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;

    let sender_before = Scalar::from(500u64);
    let amount = Scalar::from(120u64);
    let sender_after = Scalar::from(380u64);
    let r_before = Scalar::from(10u64);
    let r_amount = Scalar::from(20u64);
    let r_after = Scalar::from(30u64);

    let recipient_old_v = Scalar::from(40u64);
    let recipient_new_v = Scalar::from(160u64);
    let r_recipient_old = Scalar::from(50u64);
    let r_recipient_new = Scalar::from(60u64);

    let c_before = pc_gens.commit(sender_before, r_before).compress();
    let c_amount = pc_gens.commit(amount, r_amount).compress();
    let c_after = pc_gens.commit(sender_after, r_after).compress();
    let recipient_old = pc_gens.commit(recipient_old_v, r_recipient_old).compress();
    let recipient_new = pc_gens.commit(recipient_new_v, r_recipient_new).compress();

    let recipient = RecipientValidity {
        recipient_old,
        recipient_new,
        recipient_value: recipient_new_v,
        r_recipient_old,
        r_recipient_new,
    };

    let mut pt = Transcript::new(b"validity with recipient");
    let proof = ValidityProof::prove_with_rng(
        &pc_gens,
        &mut pt,
        &c_before,
        &c_amount,
        &c_after,
        sender_before,
        r_before,
        r_amount,
        r_after,
        Some(recipient),
        &mut rng,
    )
    .unwrap();

    let mut vt = Transcript::new(b"validity with recipient");
    assert!(proof
        .verify(
            &pc_gens,
            &mut vt,
            &c_before,
            &c_amount,
            &c_after,
            Some(&recipient_old),
            Some(&recipient_new),
        )
        .is_ok());
}
