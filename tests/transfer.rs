//! Integration tests for the `TransferProof` orchestrator (spec.md §8
//! concrete scenario 4, plus batch consistency).

use confidential_transfer_proofs::transfer::{prove_batch_with_rng, verify_batch, TransferRequest};
use confidential_transfer_proofs::{BulletproofGens, CompactTransferProof, PedersenGens, TransferProof};
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;

#[test]
fn scenario_4_full_transfer_verifies_and_compacts_to_690_bytes() {
    let bp_gens = BulletproofGens::new(64);
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;

    let request = TransferRequest {
        sender_before: 100_000_000_000,
        amount: 10_000_000_000,
        sender_after: 90_000_000_000,
        r_before: Scalar::from(1_111_111u64),
        r_amount: Scalar::from(2_222_222u64),
        r_after: Scalar::from(3_333_333u64),
        n: 64,
    };

    let proof = TransferProof::prove_with_rng(&bp_gens, &pc_gens, &request, None, &mut rng).unwrap();
    assert!(proof.verify(&bp_gens, &pc_gens, None, None).is_ok());

    let compact = CompactTransferProof::from_full(&proof).unwrap();
    assert_eq!(compact.to_bytes().len(), 690);
    assert!(compact.verify_proof_hash(&proof));
}

#[test]
fn batch_of_independent_transfers_all_verify() {
    let bp_gens = BulletproofGens::new(16);
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;

    let requests = [
        TransferRequest {
            sender_before: 1000,
            amount: 400,
            sender_after: 600,
            r_before: Scalar::from(1u64),
            r_amount: Scalar::from(2u64),
            r_after: Scalar::from(3u64),
            n: 16,
        },
        TransferRequest {
            sender_before: 65535,
            amount: 1,
            sender_after: 65534,
            r_before: Scalar::from(4u64),
            r_amount: Scalar::from(5u64),
            r_after: Scalar::from(6u64),
            n: 16,
        },
        TransferRequest {
            sender_before: 0,
            amount: 0,
            sender_after: 0,
            r_before: Scalar::from(7u64),
            r_amount: Scalar::from(8u64),
            r_after: Scalar::from(9u64),
            n: 16,
        },
    ];

    let proofs: Vec<TransferProof> = prove_batch_with_rng(&bp_gens, &pc_gens, &requests, &mut rng)
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert!(verify_batch(&bp_gens, &pc_gens, &proofs).is_ok());
}

#[test]
fn sender_before_underflow_is_rejected_before_any_proof_is_generated() {
    let bp_gens = BulletproofGens::new(16);
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;

    let request = TransferRequest {
        sender_before: 3,
        amount: 10,
        sender_after: 0,
        r_before: Scalar::from(1u64),
        r_amount: Scalar::from(2u64),
        r_after: Scalar::from(3u64),
        n: 16,
    };

    let result = TransferProof::prove_with_rng(&bp_gens, &pc_gens, &request, None, &mut rng);
    assert!(result.is_err());
}
