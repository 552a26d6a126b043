//! Integration tests for the single-value Bulletproof range proof
//! (spec.md §8: universal properties + concrete scenarios 1-3).

use confidential_transfer_proofs::{BulletproofGens, PedersenGens, ProofError, RangeProof, Transcript};
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;

fn prove_and_verify(v: u64, r: Scalar, n: usize) -> Result<(), ProofError> {
    let bp_gens = BulletproofGens::new(n);
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;

    let mut pt = Transcript::new(b"range proof integration test");
    let proof = RangeProof::prove_single_with_rng(&bp_gens, &pc_gens, &mut pt, v, &r, n, &mut rng)?;

    let mut vt = Transcript::new(b"range proof integration test");
    proof.verify_single(&bp_gens, &pc_gens, &mut vt)
}

#[test]
fn every_supported_bitsize_round_trips_at_its_boundary_values() {
    for &n in &[2usize, 4, 8, 16, 32, 64] {
        let max = if n == 64 { u64::MAX } else { (1u64 << n) - 1 };
        assert!(prove_and_verify(0, Scalar::from(1u64), n).is_ok(), "n={n} v=0");
        assert!(prove_and_verify(max, Scalar::from(2u64), n).is_ok(), "n={n} v=max");
    }
}

#[test]
fn scenario_1_n4_v3() {
    let bp_gens = BulletproofGens::new(4);
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;
    let r = Scalar::from(12345u64);

    let mut pt = Transcript::new(b"scenario 1");
    let proof = RangeProof::prove_single_with_rng(&bp_gens, &pc_gens, &mut pt, 3, &r, 4, &mut rng).unwrap();

    let mut vt = Transcript::new(b"scenario 1");
    assert!(proof.verify_single(&bp_gens, &pc_gens, &mut vt).is_ok());

    // Swap the embedded commitment for commit(4, 12345) -- expected false.
    // RangeProof has no public setter for V; rebuild via direct byte
    // surgery on the serialized form to exercise the same scenario.
    let wrong_v = pc_gens.commit(Scalar::from(4u64), r).compress();
    let mut bytes = proof.to_bytes();
    bytes[..32].copy_from_slice(wrong_v.as_bytes());
    let tampered = RangeProof::from_bytes(&bytes).unwrap();

    let mut vt2 = Transcript::new(b"scenario 1");
    assert!(tampered.verify_single(&bp_gens, &pc_gens, &mut vt2).is_err());
}

#[test]
fn scenario_2_n8_v255_then_out_of_range() {
    let r = Scalar::from(77777u64);
    assert!(prove_and_verify(255, r, 8).is_ok());

    let bp_gens = BulletproofGens::new(8);
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;
    let mut pt = Transcript::new(b"scenario 2");
    let result = RangeProof::prove_single_with_rng(&bp_gens, &pc_gens, &mut pt, 256, &r, 8, &mut rng);
    assert_eq!(result.unwrap_err(), ProofError::OutOfRange);
}

#[test]
fn scenario_3_n32_compact_size_is_273() {
    use confidential_transfer_proofs::CompactRangeProof;

    let bp_gens = BulletproofGens::new(32);
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;
    let r = Scalar::from(9_876_543u64);

    let mut pt = Transcript::new(b"scenario 3");
    let proof =
        RangeProof::prove_single_with_rng(&bp_gens, &pc_gens, &mut pt, 1_000_000, &r, 32, &mut rng)
            .unwrap();

    let mut vt = Transcript::new(b"scenario 3");
    assert!(proof.verify_single(&bp_gens, &pc_gens, &mut vt).is_ok());

    let compact = CompactRangeProof::from_full(&proof);
    assert_eq!(compact.to_bytes().len(), 273);
}

#[test]
fn negative_soundness_each_replaced_component_is_rejected() {
    let bp_gens = BulletproofGens::new(8);
    let pc_gens = PedersenGens::default();
    let mut rng = OsRng;
    let v = 100u64;
    let r = Scalar::from(55u64);

    let mut pt = Transcript::new(b"soundness test");
    let proof = RangeProof::prove_single_with_rng(&bp_gens, &pc_gens, &mut pt, v, &r, 8, &mut rng).unwrap();
    let original = proof.to_bytes();

    // Flip one byte in each 32-byte field (V, A, S, T_1, T_2, tau_x, mu, t)
    // and confirm every resulting proof is rejected.
    for field_index in 0..8 {
        let mut bytes = original.clone();
        let offset = field_index * 32;
        bytes[offset] ^= 0xff;
        let tampered = RangeProof::from_bytes(&bytes).unwrap();

        let mut vt = Transcript::new(b"soundness test");
        assert!(
            tampered.verify_single(&bp_gens, &pc_gens, &mut vt).is_err(),
            "field {field_index} should have broken verification"
        );
    }
}

#[test]
fn transcript_determinism_across_independent_instances() {
    let mut t1 = Transcript::new(b"determinism");
    let mut t2 = Transcript::new(b"determinism");
    t1.append_message(b"x", b"hello");
    t2.append_message(b"x", b"hello");
    assert_eq!(t1.challenge_scalar(b"c"), t2.challenge_scalar(b"c"));
}

#[test]
fn encoding_round_trip_for_scalars_and_points() {
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;

    let p = RISTRETTO_BASEPOINT_POINT * Scalar::from(7u64);
    let compressed = p.compress();
    assert_eq!(compressed.decompress().unwrap(), p);

    let s = Scalar::from(123456789u64);
    let bytes = s.to_bytes();
    assert_eq!(Scalar::from_canonical_bytes(bytes).unwrap(), s);
}
