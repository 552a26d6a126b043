//! The Bulletproof range proof (spec.md §4.F).
//!
//! Proves `0 <= v < 2^n` for a committed value `v` given `V = v*G + gamma*H`.
//! This crate only implements the single-value case (spec.md Non-goals:
//! aggregated multi-value range proofs with `m > 1` are out of scope) — the
//! teacher's multi-party `dealer`/`party` aggregation protocol has no
//! counterpart in this spec and is not carried forward (see DESIGN.md).

#![allow(non_snake_case)]

use alloc::vec::Vec;

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;

use crate::errors::ProofError;
use crate::generators::{BulletproofGens, PedersenGens};
use crate::inner_product_proof::InnerProductProof;
use crate::transcript::{Transcript, TranscriptProtocol};
use crate::util::{self, Poly2, VecPoly1};

/// The bitsizes this system supports (spec.md §3: `n` is a power of two in
/// this closed set).
const SUPPORTED_BITSIZES: [usize; 6] = [2, 4, 8, 16, 32, 64];

/// The range-proof prover's transcript-driven state machine (spec.md §4.J):
/// `INIT -> BITS -> AS -> YZ -> T12 -> X -> SCALARS -> IPP -> DONE`, with a
/// transition only at the corresponding transcript append. Checked with
/// `debug_assert_eq!` only — an out-of-order transition is a prover bug,
/// not a condition callers can trigger, so it never surfaces as a `Result`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(not(debug_assertions), allow(dead_code))]
enum ProverState {
    Init,
    Bits,
    As,
    Yz,
    T12,
    X,
    Scalars,
    Ipp,
    Done,
}

fn check_bitsize(n: usize) -> Result<(), ProofError> {
    if SUPPORTED_BITSIZES.contains(&n) {
        Ok(())
    } else {
        Err(ProofError::LengthMismatch)
    }
}

/// A proof that a committed value lies in `[0, 2^n)` (spec.md §3 `RangeProof`).
#[derive(Clone, Debug)]
pub struct RangeProof {
    /// The value commitment `V = v*G + gamma*H`.
    V: CompressedRistretto,
    /// Commitment to the bits of the value.
    A: CompressedRistretto,
    /// Commitment to the blinding factors.
    S: CompressedRistretto,
    /// Commitment to the `t_1` coefficient of `t(X)`.
    T_1: CompressedRistretto,
    /// Commitment to the `t_2` coefficient of `t(X)`.
    T_2: CompressedRistretto,
    /// Synthetic blinding factor for the commitment to `t(x)`.
    tau_x: Scalar,
    /// Blinding factor for the synthetic commitment to the inner-product
    /// arguments.
    mu: Scalar,
    /// Evaluation of `t(X)` at the challenge point `x`.
    t: Scalar,
    /// The inner-product argument over the folded `l(x)`, `r(x)` vectors.
    ipp: InnerProductProof,
    /// The bitsize this proof was created for.
    n: usize,
}

impl RangeProof {
    /// Bitsize this proof covers.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The value commitment carried in the proof.
    pub fn commitment(&self) -> &CompressedRistretto {
        &self.V
    }

    /// The `A, S, T_1, T_2` commitments and the `tau_x, mu, t` scalars,
    /// exposed for [`crate::compact`]'s envelope construction without
    /// re-parsing [`RangeProof::to_bytes`].
    pub(crate) fn components(
        &self,
    ) -> (
        &CompressedRistretto,
        &CompressedRistretto,
        &CompressedRistretto,
        &CompressedRistretto,
        &Scalar,
        &Scalar,
        &Scalar,
    ) {
        (&self.A, &self.S, &self.T_1, &self.T_2, &self.tau_x, &self.mu, &self.t)
    }

    /// Create a range proof for `v` with blinding `v_blinding`, given an
    /// explicit randomness source (spec.md §4.F prover, steps 1-15).
    #[allow(clippy::too_many_arguments)]
    pub fn prove_single_with_rng<T: rand_core::RngCore + rand_core::CryptoRng>(
        bp_gens: &BulletproofGens,
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        v: u64,
        v_blinding: &Scalar,
        n: usize,
        rng: &mut T,
    ) -> Result<RangeProof, ProofError> {
        check_bitsize(n)?;
        #[cfg(debug_assertions)]
        let mut state = ProverState::Init;

        // Step 1: reject v >= 2^n. v is a u64 so v < 0 cannot occur.
        if n < 64 && v >= (1u64 << n) {
            return Err(ProofError::OutOfRange);
        }

        // Step 2.
        let V = pc_gens.commit(Scalar::from(v), *v_blinding);

        // Step 3: bit-decompose v LSB-first.
        let mut a_L = Vec::with_capacity(n);
        let mut a_R = Vec::with_capacity(n);
        for i in 0..n {
            let bit = (v >> i) & 1;
            a_L.push(Scalar::from(bit));
            a_R.push(Scalar::from(bit) - Scalar::ONE);
        }

        // Step 4.
        let s_L: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
        let s_R: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
        let alpha = Scalar::random(rng);
        let rho = Scalar::random(rng);
        let tau_1 = Scalar::random(rng);
        let tau_2 = Scalar::random(rng);

        // Step 5.
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(state, ProverState::Init);
            state = ProverState::Bits;
        }
        transcript.range_dom_sep(n as u64, 1);
        transcript.append_point(b"V", &V.compress());

        // Step 6.
        let mut gens = bp_gens.clone();
        gens.ensure_capacity(n);
        let G = gens.g(n);
        let H = gens.h(n);

        let A = crate::field::msm(
            core::iter::once(alpha)
                .chain(a_L.iter().copied())
                .chain(a_R.iter().copied()),
            core::iter::once(pc_gens.b_blinding)
                .chain(G.iter().copied())
                .chain(H.iter().copied()),
        )
        .compress();

        let S = crate::field::msm(
            core::iter::once(rho)
                .chain(s_L.iter().copied())
                .chain(s_R.iter().copied()),
            core::iter::once(pc_gens.b_blinding)
                .chain(G.iter().copied())
                .chain(H.iter().copied()),
        )
        .compress();

        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(state, ProverState::Bits);
            state = ProverState::As;
        }
        transcript.validate_and_append_point(b"A", &A)?;
        transcript.validate_and_append_point(b"S", &S)?;

        // Step 7.
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(state, ProverState::As);
            state = ProverState::Yz;
        }
        let y = transcript.challenge_scalar(b"y");
        let z = transcript.challenge_scalar(b"z");

        let y_powers: Vec<Scalar> = util::exp_iter(y).take(n).collect();
        let two_powers: Vec<Scalar> = util::exp_iter(Scalar::from(2u64)).take(n).collect();
        let z2 = z * z;

        // Step 8: l(X) = a_L - z*1 + s_L*X ; r(X) = y^n o (a_R + z*1 + s_R*X) + z^2*2^n.
        let l_poly = VecPoly1(
            a_L.iter().map(|a_L_i| *a_L_i - z).collect(),
            s_L.clone(),
        );
        let r_poly = VecPoly1(
            (0..n)
                .map(|i| y_powers[i] * (a_R[i] + z) + z2 * two_powers[i])
                .collect(),
            (0..n).map(|i| y_powers[i] * s_R[i]).collect(),
        );

        let Poly2(t0, t1, t2) = l_poly.inner_product(&r_poly);
        let _ = t0; // t0 is re-derived by the verifier; not transmitted.

        // Step 9.
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(state, ProverState::Yz);
            state = ProverState::T12;
        }
        let T_1 = pc_gens.commit(t1, tau_1).compress();
        let T_2 = pc_gens.commit(t2, tau_2).compress();
        transcript.validate_and_append_point(b"T_1", &T_1)?;
        transcript.validate_and_append_point(b"T_2", &T_2)?;

        // Step 10.
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(state, ProverState::T12);
            state = ProverState::X;
        }
        let x = transcript.challenge_scalar(b"x");

        // Step 11.
        let l_vec = l_poly.eval(x);
        let r_vec = r_poly.eval(x);
        let t = util::inner_product(&l_vec, &r_vec);

        // Step 12.
        let tau_x = tau_2 * x * x + tau_1 * x + z2 * v_blinding;
        let mu = alpha + rho * x;

        // Step 13: draw c to keep prover/verifier transcripts in lock-step;
        // the prover itself never uses c.
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(state, ProverState::X);
            state = ProverState::Scalars;
        }
        transcript.append_scalar(b"t_x", &t);
        transcript.append_scalar(b"t_x_blinding", &tau_x);
        transcript.append_scalar(b"e_blinding", &mu);
        let _c = transcript.challenge_scalar(b"c");

        // Step 14: inner-product argument over l(x), r(x) with h_factors = y^{-i}.
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(state, ProverState::Scalars);
            state = ProverState::Ipp;
        }
        let y_inv = y.invert();
        let h_factors: Vec<Scalar> = util::exp_iter(y_inv).take(n).collect();
        let g_factors: Vec<Scalar> = core::iter::repeat(Scalar::ONE).take(n).collect();

        let ipp = InnerProductProof::create_with_factors(
            transcript,
            &RistrettoPoint::identity(),
            &g_factors,
            &h_factors,
            G,
            H,
            l_vec,
            r_vec,
        )?;

        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(state, ProverState::Ipp);
            state = ProverState::Done;
            let _ = state;
        }

        Ok(RangeProof {
            V: V.compress(),
            A,
            S,
            T_1,
            T_2,
            tau_x,
            mu,
            t,
            ipp,
            n,
        })
    }

    /// Create a range proof using the thread-local RNG.
    #[cfg(feature = "std")]
    pub fn prove_single(
        bp_gens: &BulletproofGens,
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
        v: u64,
        v_blinding: &Scalar,
        n: usize,
    ) -> Result<RangeProof, ProofError> {
        RangeProof::prove_single_with_rng(
            bp_gens,
            pc_gens,
            transcript,
            v,
            v_blinding,
            n,
            &mut rand::thread_rng(),
        )
    }

    /// Verify this range proof against its own embedded commitment `V`
    /// (spec.md §4.F verifier).
    pub fn verify_single(
        &self,
        bp_gens: &BulletproofGens,
        pc_gens: &PedersenGens,
        transcript: &mut Transcript,
    ) -> Result<(), ProofError> {
        let n = self.n;
        check_bitsize(n)?;

        transcript.range_dom_sep(n as u64, 1);
        transcript.validate_and_append_point(b"V", &self.V)?;
        transcript.validate_and_append_point(b"A", &self.A)?;
        transcript.validate_and_append_point(b"S", &self.S)?;

        let y = transcript.challenge_scalar(b"y");
        let z = transcript.challenge_scalar(b"z");

        transcript.validate_and_append_point(b"T_1", &self.T_1)?;
        transcript.validate_and_append_point(b"T_2", &self.T_2)?;

        let x = transcript.challenge_scalar(b"x");

        transcript.append_scalar(b"t_x", &self.t);
        transcript.append_scalar(b"t_x_blinding", &self.tau_x);
        transcript.append_scalar(b"e_blinding", &self.mu);
        let c = transcript.challenge_scalar(b"c");

        let mut gens = bp_gens.clone();
        gens.ensure_capacity(n);
        let G = gens.g(n);
        let H = gens.h(n);

        let (u_sq, u_inv_sq, s) = self.ipp.verification_scalars(n, transcript)?;
        let a = *self.ipp.a();
        let b = *self.ipp.b();

        let y_powers: Vec<Scalar> = util::exp_iter(y).take(n).collect();
        let two_powers: Vec<Scalar> = util::exp_iter(Scalar::from(2u64)).take(n).collect();
        let y_inv = y.invert();
        let y_inv_powers: Vec<Scalar> = util::exp_iter(y_inv).take(n).collect();

        let sum_y: Scalar = y_powers.iter().fold(Scalar::ZERO, |acc, yi| acc + yi);
        let sum_2: Scalar = two_powers.iter().fold(Scalar::ZERO, |acc, p| acc + p);
        let z2 = z * z;
        let z3 = z2 * z;
        let delta = (z - z2) * sum_y - z3 * sum_2;

        let V = self.V.decompress().ok_or(ProofError::InvalidEncoding)?;
        let A = self.A.decompress().ok_or(ProofError::InvalidEncoding)?;
        let S = self.S.decompress().ok_or(ProofError::InvalidEncoding)?;
        let T_1 = self.T_1.decompress().ok_or(ProofError::InvalidEncoding)?;
        let T_2 = self.T_2.decompress().ok_or(ProofError::InvalidEncoding)?;
        let Ls: Vec<RistrettoPoint> = self
            .ipp
            .l_vec()
            .iter()
            .map(|p| p.decompress().ok_or(ProofError::InvalidEncoding))
            .collect::<Result<_, _>>()?;
        let Rs: Vec<RistrettoPoint> = self
            .ipp
            .r_vec()
            .iter()
            .map(|p| p.decompress().ok_or(ProofError::InvalidEncoding))
            .collect::<Result<_, _>>()?;

        let g_coeffs: Vec<Scalar> = (0..n).map(|i| -z - a * s[i]).collect();
        let h_coeffs: Vec<Scalar> = (0..n)
            .map(|i| z + z2 * two_powers[i] * y_inv_powers[i] - b * s[n - 1 - i] * y_inv_powers[i])
            .collect();

        let scalars = core::iter::once(Scalar::ONE) // A
            .chain(core::iter::once(x)) // S
            .chain(core::iter::once(-c * x)) // T_1
            .chain(core::iter::once(-c * x * x)) // T_2
            .chain(u_sq.iter().copied()) // L_j
            .chain(u_inv_sq.iter().copied()) // R_j
            .chain(core::iter::once(-self.mu + c * self.tau_x)) // H
            .chain(core::iter::once(c * (self.t - delta))) // G
            .chain(g_coeffs.iter().copied()) // G_i
            .chain(h_coeffs.iter().copied()) // H_i
            .chain(core::iter::once(-c * z2)); // V

        let points = core::iter::once(A)
            .chain(core::iter::once(S))
            .chain(core::iter::once(T_1))
            .chain(core::iter::once(T_2))
            .chain(Ls.iter().copied())
            .chain(Rs.iter().copied())
            .chain(core::iter::once(pc_gens.b_blinding))
            .chain(core::iter::once(pc_gens.b))
            .chain(G.iter().copied())
            .chain(H.iter().copied())
            .chain(core::iter::once(V));

        let expect_identity = crate::field::msm(scalars, points);

        use curve25519_dalek::traits::IsIdentity;
        if expect_identity.is_identity() {
            Ok(())
        } else {
            #[cfg(feature = "detailed-errors")]
            {
                Err(ProofError::VerificationFailed {
                    stage: crate::errors::VerificationStage::RangeProofMsm,
                })
            }
            #[cfg(not(feature = "detailed-errors"))]
            {
                Err(ProofError::ProofInvalid)
            }
        }
    }

    /// Serialize the full (non-compact) proof: `V, A, S, T_1, T_2` (5*32),
    /// `tau_x, mu, t` (3*32), `n` (1 byte), then the inner-product proof.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(32 * 8 + 1 + self.ipp.to_bytes().len());
        for p in [&self.V, &self.A, &self.S, &self.T_1, &self.T_2] {
            buf.extend_from_slice(p.as_bytes());
        }
        buf.extend_from_slice(self.tau_x.as_bytes());
        buf.extend_from_slice(self.mu.as_bytes());
        buf.extend_from_slice(self.t.as_bytes());
        buf.push(self.n as u8);
        buf.extend_from_slice(&self.ipp.to_bytes());
        buf
    }

    /// Deserialize from the layout in [`RangeProof::to_bytes`].
    pub fn from_bytes(slice: &[u8]) -> Result<RangeProof, ProofError> {
        if slice.len() < 32 * 8 + 1 {
            return Err(ProofError::InvalidEncoding);
        }
        let read_point = |offset: usize| -> Result<CompressedRistretto, ProofError> {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&slice[offset..offset + 32]);
            Ok(CompressedRistretto(bytes))
        };
        let read_scalar = |offset: usize| -> Result<Scalar, ProofError> {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&slice[offset..offset + 32]);
            Option::from(Scalar::from_canonical_bytes(bytes)).ok_or(ProofError::InvalidEncoding)
        };

        let V = read_point(0)?;
        let A = read_point(32)?;
        let S = read_point(64)?;
        let T_1 = read_point(96)?;
        let T_2 = read_point(128)?;
        let tau_x = read_scalar(160)?;
        let mu = read_scalar(192)?;
        let t = read_scalar(224)?;
        let n = slice[256] as usize;
        check_bitsize(n)?;
        let ipp = InnerProductProof::from_bytes(&slice[257..])?;

        Ok(RangeProof {
            V,
            A,
            S,
            T_1,
            T_2,
            tau_x,
            mu,
            t,
            ipp,
            n,
        })
    }
}
