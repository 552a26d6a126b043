//! The recursive inner-product argument (spec.md §4.E).
//!
//! Proves `<a, b> = c` for committed scalar vectors `a, b` of equal
//! power-of-two length `n = 2^k`, folding the problem in half each round
//! until a single pair of scalars remains. Per-index factor vectors let the
//! range proof fold `y^{-i}` into the `H` side without materializing a
//! second generator vector (spec.md §4.F step 14).

#![allow(non_snake_case)]

use alloc::vec::Vec;
use core::iter;

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;

use crate::errors::ProofError;
use crate::transcript::{Transcript, TranscriptProtocol};
use crate::util;

/// A proof of an inner-product relation, consisting of `log2(n)` pairs of
/// compressed points `(L, R)` and the two final folded scalars `a, b`
/// (spec.md §3 `InnerProductProof`).
#[derive(Clone, Debug)]
pub struct InnerProductProof {
    pub(crate) L_vec: Vec<CompressedRistretto>,
    pub(crate) R_vec: Vec<CompressedRistretto>,
    pub(crate) a: Scalar,
    pub(crate) b: Scalar,
}

impl InnerProductProof {
    /// Create an inner-product proof with all per-index factors fixed to
    /// one — the overload spec.md §9 calls for in place of a nullable
    /// "factors" parameter.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        transcript: &mut Transcript,
        Q: &RistrettoPoint,
        G_vec: &[RistrettoPoint],
        H_vec: &[RistrettoPoint],
        a_vec: Vec<Scalar>,
        b_vec: Vec<Scalar>,
    ) -> Result<InnerProductProof, ProofError> {
        let n = a_vec.len();
        let ones = iter::repeat(Scalar::ONE).take(n).collect::<Vec<_>>();
        Self::create_with_factors(transcript, Q, &ones, &ones, G_vec, H_vec, a_vec, b_vec)
    }

    /// Create an inner-product proof with explicit per-index `g_factors` and
    /// `h_factors` (spec.md §4.E).
    #[allow(clippy::too_many_arguments)]
    pub fn create_with_factors(
        transcript: &mut Transcript,
        Q: &RistrettoPoint,
        g_factors: &[Scalar],
        h_factors: &[Scalar],
        G_vec: &[RistrettoPoint],
        H_vec: &[RistrettoPoint],
        mut a_vec: Vec<Scalar>,
        mut b_vec: Vec<Scalar>,
    ) -> Result<InnerProductProof, ProofError> {
        let mut n = a_vec.len();
        if n != b_vec.len()
            || n != G_vec.len()
            || n != H_vec.len()
            || n != g_factors.len()
            || n != h_factors.len()
        {
            return Err(ProofError::LengthMismatch);
        }
        if !util::is_power_of_two(n) {
            return Err(ProofError::LengthMismatch);
        }

        transcript.ipp_dom_sep(n as u64);

        let mut G = G_vec.to_vec();
        let mut H = H_vec.to_vec();
        let mut g_factors = g_factors.to_vec();
        let mut h_factors = h_factors.to_vec();

        let lg_n = n.next_power_of_two().trailing_zeros() as usize;
        let mut L_vec = Vec::with_capacity(lg_n);
        let mut R_vec = Vec::with_capacity(lg_n);

        let mut a = &mut a_vec[..];
        let mut b = &mut b_vec[..];
        let mut G_mut = &mut G[..];
        let mut H_mut = &mut H[..];
        let mut gf = &mut g_factors[..];
        let mut hf = &mut h_factors[..];

        while n != 1 {
            n /= 2;
            let (a_L, a_R) = a.split_at_mut(n);
            let (b_L, b_R) = b.split_at_mut(n);
            let (G_L, G_R) = G_mut.split_at_mut(n);
            let (H_L, H_R) = H_mut.split_at_mut(n);
            let (gf_L, gf_R) = gf.split_at_mut(n);
            let (hf_L, hf_R) = hf.split_at_mut(n);

            let c_L = util::inner_product(a_L, b_R);
            let c_R = util::inner_product(a_R, b_L);

            let L = crate::field::msm(
                a_L.iter()
                    .zip(gf_R.iter())
                    .map(|(a, f)| a * f)
                    .chain(b_R.iter().zip(hf_L.iter()).map(|(b, f)| b * f))
                    .chain(iter::once(c_L)),
                G_R.iter()
                    .copied()
                    .chain(H_L.iter().copied())
                    .chain(iter::once(*Q)),
            );

            let R = crate::field::msm(
                a_R.iter()
                    .zip(gf_L.iter())
                    .map(|(a, f)| a * f)
                    .chain(b_L.iter().zip(hf_R.iter()).map(|(b, f)| b * f))
                    .chain(iter::once(c_R)),
                G_L.iter()
                    .copied()
                    .chain(H_R.iter().copied())
                    .chain(iter::once(*Q)),
            );

            L_vec.push(L.compress());
            R_vec.push(R.compress());

            transcript.validate_and_append_point(b"L", &L.compress())?;
            transcript.validate_and_append_point(b"R", &R.compress())?;

            let u = transcript.challenge_scalar(b"u");
            let u_inv = u.invert();

            for i in 0..n {
                a_L[i] = a_L[i] * u + a_R[i] * u_inv;
                b_L[i] = b_L[i] * u_inv + b_R[i] * u;
                G_L[i] = crate::field::msm(
                    [u_inv * gf_L[i], u * gf_R[i]],
                    [G_L[i], G_R[i]],
                );
                H_L[i] = crate::field::msm(
                    [u * hf_L[i], u_inv * hf_R[i]],
                    [H_L[i], H_R[i]],
                );
                gf_L[i] = Scalar::ONE;
                hf_L[i] = Scalar::ONE;
            }

            a = a_L;
            b = b_L;
            G_mut = G_L;
            H_mut = H_L;
            gf = gf_L;
            hf = hf_L;
        }

        Ok(InnerProductProof {
            L_vec,
            R_vec,
            a: a[0],
            b: b[0],
        })
    }

    /// Computes the folding challenges `u_j`, their squares/inverse-squares,
    /// and the inductive `s` vector the verifier needs, by replaying the
    /// same append/challenge sequence as the prover (spec.md §4.E).
    ///
    /// Returns `(challenges_sq, challenges_inv_sq, s)`.
    pub fn verification_scalars(
        &self,
        n: usize,
        transcript: &mut Transcript,
    ) -> Result<(Vec<Scalar>, Vec<Scalar>, Vec<Scalar>), ProofError> {
        let lg_n = self.L_vec.len();
        if lg_n >= 32 || n != (1 << lg_n) {
            return Err(ProofError::LengthMismatch);
        }

        transcript.ipp_dom_sep(n as u64);

        let mut challenges = Vec::with_capacity(lg_n);
        for (L, R) in self.L_vec.iter().zip(self.R_vec.iter()) {
            transcript.validate_and_append_point(b"L", L)?;
            transcript.validate_and_append_point(b"R", R)?;
            challenges.push(transcript.challenge_scalar(b"u"));
        }

        let challenges_inv: Vec<Scalar> = challenges.iter().map(|u| u.invert()).collect();
        let all_invert: Scalar = challenges_inv
            .iter()
            .fold(Scalar::ONE, |acc, u_inv| acc * u_inv);

        let challenges_sq: Vec<Scalar> = challenges.iter().map(|u| u * u).collect();
        let challenges_inv_sq: Vec<Scalar> = challenges_inv.iter().map(|u| u * u).collect();

        let mut s = Vec::with_capacity(n);
        s.push(all_invert);
        for i in 1..n {
            let lg_i = (32 - 1 - (i as u32).leading_zeros()) as usize;
            let k = 1 << lg_i;
            let u_lg_i_sq = challenges_sq[(lg_n - 1) - lg_i];
            s.push(s[i - k] * u_lg_i_sq);
        }

        Ok((challenges_sq, challenges_inv_sq, s))
    }

    /// Verify `P == (a*b)*Q + Σ a*s[i]*g_factors[i]*G[i] + Σ b*s[n-1-i]*h_factors[i]*H[i]
    ///          - Σ u_j^2*L_j - Σ u_j^{-2}*R_j` (spec.md §4.E).
    #[allow(clippy::too_many_arguments)]
    pub fn verify(
        &self,
        n: usize,
        transcript: &mut Transcript,
        g_factors: &[Scalar],
        h_factors: &[Scalar],
        P: &RistrettoPoint,
        Q: &RistrettoPoint,
        G: &[RistrettoPoint],
        H: &[RistrettoPoint],
    ) -> Result<(), ProofError> {
        if n != g_factors.len() || n != h_factors.len() || n != G.len() || n != H.len() {
            return Err(ProofError::LengthMismatch);
        }

        let (u_sq, u_inv_sq, s) = self.verification_scalars(n, transcript)?;

        let a = self.a;
        let b = self.b;

        let g_times_a_times_s = G
            .iter()
            .zip(g_factors.iter())
            .zip(s.iter())
            .map(|((_, g_f), s_i)| a * s_i * g_f);

        let h_times_b_div_s = H
            .iter()
            .zip(h_factors.iter())
            .zip(s.iter().rev())
            .map(|((_, h_f), s_i)| b * s_i * h_f);

        let neg_u_sq = u_sq.iter().map(|u| -u);
        let neg_u_inv_sq = u_inv_sq.iter().map(|u| -u);

        let Ls = self
            .L_vec
            .iter()
            .map(|p| p.decompress().ok_or(ProofError::InvalidEncoding))
            .collect::<Result<Vec<_>, _>>()?;
        let Rs = self
            .R_vec
            .iter()
            .map(|p| p.decompress().ok_or(ProofError::InvalidEncoding))
            .collect::<Result<Vec<_>, _>>()?;

        let expect_P = crate::field::msm(
            iter::once(a * b)
                .chain(g_times_a_times_s)
                .chain(h_times_b_div_s)
                .chain(neg_u_sq)
                .chain(neg_u_inv_sq),
            iter::once(*Q)
                .chain(G.iter().copied())
                .chain(H.iter().copied())
                .chain(Ls)
                .chain(Rs),
        );

        if expect_P == *P {
            Ok(())
        } else {
            #[cfg(feature = "detailed-errors")]
            {
                Err(ProofError::VerificationFailed {
                    stage: crate::errors::VerificationStage::InnerProductIdentity,
                })
            }
            #[cfg(not(feature = "detailed-errors"))]
            {
                Err(ProofError::ProofInvalid)
            }
        }
    }

    /// The final folded scalar `a`.
    pub fn a(&self) -> &Scalar {
        &self.a
    }

    /// The final folded scalar `b`.
    pub fn b(&self) -> &Scalar {
        &self.b
    }

    /// `L[0..k), R[0..k)` as compressed points, `k = log2(n)`.
    pub fn l_vec(&self) -> &[CompressedRistretto] {
        &self.L_vec
    }

    /// See [`InnerProductProof::l_vec`].
    pub fn r_vec(&self) -> &[CompressedRistretto] {
        &self.R_vec
    }

    /// Serialize as `2 * k` compressed points (64 bytes each) followed by
    /// the two final scalars (32 bytes each).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity((self.L_vec.len() + self.R_vec.len()) * 32 + 64);
        for (l, r) in self.L_vec.iter().zip(self.R_vec.iter()) {
            buf.extend_from_slice(l.as_bytes());
            buf.extend_from_slice(r.as_bytes());
        }
        buf.extend_from_slice(self.a.as_bytes());
        buf.extend_from_slice(self.b.as_bytes());
        buf
    }

    /// Deserialize from the layout produced by [`InnerProductProof::to_bytes`].
    pub fn from_bytes(slice: &[u8]) -> Result<InnerProductProof, ProofError> {
        let b = slice.len();
        if b % 32 != 0 {
            return Err(ProofError::InvalidEncoding);
        }
        let num_elements = b / 32;
        if num_elements < 2 {
            return Err(ProofError::InvalidEncoding);
        }
        if (num_elements - 2) % 2 != 0 {
            return Err(ProofError::InvalidEncoding);
        }
        let lg_n = (num_elements - 2) / 2;

        let mut L_vec = Vec::with_capacity(lg_n);
        let mut R_vec = Vec::with_capacity(lg_n);
        for i in 0..lg_n {
            let mut l = [0u8; 32];
            let mut r = [0u8; 32];
            l.copy_from_slice(&slice[i * 64..i * 64 + 32]);
            r.copy_from_slice(&slice[i * 64 + 32..i * 64 + 64]);
            L_vec.push(CompressedRistretto(l));
            R_vec.push(CompressedRistretto(r));
        }

        let pos = lg_n * 64;
        let mut a_bytes = [0u8; 32];
        a_bytes.copy_from_slice(&slice[pos..pos + 32]);
        let a: Scalar = Option::from(Scalar::from_canonical_bytes(a_bytes))
            .ok_or(ProofError::InvalidEncoding)?;

        let mut b_bytes = [0u8; 32];
        b_bytes.copy_from_slice(&slice[pos + 32..pos + 64]);
        let b_scalar: Scalar = Option::from(Scalar::from_canonical_bytes(b_bytes))
            .ok_or(ProofError::InvalidEncoding)?;

        Ok(InnerProductProof {
            L_vec,
            R_vec,
            a,
            b: b_scalar,
        })
    }
}
