//! Compact wire serialization for on-chain submission (spec.md §4.I).
//!
//! The compact envelope carries only what a cheap structural check needs
//! plus a truncated hash linking it to the full proof held off-chain — it
//! is not independently verifiable. [`CompactTransferProof::quick_check`]
//! mirrors the BPF-compatible structural pre-filter described in spec.md §6
//! (non-zero components, commitment equality, distinct components): it
//! never returns a "valid" verdict, only a cheap "definitely malformed"
//! rejection ahead of full cryptographic verification.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::ProofError;
use crate::range_proof::RangeProof;
use crate::transfer::TransferProof;
use crate::validity_proof::ValidityProof;

const RANGE_PROOF_COMPACT_SIZE: usize = 273;
const VALIDITY_PROOF_COMPACT_SIZE: usize = 144;
const TRANSFER_PROOF_COMPACT_SIZE: usize = 690;

fn truncated_hash(bytes: &[u8]) -> [u8; 16] {
    let digest = Sha256::digest(bytes);
    let mut out = [0u8; 16];
    out.copy_from_slice(&digest[..16]);
    out
}

/// Zero-pad a 32-byte Ristretto encoding to the 64-byte envelope the wire
/// submission layer expects (spec.md §6).
pub fn pad_point_to_64(bytes: &[u8; 32]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(bytes);
    out
}

/// `CompactRangeProof` (273 bytes, spec.md §4.I): `V, A, S, T1, T2, tau_x,
/// mu, t` (8*32) plus `n` (1) plus a truncated proof hash (16).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompactRangeProof {
    v: [u8; 32],
    a: [u8; 32],
    s: [u8; 32],
    t1: [u8; 32],
    t2: [u8; 32],
    tau_x: [u8; 32],
    mu: [u8; 32],
    t: [u8; 32],
    n: u8,
    proof_hash: [u8; 16],
}

impl CompactRangeProof {
    /// Build the compact envelope from a full [`RangeProof`].
    pub fn from_full(proof: &RangeProof) -> Self {
        let (a_point, s_point, t1, t2, tau_x, mu, t) = proof.components();
        let full_bytes = proof.to_bytes();

        CompactRangeProof {
            v: *proof.commitment().as_bytes(),
            a: *a_point.as_bytes(),
            s: *s_point.as_bytes(),
            t1: *t1.as_bytes(),
            t2: *t2.as_bytes(),
            tau_x: *tau_x.as_bytes(),
            mu: *mu.as_bytes(),
            t: *t.as_bytes(),
            n: proof.n() as u8,
            proof_hash: truncated_hash(&full_bytes),
        }
    }

    /// The embedded value commitment `V`, raw encoded bytes.
    pub fn v(&self) -> &[u8; 32] {
        &self.v
    }

    /// The proven bitsize.
    pub fn n(&self) -> u8 {
        self.n
    }

    /// The 16-byte truncated hash linking this envelope to its full proof.
    pub fn proof_hash(&self) -> &[u8; 16] {
        &self.proof_hash
    }

    /// `true` iff `full`'s compact hash matches the one carried here
    /// (spec.md §8 "Compact-hash linkage").
    pub fn verify_proof_hash(&self, full: &RangeProof) -> bool {
        let recomputed = truncated_hash(&full.to_bytes());
        recomputed.ct_eq(&self.proof_hash).into()
    }

    /// A cheap, non-cryptographic structural pre-filter: every component is
    /// non-zero. Never implies the proof is cryptographically valid.
    pub fn quick_check(&self) -> Result<(), ProofError> {
        let fields: [&[u8; 32]; 8] = [
            &self.v, &self.a, &self.s, &self.t1, &self.t2, &self.tau_x, &self.mu, &self.t,
        ];
        if fields.iter().any(|f| f.iter().all(|b| *b == 0)) {
            return Err(ProofError::ProofInvalid);
        }
        Ok(())
    }

    /// Serialize to the fixed 273-byte layout.
    pub fn to_bytes(&self) -> [u8; RANGE_PROOF_COMPACT_SIZE] {
        let mut out = [0u8; RANGE_PROOF_COMPACT_SIZE];
        let mut pos = 0;
        for field in [
            &self.v, &self.a, &self.s, &self.t1, &self.t2, &self.tau_x, &self.mu, &self.t,
        ] {
            out[pos..pos + 32].copy_from_slice(field);
            pos += 32;
        }
        out[pos] = self.n;
        pos += 1;
        out[pos..pos + 16].copy_from_slice(&self.proof_hash);
        out
    }

    /// Deserialize from the layout in [`CompactRangeProof::to_bytes`].
    pub fn from_bytes(bytes: &[u8; RANGE_PROOF_COMPACT_SIZE]) -> Self {
        let read32 = |offset: usize| -> [u8; 32] {
            let mut out = [0u8; 32];
            out.copy_from_slice(&bytes[offset..offset + 32]);
            out
        };
        let mut proof_hash = [0u8; 16];
        proof_hash.copy_from_slice(&bytes[257..273]);

        CompactRangeProof {
            v: read32(0),
            a: read32(32),
            s: read32(64),
            t1: read32(96),
            t2: read32(128),
            tau_x: read32(160),
            mu: read32(192),
            t: read32(224),
            n: bytes[256],
            proof_hash,
        }
    }
}

/// `CompactValidityProof` (144 bytes, spec.md §4.I): sender `R, s` (64),
/// recipient `R, s` (64, zero-filled when absent), truncated hash (16).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompactValidityProof {
    sender: [u8; 64],
    recipient: [u8; 64],
    proof_hash: [u8; 16],
}

impl CompactValidityProof {
    /// Build the compact envelope from a full [`ValidityProof`].
    pub fn from_full(proof: &ValidityProof) -> Self {
        let sender = proof.sender_equality().to_bytes();
        let recipient = proof
            .recipient_equality()
            .map(|eq| eq.to_bytes())
            .unwrap_or([0u8; 64]);

        let mut hash_input = [0u8; 128];
        hash_input[..64].copy_from_slice(&sender);
        hash_input[64..].copy_from_slice(&recipient);

        CompactValidityProof {
            sender,
            recipient,
            proof_hash: truncated_hash(&hash_input),
        }
    }

    pub fn proof_hash(&self) -> &[u8; 16] {
        &self.proof_hash
    }

    /// `true` iff `full`'s compact hash matches the one carried here.
    pub fn verify_proof_hash(&self, full: &ValidityProof) -> bool {
        let recomputed = CompactValidityProof::from_full(full);
        recomputed.proof_hash.ct_eq(&self.proof_hash).into()
    }

    /// Non-cryptographic structural pre-filter: the sender equality proof
    /// is always non-zero; the recipient half is either wholly zero
    /// (absent) or wholly non-zero (present) — a half-zero recipient half
    /// indicates a malformed envelope.
    pub fn quick_check(&self) -> Result<(), ProofError> {
        if self.sender.iter().all(|b| *b == 0) {
            return Err(ProofError::ProofInvalid);
        }
        let recipient_all_zero = self.recipient.iter().all(|b| *b == 0);
        let recipient_all_nonzero_prefix = self.recipient[..32].iter().any(|b| *b != 0);
        let recipient_all_nonzero_suffix = self.recipient[32..].iter().any(|b| *b != 0);
        if !recipient_all_zero
            && !(recipient_all_nonzero_prefix && recipient_all_nonzero_suffix)
        {
            return Err(ProofError::ProofInvalid);
        }
        Ok(())
    }

    /// Serialize to the fixed 144-byte layout.
    pub fn to_bytes(&self) -> [u8; VALIDITY_PROOF_COMPACT_SIZE] {
        let mut out = [0u8; VALIDITY_PROOF_COMPACT_SIZE];
        out[..64].copy_from_slice(&self.sender);
        out[64..128].copy_from_slice(&self.recipient);
        out[128..144].copy_from_slice(&self.proof_hash);
        out
    }

    /// Deserialize from the layout in [`CompactValidityProof::to_bytes`].
    pub fn from_bytes(bytes: &[u8; VALIDITY_PROOF_COMPACT_SIZE]) -> Self {
        let mut sender = [0u8; 64];
        sender.copy_from_slice(&bytes[..64]);
        let mut recipient = [0u8; 64];
        recipient.copy_from_slice(&bytes[64..128]);
        let mut proof_hash = [0u8; 16];
        proof_hash.copy_from_slice(&bytes[128..144]);

        CompactValidityProof {
            sender,
            recipient,
            proof_hash,
        }
    }
}

/// `CompactTransferProof` (690 bytes, spec.md §4.I):
/// `CompactRangeProof_amount || CompactRangeProof_after || CompactValidityProof`.
///
/// 690 bytes leaves roughly 542 bytes of headroom under the 1232-byte
/// instruction-payload ceiling named in spec.md §6.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompactTransferProof {
    amount_range: CompactRangeProof,
    after_range: CompactRangeProof,
    validity: CompactValidityProof,
}

impl CompactTransferProof {
    /// Build the compact envelope from a full [`TransferProof`]. Fails with
    /// [`ProofError::SizeExceeded`] if the resulting envelope would exceed
    /// the 690-byte ceiling (it never does for these fixed-size
    /// components; the check exists because spec.md §4.I requires
    /// serializers to refuse oversize output rather than silently truncate).
    pub fn from_full(proof: &TransferProof) -> Result<Self, ProofError> {
        let compact = CompactTransferProof {
            amount_range: CompactRangeProof::from_full(proof.amount_range()),
            after_range: CompactRangeProof::from_full(proof.after_range()),
            validity: CompactValidityProof::from_full(proof.validity()),
        };
        if compact.to_bytes().len() > TRANSFER_PROOF_COMPACT_SIZE {
            return Err(ProofError::SizeExceeded);
        }
        Ok(compact)
    }

    pub fn amount_range(&self) -> &CompactRangeProof {
        &self.amount_range
    }

    pub fn after_range(&self) -> &CompactRangeProof {
        &self.after_range
    }

    pub fn validity(&self) -> &CompactValidityProof {
        &self.validity
    }

    /// `true` iff every embedded hash matches its corresponding full
    /// sub-proof (spec.md §6 "Off-chain verifier").
    pub fn verify_proof_hash(&self, full: &TransferProof) -> bool {
        self.amount_range.verify_proof_hash(full.amount_range())
            && self.after_range.verify_proof_hash(full.after_range())
            && self.validity.verify_proof_hash(full.validity())
    }

    /// As [`CompactTransferProof::verify_proof_hash`], but returns a
    /// `Result` so the off-chain verifier (spec.md §6) can distinguish
    /// hash-linkage failure from other rejection causes when the
    /// `detailed-errors` feature is enabled.
    pub fn verify_proof_hash_checked(&self, full: &TransferProof) -> Result<(), ProofError> {
        if self.verify_proof_hash(full) {
            Ok(())
        } else {
            #[cfg(feature = "detailed-errors")]
            {
                Err(ProofError::VerificationFailed {
                    stage: crate::errors::VerificationStage::CompactHashLinkage,
                })
            }
            #[cfg(not(feature = "detailed-errors"))]
            {
                Err(ProofError::ProofInvalid)
            }
        }
    }

    /// The BPF-compatible structural pre-filter (spec.md §6): every
    /// sub-component is individually well-formed, and the range proofs'
    /// embedded value commitments match the auxiliary 64-byte-padded
    /// commitment envelopes the wire-submission layer carries alongside
    /// this compact proof. Never returns a "valid" verdict by itself.
    pub fn quick_check(
        &self,
        c_before: &[u8; 64],
        c_amount: &[u8; 64],
        c_after: &[u8; 64],
    ) -> Result<(), ProofError> {
        self.amount_range.quick_check()?;
        self.after_range.quick_check()?;
        self.validity.quick_check()?;

        if pad_point_to_64(&self.amount_range.v) != *c_amount {
            return Err(ProofError::ProofInvalid);
        }
        if pad_point_to_64(&self.after_range.v) != *c_after {
            return Err(ProofError::ProofInvalid);
        }
        if c_before == c_amount || c_amount == c_after || c_before == c_after {
            return Err(ProofError::ProofInvalid);
        }
        Ok(())
    }

    /// Serialize to the fixed 690-byte layout.
    pub fn to_bytes(&self) -> [u8; TRANSFER_PROOF_COMPACT_SIZE] {
        let mut out = [0u8; TRANSFER_PROOF_COMPACT_SIZE];
        out[..273].copy_from_slice(&self.amount_range.to_bytes());
        out[273..546].copy_from_slice(&self.after_range.to_bytes());
        out[546..690].copy_from_slice(&self.validity.to_bytes());
        out
    }

    /// Deserialize from the layout in [`CompactTransferProof::to_bytes`].
    pub fn from_bytes(bytes: &[u8; TRANSFER_PROOF_COMPACT_SIZE]) -> Self {
        let mut amount_bytes = [0u8; RANGE_PROOF_COMPACT_SIZE];
        amount_bytes.copy_from_slice(&bytes[..273]);
        let mut after_bytes = [0u8; RANGE_PROOF_COMPACT_SIZE];
        after_bytes.copy_from_slice(&bytes[273..546]);
        let mut validity_bytes = [0u8; VALIDITY_PROOF_COMPACT_SIZE];
        validity_bytes.copy_from_slice(&bytes[546..690]);

        CompactTransferProof {
            amount_range: CompactRangeProof::from_bytes(&amount_bytes),
            after_range: CompactRangeProof::from_bytes(&after_bytes),
            validity: CompactValidityProof::from_bytes(&validity_bytes),
        }
    }
}
