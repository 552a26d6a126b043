//! Error types returned by every fallible operation in this crate.
//!
//! Every kind here is structural (spec.md §7): there is nothing stringly-typed
//! and nothing transient to retry. `ProofInvalid` is the single normal "false"
//! outcome of a verifier and is returned instead of a boolean so that callers
//! can't accidentally ignore it with `if verify(..) {`.

use core::fmt;

/// The stage of range-proof verification that failed.
///
/// Only constructible when the `detailed-errors` feature is enabled (spec.md
/// §9: the reference implementation's diagnostic print must never run by
/// default). With the feature disabled, verification failures collapse to
/// the plain [`ProofError::ProofInvalid`] variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg(feature = "detailed-errors")]
pub enum VerificationStage {
    /// The batched range-proof MSM check failed.
    RangeProofMsm,
    /// The inner-product argument's folded identity failed.
    InnerProductIdentity,
    /// The equality proof's Schnorr identity failed.
    EqualityIdentity,
    /// The compact-proof truncated hash did not match the full proof.
    CompactHashLinkage,
}

/// Every error this crate can return.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ProofError {
    /// A prover input violated `0 <= v < 2^n`.
    #[cfg_attr(feature = "std", error("value is out of the proven range"))]
    OutOfRange,

    /// A vector length invariant was violated: non-power-of-two `n`,
    /// mismatched `a`/`b` lengths, insufficient generators, etc.
    #[cfg_attr(feature = "std", error("vector length invariant violated"))]
    LengthMismatch,

    /// Non-canonical point bytes, or the wrong number of bytes, were supplied
    /// to a deserializer.
    #[cfg_attr(feature = "std", error("invalid point or scalar encoding"))]
    InvalidEncoding,

    /// The transfer equation `sender_before - amount != sender_after`, or a
    /// commitment did not open to the value/blinding the caller supplied.
    #[cfg_attr(feature = "std", error("transfer balance equation does not hold"))]
    BalanceMismatch,

    /// Verification ran to completion but the proof's defining equation does
    /// not hold. This is a normal outcome, not an exceptional one.
    #[cfg_attr(feature = "std", error("proof failed verification"))]
    ProofInvalid,

    /// Verification failed, reported with the stage that failed. Only ever
    /// returned when the `detailed-errors` feature is enabled.
    #[cfg(feature = "detailed-errors")]
    #[cfg_attr(feature = "std", error("proof failed verification at {stage:?}"))]
    VerificationFailed {
        /// Which equation failed to hold.
        stage: VerificationStage,
    },

    /// Compact serialization would exceed its fixed-size ceiling.
    #[cfg_attr(feature = "std", error("compact proof exceeds its size ceiling"))]
    SizeExceeded,
}

#[cfg(not(feature = "std"))]
impl fmt::Display for ProofError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ProofError::OutOfRange => "value is out of the proven range",
            ProofError::LengthMismatch => "vector length invariant violated",
            ProofError::InvalidEncoding => "invalid point or scalar encoding",
            ProofError::BalanceMismatch => "transfer balance equation does not hold",
            ProofError::ProofInvalid => "proof failed verification",
            ProofError::SizeExceeded => "compact proof exceeds its size ceiling",
            #[cfg(feature = "detailed-errors")]
            ProofError::VerificationFailed { .. } => "proof failed verification",
        };
        f.write_str(msg)
    }
}
