//! A pure-Rust proof engine for confidential value transfers.
//!
//! This crate produces and verifies compact, non-interactive
//! zero-knowledge proofs that:
//!
//! - a committed integer lies in a bounded range (a single-value
//!   [Bulletproof](https://eprint.iacr.org/2017/1066.pdf) range proof, see
//!   [`range_proof`]),
//! - two Pedersen commitments hide the same value (a Schnorr-style
//!   [`equality_proof`]),
//! - a three-commitment transfer equation balances (a [`validity_proof`]
//!   built from two equality proofs),
//!
//! and composes the three into a [`transfer::TransferProof`] for a
//! confidential transfer: `sender_before = amount + sender_after`.
//!
//! Every wire-level detail — the Ristretto255 group, the Merlin-style
//! SHA3 transcript, the deterministic generator derivation, the exact
//! challenge-extraction order — is fixed so that a proof produced by one
//! implementation of this protocol verifies under another. See
//! [`transcript`] and [`generators`] for the two subsystems where that
//! matters most; a one-byte discrepancy in either voids every proof.
//!
//! # Modules
//!
//! - [`field`]: Scalar/Ristretto255 point algebra.
//! - [`pedersen`]: homomorphic Pedersen commitments.
//! - [`transcript`]: the Fiat-Shamir transcript.
//! - [`generators`]: deterministic vector-generator derivation.
//! - [`inner_product_proof`]: the recursive inner-product argument.
//! - [`range_proof`]: the Bulletproof range proof.
//! - [`equality_proof`]: the Schnorr-style equality proof.
//! - [`validity_proof`]: the transfer-balance validity proof.
//! - [`transfer`]: the `TransferProof` orchestrator (the privacy façade).
//! - [`compact`]: fixed-size wire serialization for on-chain submission.
//! - [`proof_cache`] (requires `std`): the optional TTL-bounded range-proof
//!   cache.
//!
//! # `no_std`
//!
//! This crate is `no_std` (with `alloc`) when built with `default-features
//! = false`; the `std` feature (on by default) pulls in `thread_rng` and
//! `thiserror`-derived `std::error::Error` impls.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

extern crate alloc;

pub mod compact;
pub mod equality_proof;
pub mod errors;
pub mod field;
pub mod generators;
pub mod inner_product_proof;
pub mod pedersen;
#[cfg(feature = "std")]
pub mod proof_cache;
pub mod range_proof;
pub mod transcript;
pub mod transfer;
mod util;
pub mod validity_proof;

pub use compact::{CompactRangeProof, CompactTransferProof, CompactValidityProof};
pub use equality_proof::EqualityProof;
pub use errors::ProofError;
pub use generators::{BulletproofGens, PedersenGens};
pub use inner_product_proof::InnerProductProof;
#[cfg(feature = "std")]
pub use proof_cache::ProofCache;
pub use range_proof::RangeProof;
pub use transcript::Transcript;
pub use transfer::{TransferProof, TransferRequest};
pub use validity_proof::{RecipientValidity, ValidityProof};
