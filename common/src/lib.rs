//! Shared types and primitives for OpenPGP session-key encryption.
//!
//! This crate holds everything the `pkesk-encrypt` crate needs besides the
//! wrapping logic itself: the algorithm identifiers and recipient key model,
//! the error taxonomy, the AES key-wrap primitive, and the [`CryptoBackend`]
//! capability surface together with its pure-software implementation.
//! Alternative backends (hardware-accelerated, test stubs) implement the
//! same trait and are interchangeable without touching the wrapping logic.

#![forbid(missing_docs)]
#![cfg_attr(not(test), forbid(unused_crate_dependencies))]

pub mod backend;
pub mod error;
pub mod keywrap;
pub mod types;

pub use backend::{CryptoBackend, EcdhAgreement, SoftwareBackend};
pub use error::{CryptoError, CryptoResult};
pub use types::{Curve, HashAlgorithm, KeyMaterial, RecipientKey, SymmetricAlgorithm};

// Re-exported so that downstream crates use the same versions.
pub use rand_core;
pub use zeroize;
