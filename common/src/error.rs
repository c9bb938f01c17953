//! Error taxonomy for session-key encryption.

use crate::types::Curve;

/// Result alias used throughout the crates.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors produced while encrypting a session key.
///
/// Every variant is terminal for the current encryption attempt. All inputs
/// are deterministic given the call's arguments (only the randomness varies,
/// and fresh randomness will not fix a structural error), so nothing is
/// retried internally and no partial output is ever returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CryptoError {
    /// The recipient key names a curve this implementation cannot resolve.
    #[error("unknown curve: {0}")]
    UnknownCurve(Curve),

    /// The recipient key's public-key algorithm cannot be encrypted to.
    #[error("unsupported public-key algorithm (tag {0})")]
    UnsupportedAlgorithm(u8),

    /// Recipient key material is structurally invalid, e.g. the public
    /// point does not lie on the declared curve.
    #[error("invalid key material: {0}")]
    InvalidKey(&'static str),

    /// The KDF could not produce a wrapping key of the required length.
    #[error("key derivation failed: {0}")]
    KeyDerivationFailure(&'static str),

    /// The key-wrap primitive rejected its inputs.
    #[error("key wrap failed: {0}")]
    WrapFailure(&'static str),

    /// The wrapped ciphertext does not fit the single-octet length field.
    #[error("wrapped key of {0} bytes exceeds the 255-byte length field")]
    EncodingOverflow(usize),

    /// The direct asymmetric-encryption primitive failed. The underlying
    /// cause is preserved for diagnostics but not interpreted further.
    #[error("public-key primitive failed")]
    PrimitiveFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}
