//! OpenPGP public-key session-key encryption.
//!
//! Produces the algorithm-specific payload of a public-key encrypted
//! session key (PKESK) packet for a single recipient. ECDH recipients get
//! the RFC 6637 construction — an ephemeral key agreement, the one-shot
//! hash KDF, and an RFC 3394 key wrap — while RSA recipients get the
//! session info encrypted directly under the recipient key. Packet framing
//! around the payload is the caller's concern, as is generating the
//! session key itself.
//!
//! Each encryption call is a self-contained synchronous computation; the
//! only shared resource is the caller-supplied randomness source.

#![forbid(missing_docs)]
#![cfg_attr(not(test), forbid(unused_crate_dependencies))]

mod ecdh;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

pub use common::{
    backend::{CryptoBackend, EcdhAgreement, SoftwareBackend},
    error::{CryptoError, CryptoResult},
    types::{Curve, HashAlgorithm, KeyMaterial, RecipientKey, SymmetricAlgorithm},
};

/// Encrypts session keys to recipient public keys.
///
/// The encryptor is configured once — by default with the pure-software
/// backend — and can then encrypt to any number of recipients. Randomness
/// is injected per call; if one rng instance is shared across parallel
/// calls, making it safe for concurrent use is the caller's obligation.
#[derive(Debug, Clone, Default)]
pub struct SessionKeyEncryptor<B = SoftwareBackend> {
    backend: B,
}

impl SessionKeyEncryptor<SoftwareBackend> {
    /// Creates an encryptor backed by the software primitives.
    pub fn new() -> Self {
        Self {
            backend: SoftwareBackend,
        }
    }
}

impl<B: CryptoBackend> SessionKeyEncryptor<B> {
    /// Creates an encryptor that uses `backend` for all primitives.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Encrypts `session_info` to `recipient` and returns the PKESK
    /// payload.
    ///
    /// `session_info` is the plaintext to protect: the symmetric-cipher id
    /// octet followed by the session key (see [`session_info`]). The layout
    /// of the returned bytes depends on the recipient's algorithm; for ECDH
    /// it is `MPI(ephemeral point) ‖ length octet ‖ wrapped key`, for RSA
    /// it is the raw primitive output.
    ///
    /// Fails fast with [`CryptoError::UnsupportedAlgorithm`] for algorithms
    /// this implementation cannot encrypt to, before any key material or
    /// randomness is touched. Nothing is retried on failure and no partial
    /// output is returned.
    pub fn encrypt_session_key<R>(
        &self,
        recipient: &RecipientKey,
        session_info: &[u8],
        rng: &mut R,
    ) -> CryptoResult<Vec<u8>>
    where
        R: RngCore + CryptoRng,
    {
        match recipient.material() {
            KeyMaterial::Ecdh { .. } => {
                ecdh::wrap_session_key(&self.backend, recipient, session_info, rng)
            }
            KeyMaterial::Rsa { .. } => {
                self.backend
                    .public_key_encrypt(recipient.material(), session_info, rng)
            }
            KeyMaterial::Unknown { tag } => Err(CryptoError::UnsupportedAlgorithm(*tag)),
        }
    }
}

/// Builds the canonical session-info payload for `key`.
///
/// Layout per RFC 4880, section 5.1: the cipher's one-octet id, the raw
/// session key, and a two-octet big-endian checksum (the sum of the key
/// bytes mod 65536). The checksum is verified by the recipient after
/// unwrapping; the wrap itself treats the whole payload as opaque bytes.
pub fn session_info(cipher: SymmetricAlgorithm, key: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut info = Zeroizing::new(Vec::with_capacity(key.len() + 3));
    info.push(cipher.id());
    info.extend_from_slice(key);
    let checksum = key
        .iter()
        .fold(0u16, |acc, &byte| acc.wrapping_add(u16::from(byte)));
    info.extend_from_slice(&checksum.to_be_bytes());
    info
}
