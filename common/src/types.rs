//! Algorithm identifiers and the recipient key model.
//!
//! Identifier values follow the OpenPGP registries: curves are named by
//! their OID (RFC 6637, section 11), hash and symmetric algorithms by
//! their one-octet ids (RFC 4880, section 9).

use core::fmt;

use crate::error::{CryptoError, CryptoResult};

/// OID of NIST P-256 (1.2.840.10045.3.1.7), DER body without tag and length.
const OID_NIST_P256: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];
/// OID of NIST P-384 (1.3.132.0.34).
const OID_NIST_P384: &[u8] = &[0x2b, 0x81, 0x04, 0x00, 0x22];
/// OID of NIST P-521 (1.3.132.0.35).
const OID_NIST_P521: &[u8] = &[0x2b, 0x81, 0x04, 0x00, 0x23];

/// An elliptic curve usable for ECDH session-key wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Curve {
    /// NIST P-256.
    NistP256,
    /// NIST P-384.
    NistP384,
    /// NIST P-521.
    NistP521,
    /// A curve this implementation does not recognize, kept by OID.
    Unknown(Box<[u8]>),
}

impl Curve {
    /// Resolves a curve from its OID as stored in a key packet.
    pub fn from_oid(oid: &[u8]) -> Curve {
        if oid == OID_NIST_P256 {
            Curve::NistP256
        } else if oid == OID_NIST_P384 {
            Curve::NistP384
        } else if oid == OID_NIST_P521 {
            Curve::NistP521
        } else {
            Curve::Unknown(oid.into())
        }
    }

    /// Returns the curve's OID.
    pub fn oid(&self) -> &[u8] {
        match self {
            Curve::NistP256 => OID_NIST_P256,
            Curve::NistP384 => OID_NIST_P384,
            Curve::NistP521 => OID_NIST_P521,
            Curve::Unknown(oid) => oid,
        }
    }

    /// Size of one field element in bytes.
    pub fn field_size(&self) -> CryptoResult<usize> {
        match self {
            Curve::NistP256 => Ok(32),
            Curve::NistP384 => Ok(48),
            Curve::NistP521 => Ok(66),
            Curve::Unknown(_) => Err(CryptoError::UnknownCurve(self.clone())),
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::NistP256 => f.write_str("NIST P-256"),
            Curve::NistP384 => f.write_str("NIST P-384"),
            Curve::NistP521 => f.write_str("NIST P-521"),
            Curve::Unknown(oid) => {
                f.write_str("unknown curve (oid")?;
                for octet in oid.iter() {
                    write!(f, " {octet:02x}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A hash algorithm usable for the RFC 6637 KDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA2-256.
    Sha256,
    /// SHA2-384.
    Sha384,
    /// SHA2-512.
    Sha512,
    /// A hash algorithm this implementation does not recognize.
    Unknown(u8),
}

impl HashAlgorithm {
    /// One-octet OpenPGP id of the algorithm.
    pub fn id(&self) -> u8 {
        match self {
            HashAlgorithm::Sha256 => 8,
            HashAlgorithm::Sha384 => 9,
            HashAlgorithm::Sha512 => 10,
            HashAlgorithm::Unknown(id) => *id,
        }
    }

    /// Digest size in bytes.
    pub fn digest_size(&self) -> CryptoResult<usize> {
        match self {
            HashAlgorithm::Sha256 => Ok(32),
            HashAlgorithm::Sha384 => Ok(48),
            HashAlgorithm::Sha512 => Ok(64),
            HashAlgorithm::Unknown(_) => Err(CryptoError::KeyDerivationFailure(
                "unsupported hash algorithm",
            )),
        }
    }
}

/// A symmetric cipher usable for key wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetricAlgorithm {
    /// AES with a 128-bit key.
    Aes128,
    /// AES with a 192-bit key.
    Aes192,
    /// AES with a 256-bit key.
    Aes256,
    /// A symmetric algorithm this implementation does not recognize.
    Unknown(u8),
}

impl SymmetricAlgorithm {
    /// One-octet OpenPGP id of the algorithm.
    pub fn id(&self) -> u8 {
        match self {
            SymmetricAlgorithm::Aes128 => 7,
            SymmetricAlgorithm::Aes192 => 8,
            SymmetricAlgorithm::Aes256 => 9,
            SymmetricAlgorithm::Unknown(id) => *id,
        }
    }

    /// Key size in bytes.
    pub fn key_size(&self) -> CryptoResult<usize> {
        match self {
            SymmetricAlgorithm::Aes128 => Ok(16),
            SymmetricAlgorithm::Aes192 => Ok(24),
            SymmetricAlgorithm::Aes256 => Ok(32),
            SymmetricAlgorithm::Unknown(_) => {
                Err(CryptoError::WrapFailure("unsupported wrap cipher"))
            }
        }
    }
}

/// Algorithm-specific public key material of a recipient.
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    /// An ECDH key together with the KDF parameters declared in the key
    /// packet.
    Ecdh {
        /// Curve the public point lies on.
        curve: Curve,
        /// Recipient public point, SEC1 uncompressed.
        point: Vec<u8>,
        /// Hash algorithm declared for the KDF.
        hash: HashAlgorithm,
        /// Cipher declared for wrapping the session key.
        cipher: SymmetricAlgorithm,
    },
    /// An encryption-capable RSA key.
    Rsa {
        /// Public modulus, big-endian.
        modulus: Vec<u8>,
        /// Public exponent, big-endian.
        exponent: Vec<u8>,
    },
    /// An algorithm this implementation cannot encrypt to.
    Unknown {
        /// Public-key algorithm tag from the key packet.
        tag: u8,
    },
}

impl KeyMaterial {
    /// One-octet OpenPGP public-key algorithm id of this material.
    pub fn algorithm_id(&self) -> u8 {
        match self {
            KeyMaterial::Ecdh { .. } => 18,
            KeyMaterial::Rsa { .. } => 1,
            KeyMaterial::Unknown { tag } => *tag,
        }
    }
}

/// A recipient's public key, reduced to what session-key encryption needs.
///
/// The fingerprint identifies the key and participates in the ECDH KDF as
/// context; it is not secret. Both fields are immutable and supplied by the
/// caller.
#[derive(Debug, Clone)]
pub struct RecipientKey {
    material: KeyMaterial,
    fingerprint: Vec<u8>,
}

impl RecipientKey {
    /// Creates a recipient key from its material and fingerprint.
    pub fn new(material: KeyMaterial, fingerprint: impl Into<Vec<u8>>) -> Self {
        Self {
            material,
            fingerprint: fingerprint.into(),
        }
    }

    /// Convenience constructor for an ECDH recipient.
    pub fn ecdh(
        curve: Curve,
        point: impl Into<Vec<u8>>,
        hash: HashAlgorithm,
        cipher: SymmetricAlgorithm,
        fingerprint: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(
            KeyMaterial::Ecdh {
                curve,
                point: point.into(),
                hash,
                cipher,
            },
            fingerprint,
        )
    }

    /// Convenience constructor for an RSA recipient.
    pub fn rsa(
        modulus: impl Into<Vec<u8>>,
        exponent: impl Into<Vec<u8>>,
        fingerprint: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(
            KeyMaterial::Rsa {
                modulus: modulus.into(),
                exponent: exponent.into(),
            },
            fingerprint,
        )
    }

    /// The key material.
    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// The key fingerprint.
    pub fn fingerprint(&self) -> &[u8] {
        &self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case::case(Curve::NistP256; "p256")]
    #[test_case::case(Curve::NistP384; "p384")]
    #[test_case::case(Curve::NistP521; "p521")]
    fn curve_oid_round_trips(curve: Curve) {
        assert_eq!(Curve::from_oid(curve.oid()), curve);
    }

    #[test]
    fn unrecognized_oid_is_preserved() {
        let oid = [0x2b, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07];
        let curve = Curve::from_oid(&oid);
        assert_eq!(curve, Curve::Unknown(oid.to_vec().into_boxed_slice()));
        assert_eq!(curve.oid(), &oid);
        assert!(matches!(
            curve.field_size(),
            Err(CryptoError::UnknownCurve(_))
        ));
    }

    #[test_case::case(Curve::NistP256, 32; "p256")]
    #[test_case::case(Curve::NistP384, 48; "p384")]
    #[test_case::case(Curve::NistP521, 66; "p521")]
    fn field_sizes(curve: Curve, expected: usize) {
        assert_eq!(curve.field_size().unwrap(), expected);
    }

    #[test]
    fn algorithm_ids_match_the_registry() {
        assert_eq!(HashAlgorithm::Sha256.id(), 8);
        assert_eq!(HashAlgorithm::Sha512.id(), 10);
        assert_eq!(SymmetricAlgorithm::Aes128.id(), 7);
        assert_eq!(SymmetricAlgorithm::Aes256.id(), 9);
        assert_eq!(
            KeyMaterial::Unknown { tag: 22 }.algorithm_id(),
            22
        );
    }

    #[test]
    fn unknown_wrap_cipher_has_no_key_size() {
        assert!(matches!(
            SymmetricAlgorithm::Unknown(4).key_size(),
            Err(CryptoError::WrapFailure(_))
        ));
    }
}
