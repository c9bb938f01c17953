//! The cryptographic capability surface and its software implementation.
//!
//! The session-key encryptor depends only on [`CryptoBackend`];
//! [`SoftwareBackend`] implements it with pure-Rust primitive crates.
//! Swapping in another implementation (a hardware module, a stub for
//! boundary tests) does not touch the wrapping logic.

use p256::elliptic_curve::{
    ecdh::EphemeralSecret,
    sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint},
    AffinePoint, CurveArithmetic, FieldBytesSize, PublicKey,
};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::keywrap;
use crate::types::{Curve, HashAlgorithm, KeyMaterial, SymmetricAlgorithm};

/// Result of one ephemeral ECDH agreement.
///
/// The ephemeral private scalar never crosses the backend boundary: it is
/// generated, multiplied into the recipient's point and dropped inside a
/// single [`CryptoBackend::ecdh_agree`] call, so it cannot outlive the
/// encryption call that requested it.
pub struct EcdhAgreement {
    /// Ephemeral public point, SEC1 uncompressed.
    pub ephemeral_public: Vec<u8>,
    /// Big-endian x-coordinate of the shared point, one field element wide.
    pub shared_secret: Zeroizing<Vec<u8>>,
}

/// Cryptographic capabilities consumed by the session-key encryptor.
pub trait CryptoBackend {
    /// Generates an ephemeral key pair on `curve` and multiplies the
    /// recipient's `point` by the ephemeral scalar, returning the
    /// normalized result.
    ///
    /// Fails with [`CryptoError::UnknownCurve`] before drawing any
    /// randomness if the curve cannot be resolved, and with
    /// [`CryptoError::InvalidKey`] if `point` does not decode to a point
    /// on the curve.
    fn ecdh_agree<R>(
        &self,
        curve: &Curve,
        point: &[u8],
        rng: &mut R,
    ) -> CryptoResult<EcdhAgreement>
    where
        R: RngCore + CryptoRng;

    /// Hashes `data` with `algo`.
    fn digest(&self, algo: HashAlgorithm, data: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Wraps `plaintext` under `kek` with the key-wrap mode of `algo`.
    fn wrap_key(
        &self,
        algo: SymmetricAlgorithm,
        kek: &[u8],
        plaintext: &[u8],
    ) -> CryptoResult<Vec<u8>>;

    /// Encrypts `plaintext` directly under a non-EC public key.
    ///
    /// Padding is the primitive's responsibility; failures surface as
    /// [`CryptoError::PrimitiveFailure`] with the cause preserved.
    fn public_key_encrypt<R>(
        &self,
        material: &KeyMaterial,
        plaintext: &[u8],
        rng: &mut R,
    ) -> CryptoResult<Vec<u8>>
    where
        R: RngCore + CryptoRng;
}

/// Pure-software backend over the RustCrypto primitive crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareBackend;

impl CryptoBackend for SoftwareBackend {
    fn ecdh_agree<R>(
        &self,
        curve: &Curve,
        point: &[u8],
        rng: &mut R,
    ) -> CryptoResult<EcdhAgreement>
    where
        R: RngCore + CryptoRng,
    {
        match curve {
            Curve::NistP256 => agree::<p256::NistP256>(point, rng),
            Curve::NistP384 => agree::<p384::NistP384>(point, rng),
            Curve::NistP521 => agree::<p521::NistP521>(point, rng),
            Curve::Unknown(_) => Err(CryptoError::UnknownCurve(curve.clone())),
        }
    }

    fn digest(&self, algo: HashAlgorithm, data: &[u8]) -> CryptoResult<Vec<u8>> {
        match algo {
            HashAlgorithm::Sha256 => Ok(Sha256::digest(data).to_vec()),
            HashAlgorithm::Sha384 => Ok(Sha384::digest(data).to_vec()),
            HashAlgorithm::Sha512 => Ok(Sha512::digest(data).to_vec()),
            HashAlgorithm::Unknown(_) => Err(CryptoError::KeyDerivationFailure(
                "unsupported hash algorithm",
            )),
        }
    }

    fn wrap_key(
        &self,
        algo: SymmetricAlgorithm,
        kek: &[u8],
        plaintext: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        keywrap::aes_key_wrap(algo, kek, plaintext)
    }

    fn public_key_encrypt<R>(
        &self,
        material: &KeyMaterial,
        plaintext: &[u8],
        rng: &mut R,
    ) -> CryptoResult<Vec<u8>>
    where
        R: RngCore + CryptoRng,
    {
        match material {
            KeyMaterial::Rsa { modulus, exponent } => {
                let n = rsa::BigUint::from_bytes_be(modulus);
                let e = rsa::BigUint::from_bytes_be(exponent);
                let key = rsa::RsaPublicKey::new(n, e)
                    .map_err(|err| CryptoError::PrimitiveFailure(Box::new(err)))?;
                key.encrypt(rng, rsa::Pkcs1v15Encrypt, plaintext)
                    .map_err(|err| CryptoError::PrimitiveFailure(Box::new(err)))
            }
            other => Err(CryptoError::UnsupportedAlgorithm(other.algorithm_id())),
        }
    }
}

/// One ephemeral agreement on a concrete curve.
fn agree<C>(
    point: &[u8],
    rng: &mut (impl RngCore + CryptoRng),
) -> CryptoResult<EcdhAgreement>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let recipient = PublicKey::<C>::from_sec1_bytes(point)
        .map_err(|_| CryptoError::InvalidKey("recipient point is not on the curve"))?;

    let ephemeral = EphemeralSecret::<C>::random(rng);
    let ephemeral_public = ephemeral
        .public_key()
        .to_encoded_point(false)
        .as_bytes()
        .to_vec();

    let shared = ephemeral.diffie_hellman(&recipient);
    let shared_secret = Zeroizing::new(shared.raw_secret_bytes().to_vec());

    Ok(EcdhAgreement {
        ephemeral_public,
        shared_secret,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_matches_the_recipient_side() {
        let mut rng = rand_dev::DevRng::new();
        let recipient_secret = p256::SecretKey::random(&mut rng);
        let point = recipient_secret
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();

        let agreement = SoftwareBackend
            .ecdh_agree(&Curve::NistP256, &point, &mut rng)
            .unwrap();
        assert_eq!(agreement.ephemeral_public.len(), 65);
        assert_eq!(agreement.ephemeral_public[0], 0x04);
        assert_eq!(agreement.shared_secret.len(), 32);

        let ephemeral = p256::PublicKey::from_sec1_bytes(&agreement.ephemeral_public).unwrap();
        let shared = p256::ecdh::diffie_hellman(
            recipient_secret.to_nonzero_scalar(),
            ephemeral.as_affine(),
        );
        assert_eq!(
            shared.raw_secret_bytes().as_slice(),
            &agreement.shared_secret[..]
        );
    }

    #[test]
    fn off_curve_point_is_rejected() {
        let mut rng = rand_dev::DevRng::new();
        let result = SoftwareBackend.ecdh_agree(&Curve::NistP256, &[0x04; 65], &mut rng);
        assert!(matches!(result, Err(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn unknown_curve_is_rejected() {
        let mut rng = rand_dev::DevRng::new();
        let curve = Curve::Unknown(vec![0x55, 0x04, 0x03].into_boxed_slice());
        let result = SoftwareBackend.ecdh_agree(&curve, &[0x04; 65], &mut rng);
        assert!(matches!(result, Err(CryptoError::UnknownCurve(_))));
    }

    #[test]
    fn digest_computes_sha256() {
        let digest = SoftwareBackend
            .digest(HashAlgorithm::Sha256, b"abc")
            .unwrap();
        assert_eq!(
            digest,
            hex::decode("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
                .unwrap()
        );
        assert!(matches!(
            SoftwareBackend.digest(HashAlgorithm::Unknown(99), b"abc"),
            Err(CryptoError::KeyDerivationFailure(_))
        ));
    }

    #[test]
    fn rsa_encryption_round_trips() {
        let mut rng = rand_dev::DevRng::new();
        let key = rsa::RsaPrivateKey::new(&mut rng, 2048).unwrap();

        use rsa::traits::PublicKeyParts;
        let material = KeyMaterial::Rsa {
            modulus: key.n().to_bytes_be(),
            exponent: key.e().to_bytes_be(),
        };

        let plaintext = b"\x09session-key-bytes";
        let ciphertext = SoftwareBackend
            .public_key_encrypt(&material, plaintext, &mut rng)
            .unwrap();
        assert_ne!(&ciphertext[..], &plaintext[..]);

        let decrypted = key.decrypt(rsa::Pkcs1v15Encrypt, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn direct_encryption_refuses_ec_material() {
        let mut rng = rand_dev::DevRng::new();
        let material = KeyMaterial::Ecdh {
            curve: Curve::NistP256,
            point: vec![0x04; 65],
            hash: HashAlgorithm::Sha256,
            cipher: SymmetricAlgorithm::Aes128,
        };
        let result = SoftwareBackend.public_key_encrypt(&material, b"data", &mut rng);
        assert!(matches!(
            result,
            Err(CryptoError::UnsupportedAlgorithm(18))
        ));
    }
}
