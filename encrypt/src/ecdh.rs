//! Session-key wrapping with Elliptic-Curve Diffie-Hellman, RFC 6637.
//!
//! A fresh ephemeral key pair is combined with the recipient's public
//! point; the x-coordinate of the shared point feeds the one-shot KDF of
//! RFC 6637, section 7, and the derived key wraps the padded session info
//! per RFC 3394. The payload is
//! `MPI(ephemeral point) ‖ length octet ‖ wrapped key`.

use common::backend::CryptoBackend;
use common::error::{CryptoError, CryptoResult};
use common::types::{Curve, HashAlgorithm, KeyMaterial, RecipientKey, SymmetricAlgorithm};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// OpenPGP public-key algorithm id of ECDH (RFC 6637, section 5).
const ECDH_ALGORITHM_ID: u8 = 18;

/// Fixed KDF context string (RFC 6637, section 7). Exactly 20 octets.
const ANONYMOUS_SENDER: &[u8; 20] = b"Anonymous Sender    ";

pub(crate) fn wrap_session_key<B, R>(
    backend: &B,
    recipient: &RecipientKey,
    session_info: &[u8],
    rng: &mut R,
) -> CryptoResult<Vec<u8>>
where
    B: CryptoBackend,
    R: RngCore + CryptoRng,
{
    let KeyMaterial::Ecdh {
        curve,
        point,
        hash,
        cipher,
    } = recipient.material()
    else {
        return Err(CryptoError::UnsupportedAlgorithm(
            recipient.material().algorithm_id(),
        ));
    };

    let agreement = backend.ecdh_agree(curve, point, rng)?;

    let param = make_param(curve, *hash, *cipher, recipient.fingerprint());
    let kek = kdf(
        backend,
        *hash,
        cipher.key_size()?,
        &agreement.shared_secret,
        &param,
    )?;

    let padded = pad_session_info(session_info);
    let wrapped = backend.wrap_key(*cipher, &kek, &padded)?;
    if wrapped.len() > usize::from(u8::MAX) {
        return Err(CryptoError::EncodingOverflow(wrapped.len()));
    }

    let mpi = encode_mpi(&agreement.ephemeral_public);
    let mut payload = Vec::with_capacity(mpi.len() + 1 + wrapped.len());
    payload.extend_from_slice(&mpi);
    payload.push(wrapped.len() as u8);
    payload.extend_from_slice(&wrapped);
    Ok(payload)
}

/// KDF parameter block of RFC 6637, section 7. It binds the derived key to
/// the curve, the algorithm suite and the recipient, so a wrapped key
/// cannot be replayed against another key or suite.
fn make_param(
    curve: &Curve,
    hash: HashAlgorithm,
    cipher: SymmetricAlgorithm,
    fingerprint: &[u8],
) -> Vec<u8> {
    let oid = curve.oid();
    let mut param =
        Vec::with_capacity(1 + oid.len() + 5 + ANONYMOUS_SENDER.len() + fingerprint.len());
    param.push(oid.len() as u8);
    param.extend_from_slice(oid);
    param.push(ECDH_ALGORITHM_ID);
    param.push(0x03);
    param.push(0x01);
    param.push(hash.id());
    param.push(cipher.id());
    param.extend_from_slice(ANONYMOUS_SENDER);
    param.extend_from_slice(fingerprint);
    param
}

/// One KDF round: the hash over a fixed 32-bit counter, the shared secret
/// and the parameter block, truncated to the wrap-key length.
fn kdf<B: CryptoBackend>(
    backend: &B,
    hash: HashAlgorithm,
    key_len: usize,
    shared_secret: &[u8],
    param: &[u8],
) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let mut input = Zeroizing::new(Vec::with_capacity(4 + shared_secret.len() + param.len()));
    input.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
    input.extend_from_slice(shared_secret);
    input.extend_from_slice(param);

    let digest = Zeroizing::new(backend.digest(hash, &input)?);
    if digest.len() < key_len {
        return Err(CryptoError::KeyDerivationFailure(
            "digest too short for the wrap key",
        ));
    }

    let mut kek = Zeroizing::new(vec![0u8; key_len]);
    kek.copy_from_slice(&digest[..key_len]);
    Ok(kek)
}

/// Pads to a multiple of 8 bytes. The pad octet equals the pad count and a
/// full block is appended when the input is already aligned, so the padding
/// is never empty and always recoverable from the final octet.
fn pad_session_info(session_info: &[u8]) -> Zeroizing<Vec<u8>> {
    let pad_len = 8 - session_info.len() % 8;
    let mut padded = Zeroizing::new(Vec::with_capacity(session_info.len() + pad_len));
    padded.extend_from_slice(session_info);
    padded.resize(session_info.len() + pad_len, pad_len as u8);
    padded
}

/// Encodes `bytes`, read as an unsigned big-endian integer, as an OpenPGP
/// MPI: a two-octet big-endian bit count followed by the minimal magnitude.
fn encode_mpi(bytes: &[u8]) -> Vec<u8> {
    let magnitude = match bytes.iter().position(|&byte| byte != 0) {
        Some(first) => &bytes[first..],
        None => &[],
    };
    let bits = match magnitude.first() {
        Some(&msb) => (magnitude.len() - 1) * 8 + (8 - msb.leading_zeros() as usize),
        None => 0,
    };

    let mut mpi = Vec::with_capacity(2 + magnitude.len());
    mpi.extend_from_slice(&(bits as u16).to_be_bytes());
    mpi.extend_from_slice(magnitude);
    mpi
}
