//! AES key wrap and unwrap per RFC 3394.
//!
//! The wrap algorithm is deterministic and authenticated by construction:
//! the fixed initial value woven through every round is checked on unwrap,
//! so any bit corruption of the ciphertext or use of the wrong key is
//! detected. Output is always eight bytes longer than the input.

use aes::cipher::{Block, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::types::SymmetricAlgorithm;

/// Initial value, RFC 3394 section 2.2.3.
const KEY_WRAP_IV: u64 = 0xa6a6_a6a6_a6a6_a6a6;

/// Wraps `plaintext` under the key-encryption key `kek`.
///
/// `plaintext` must be a multiple of 8 bytes and `kek` must have exactly
/// the key length of `algo`, otherwise the call fails with
/// [`CryptoError::WrapFailure`].
pub fn aes_key_wrap(
    algo: SymmetricAlgorithm,
    kek: &[u8],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    if plaintext.is_empty() || plaintext.len() % 8 != 0 {
        return Err(CryptoError::WrapFailure(
            "plaintext is not a multiple of 8 bytes",
        ));
    }
    check_kek(algo, kek)?;

    match algo {
        SymmetricAlgorithm::Aes128 => Ok(wrap_blocks(&new_cipher::<Aes128>(kek)?, plaintext)),
        SymmetricAlgorithm::Aes192 => Ok(wrap_blocks(&new_cipher::<Aes192>(kek)?, plaintext)),
        SymmetricAlgorithm::Aes256 => Ok(wrap_blocks(&new_cipher::<Aes256>(kek)?, plaintext)),
        SymmetricAlgorithm::Unknown(_) => {
            Err(CryptoError::WrapFailure("unsupported wrap cipher"))
        }
    }
}

/// Unwraps `ciphertext` under the key-encryption key `kek`, checking the
/// embedded integrity value.
pub fn aes_key_unwrap(
    algo: SymmetricAlgorithm,
    kek: &[u8],
    ciphertext: &[u8],
) -> CryptoResult<Zeroizing<Vec<u8>>> {
    if ciphertext.len() < 16 || ciphertext.len() % 8 != 0 {
        return Err(CryptoError::WrapFailure(
            "ciphertext is not a multiple of 8 bytes",
        ));
    }
    check_kek(algo, kek)?;

    match algo {
        SymmetricAlgorithm::Aes128 => unwrap_blocks(&new_cipher::<Aes128>(kek)?, ciphertext),
        SymmetricAlgorithm::Aes192 => unwrap_blocks(&new_cipher::<Aes192>(kek)?, ciphertext),
        SymmetricAlgorithm::Aes256 => unwrap_blocks(&new_cipher::<Aes256>(kek)?, ciphertext),
        SymmetricAlgorithm::Unknown(_) => {
            Err(CryptoError::WrapFailure("unsupported wrap cipher"))
        }
    }
}

fn check_kek(algo: SymmetricAlgorithm, kek: &[u8]) -> CryptoResult<()> {
    if kek.len() != algo.key_size()? {
        return Err(CryptoError::WrapFailure(
            "wrapping key length does not match the cipher",
        ));
    }
    Ok(())
}

fn new_cipher<C: KeyInit>(kek: &[u8]) -> CryptoResult<C> {
    C::new_from_slice(kek).map_err(|_| {
        CryptoError::WrapFailure("wrapping key length does not match the cipher")
    })
}

fn wrap_blocks<C: BlockEncrypt>(cipher: &C, plaintext: &[u8]) -> Vec<u8> {
    let n = plaintext.len() / 8;
    let mut ciphertext = vec![0u8; 8 + plaintext.len()];
    ciphertext[8..].copy_from_slice(plaintext);

    // A = IV; R[i] = P[i]; six rounds of B = AES(K, A | R[i]),
    // A = MSB(B) ^ t, R[i] = LSB(B).
    let mut a = KEY_WRAP_IV;
    let mut block = Block::<C>::default();
    for j in 0..6 {
        for i in 0..n {
            let r = &mut ciphertext[8..];
            let buf = block.as_mut_slice();
            buf[..8].copy_from_slice(&a.to_be_bytes());
            buf[8..].copy_from_slice(&r[8 * i..8 * (i + 1)]);
            cipher.encrypt_block(&mut block);
            a = read_be_u64(&block.as_slice()[..8]) ^ ((n * j + i + 1) as u64);
            r[8 * i..8 * (i + 1)].copy_from_slice(&block.as_slice()[8..]);
        }
    }

    ciphertext[..8].copy_from_slice(&a.to_be_bytes());
    ciphertext
}

fn unwrap_blocks<C: BlockDecrypt>(
    cipher: &C,
    ciphertext: &[u8],
) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let n = ciphertext.len() / 8 - 1;
    let mut plaintext = Zeroizing::new(ciphertext[8..].to_vec());

    // Inverse rounds; A must come back to the IV.
    let mut a = read_be_u64(&ciphertext[..8]);
    let mut block = Block::<C>::default();
    for j in (0..6).rev() {
        for i in (0..n).rev() {
            let buf = block.as_mut_slice();
            buf[..8].copy_from_slice(&(a ^ ((n * j + i + 1) as u64)).to_be_bytes());
            buf[8..].copy_from_slice(&plaintext[8 * i..8 * (i + 1)]);
            cipher.decrypt_block(&mut block);
            a = read_be_u64(&block.as_slice()[..8]);
            plaintext[8 * i..8 * (i + 1)].copy_from_slice(&block.as_slice()[8..]);
        }
    }

    if a == KEY_WRAP_IV {
        Ok(plaintext)
    } else {
        Err(CryptoError::WrapFailure("integrity check value mismatch"))
    }
}

fn read_be_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_be_bytes(buf)
}
