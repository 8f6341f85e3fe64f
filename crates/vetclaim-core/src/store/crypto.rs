//! Passphrase sealing for profile documents at rest.
//!
//! Layout of a sealed file: `MAGIC | salt (16) | nonce (12) | ciphertext`.
//! The key is derived with Argon2id and the payload is encrypted with
//! ChaCha20-Poly1305, so a wrong passphrase or any tampering fails the tag
//! check and nothing is returned.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::{aead::Aead, ChaCha20Poly1305, Key, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

pub const MAGIC: &[u8; 8] = b"VCSEAL01";
pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

// Argon2id cost: 19 MiB, 2 passes, 1 lane
const ARGON2_MEMORY_KB: u32 = 19456;
const ARGON2_ITERATIONS: u32 = 2;
const ARGON2_PARALLELISM: u32 = 1;

#[derive(Error, Debug)]
pub enum SealError {
    #[error("Not a sealed profile")]
    InvalidFormat,

    #[error("Could not unseal profile (wrong passphrase?)")]
    WrongPassphrase,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed")]
    Encryption,
}

fn derive_key(passphrase: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], SealError> {
    let params = Params::new(ARGON2_MEMORY_KB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, Some(KEY_LEN))
        .map_err(|e| SealError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| SealError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Encrypt `plaintext` under a fresh salt and nonce.
pub fn seal(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, SealError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| SealError::Encryption)?;

    let mut out = Vec::with_capacity(MAGIC.len() + SALT_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

pub fn is_sealed(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC)
}

/// Decrypt a sealed payload. Fails without returning partial data.
pub fn unseal(sealed: &[u8], passphrase: &str) -> Result<Vec<u8>, SealError> {
    let header = MAGIC.len() + SALT_LEN + NONCE_LEN;
    if sealed.len() < header || !is_sealed(sealed) {
        return Err(SealError::InvalidFormat);
    }
    let salt = &sealed[MAGIC.len()..MAGIC.len() + SALT_LEN];
    let nonce = &sealed[MAGIC.len() + SALT_LEN..header];
    let ciphertext = &sealed[header..];

    let key = derive_key(passphrase, salt)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| SealError::WrongPassphrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_round_trip() {
        let sealed = seal(b"{\"id\":\"u-1\"}", "correct horse").expect("seal");
        assert!(is_sealed(&sealed));
        assert_eq!(unseal(&sealed, "correct horse").expect("unseal"), b"{\"id\":\"u-1\"}");
    }

    #[test]
    fn test_wrong_passphrase_fails() {
        let sealed = seal(b"secret", "right").expect("seal");
        assert!(matches!(unseal(&sealed, "wrong"), Err(SealError::WrongPassphrase)));
    }

    #[test]
    fn test_tampering_fails() {
        let mut sealed = seal(b"secret", "pw").expect("seal");
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(unseal(&sealed, "pw"), Err(SealError::WrongPassphrase)));
    }

    #[test]
    fn test_fresh_salt_each_time() {
        let a = seal(b"same", "pw").expect("seal");
        let b = seal(b"same", "pw").expect("seal");
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_plain_json() {
        assert!(matches!(unseal(b"{}", "pw"), Err(SealError::InvalidFormat)));
    }
}
