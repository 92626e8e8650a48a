//! Symmetric encryption of token claims.
//!
//! Values are encrypted with AES-256-CBC under a key derived from the JWT secret. Each
//! ciphertext carries its own random IV as a 16 byte prefix and the whole value is encoded as
//! URL-safe base64 without padding.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use openssl::{
    hash::{hash, MessageDigest},
    rand::rand_bytes,
    symm::{self, Cipher},
};

use crate::server::error::Error;

const IV_LEN: usize = 16;

fn derive_key(secret: &str) -> Result<Vec<u8>, Error> {
    Ok(hash(MessageDigest::sha256(), secret.as_bytes())?.to_vec())
}

pub fn encrypt(secret: &str, plaintext: &str) -> Result<String, Error> {
    let key = derive_key(secret)?;

    let mut iv = [0u8; IV_LEN];
    rand_bytes(&mut iv)?;

    let ciphertext = symm::encrypt(Cipher::aes_256_cbc(), &key, Some(&iv), plaintext.as_bytes())?;

    let mut payload = Vec::with_capacity(IV_LEN + ciphertext.len());
    payload.extend_from_slice(&iv);
    payload.extend_from_slice(&ciphertext);

    Ok(URL_SAFE_NO_PAD.encode(payload))
}

pub fn decrypt(secret: &str, ciphertext: &str) -> Result<String, Error> {
    let payload = URL_SAFE_NO_PAD
        .decode(ciphertext)
        .map_err(|e| Error::ParseError(e.to_string()))?;

    if payload.len() <= IV_LEN {
        return Err(Error::ParseError("ciphertext is too short".to_string()));
    }

    let key = derive_key(secret)?;
    let (iv, data) = payload.split_at(IV_LEN);
    let plaintext = symm::decrypt(Cipher::aes_256_cbc(), &key, Some(iv), data)?;

    String::from_utf8(plaintext).map_err(|e| Error::ParseError(e.to_string()))
}

/// Base64 encoding used for the non-secret claims (email, login uuid)
pub fn encode_claim(value: &str) -> String {
    STANDARD.encode(value)
}

pub fn decode_claim(value: &str) -> Result<String, Error> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| Error::ParseError(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| Error::ParseError(e.to_string()))
}
