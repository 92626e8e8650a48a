use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::seq::{IndexedRandom, SliceRandom};

use crate::server::error::Error;

const SPECIAL: &[u8] = b"!@#$%&*";
const DIGITS: &[u8] = b"0123456789";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Length of passwords generated on reset
pub const GENERATED_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| Error::InternalError(e.to_string()))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::InternalError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Returns `false` for a mismatch as well as for an unparsable hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Generates a random password with at least one special character, digit, upper case and
/// lower case letter.
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::rng();
    let sets = [SPECIAL, DIGITS, UPPER, LOWER];

    let mut chars: Vec<u8> = sets
        .iter()
        .filter_map(|set| set.choose(&mut rng).copied())
        .collect();

    let all = sets.concat();
    while chars.len() < length {
        if let Some(c) = all.choose(&mut rng) {
            chars.push(*c);
        }
    }

    chars.shuffle(&mut rng);
    chars.into_iter().map(char::from).collect()
}
