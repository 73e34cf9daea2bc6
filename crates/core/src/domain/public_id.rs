//! Opaque external identifiers shared by every catalog entity.

use rand::Rng;

use crate::errors::DomainError;

pub const PUBLIC_ID_LENGTH: usize = 8;

const ALPHABET: &[u8; 16] = b"0123456789abcdef";

/// Generates a fresh lowercase hex token of `PUBLIC_ID_LENGTH` characters.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..PUBLIC_ID_LENGTH).map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())])).collect()
}

/// Keeps a provided token or generates one when the caller left it blank.
pub fn resolve(candidate: Option<String>) -> String {
    match candidate {
        Some(value) if !value.is_empty() => value,
        _ => generate(),
    }
}

pub fn validate(value: &str) -> Result<(), DomainError> {
    if value.chars().count() != PUBLIC_ID_LENGTH {
        return Err(DomainError::validation("PublicID must be exactly 8 characters long"));
    }
    Ok(())
}
