//! Base64 envelope around the salt header and cipher bytes.
//!
//! Wire format: `base64(SALT (salt_len) | CIPHER)`. The salt rides along
//! unencrypted as a positional header; its alphabet overlaps base64 so the
//! decoded prefix looks like more of the same.

use crate::error::CredError;
use base64::{Engine, engine::general_purpose::STANDARD};

/// Concatenates salt and cipher bytes and base64-encodes the result.
pub fn render(salt: &[u8], cipher: &[u8]) -> String {
    let mut raw = Vec::with_capacity(salt.len() + cipher.len());
    raw.extend_from_slice(salt);
    raw.extend_from_slice(cipher);
    STANDARD.encode(raw)
}

/// Splits a credential string into `(header_salt, cipher)`.
///
/// # Errors
///
/// `Decode` if the string is not valid base64 or the decoded buffer is too
/// short to carry a salt header.
pub fn parse(credentials: &str, salt_len: usize) -> Result<(Vec<u8>, Vec<u8>), CredError> {
    let raw = STANDARD
        .decode(credentials)
        .map_err(|_| CredError::Decode("credential string is not valid base64".to_string()))?;

    if raw.len() < salt_len {
        return Err(CredError::Decode(
            "credential string too short for salt header".to_string(),
        ));
    }

    Ok((raw[..salt_len].to_vec(), raw[salt_len..].to_vec()))
}
