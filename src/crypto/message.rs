//! Message framing and the reversible byte transform.
//!
//! Plaintext layout:
//! ```text
//! SALT (salt_len) | USERNAME_LEN (1) | USERNAME | ';' (1) | PASSWORD
//! ```
//! The transform reverses the bit order of every byte, then XORs against the
//! derived key cycled to the message length. Untransform applies the exact
//! inverse order.

use crate::error::CredError;
use zeroize::Zeroizing;

/// Separator between username and password fields.
pub const SEPARATOR: u8 = b';';
/// Maximum byte length of a username or password.
pub const MAX_FIELD_LEN: usize = 255;

/// Checks that a field is ASCII and at most 255 bytes.
///
/// Runs before any cryptographic work so bad input never reaches the seed.
pub fn validate(field: &str, name: &str) -> Result<(), CredError> {
    if !field.is_ascii() {
        return Err(CredError::InvalidData(format!(
            "{name} must contain only ASCII characters"
        )));
    }
    if field.len() > MAX_FIELD_LEN {
        return Err(CredError::InvalidData(format!(
            "{name} must be {MAX_FIELD_LEN} bytes or less"
        )));
    }
    Ok(())
}

/// Builds the plaintext message from salt, username, and password.
pub fn frame(salt: &[u8], username: &str, password: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(salt.len() + 2 + username.len() + password.len());
    message.extend_from_slice(salt);
    message.push(username.len() as u8);
    message.extend_from_slice(username.as_bytes());
    message.push(SEPARATOR);
    message.extend_from_slice(password.as_bytes());
    message
}

/// Bit-reverses every byte, then XORs with the key cycled to length.
pub fn transform(plaintext: &[u8], key: &[u8]) -> Vec<u8> {
    plaintext
        .iter()
        .enumerate()
        .map(|(i, &b)| b.reverse_bits() ^ key[i % key.len()])
        .collect()
}

/// Inverse of [`transform`]: XOR first, then bit-reverse.
pub fn untransform(cipher: &[u8], key: &[u8]) -> Vec<u8> {
    cipher
        .iter()
        .enumerate()
        .map(|(i, &b)| (b ^ key[i % key.len()]).reverse_bits())
        .collect()
}

/// Splits a decrypted message back into `(embedded_salt, username, password)`.
///
/// The one-byte username length is authoritative: a claimed length that runs
/// past the buffer is a decode failure, as is a missing separator or any
/// non-ASCII byte in the recovered fields.
pub fn unframe(
    plaintext: &[u8],
    salt_len: usize,
) -> Result<(Vec<u8>, String, Zeroizing<String>), CredError> {
    // salt + length byte + separator is the minimum even for empty fields
    if plaintext.len() < salt_len + 2 {
        return Err(CredError::Decode("message too short".to_string()));
    }

    let embedded_salt = plaintext[..salt_len].to_vec();
    let username_len = plaintext[salt_len] as usize;

    let sep_index = salt_len + 1 + username_len;
    if sep_index >= plaintext.len() {
        return Err(CredError::Decode(
            "username length exceeds message".to_string(),
        ));
    }
    if plaintext[sep_index] != SEPARATOR {
        return Err(CredError::Decode("missing field separator".to_string()));
    }

    let username = ascii_field(&plaintext[salt_len + 1..sep_index])?;
    let password = Zeroizing::new(ascii_field(&plaintext[sep_index + 1..])?);

    Ok((embedded_salt, username, password))
}

/// A wrong key scrambles bytes outside the ASCII range; catching that here
/// turns most decryption failures into clean decode errors.
fn ascii_field(bytes: &[u8]) -> Result<String, CredError> {
    if !bytes.is_ascii() {
        return Err(CredError::Decode(
            "recovered field is not ASCII".to_string(),
        ));
    }
    // ASCII is always valid UTF-8
    Ok(String::from_utf8_lossy(bytes).into_owned())
}
