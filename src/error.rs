use std::fmt;

#[derive(Debug)]
pub enum CredError {
    /// Invalid combination of constructor arguments.
    Usage(String),
    /// Username or password is not ASCII or exceeds 255 bytes.
    InvalidData(String),
    /// A configuration invariant was violated.
    Config(String),
    /// Encoding failed, typically an unreadable or uncreatable seed file.
    Encode(String),
    /// Credential string could not be decoded: malformed input, wrong seed,
    /// or wrong signer.
    Decode(String),
}

impl fmt::Display for CredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredError::Usage(msg) => write!(f, "usage error: {msg}"),
            CredError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            CredError::Config(msg) => write!(f, "config error: {msg}"),
            CredError::Encode(msg) => write!(f, "encode failure: {msg}"),
            CredError::Decode(msg) => write!(f, "decode failure: {msg}"),
        }
    }
}

impl std::error::Error for CredError {}
