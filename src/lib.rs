//! Reversible credential string encoding for config files.
//!
//! Turns a username/password pair into a non-plaintext token that can sit in
//! a config file, and back. Keys are derived from a local master seed, a
//! per-string random salt, and a signer identity (the OS user by default).
//! This is obfuscation for small automation setups, not cryptographic
//! security: anyone holding the master seed and signer can decode.

mod config;
mod crypto;
mod error;
mod seed;

pub use crate::config::Config;
pub use crate::crypto::{decode, derive_key, encode, generate_salt};
pub use crate::error::CredError;
pub use crate::seed::{SEED_LEN, default_seed_path};

use std::path::PathBuf;
use tracing::debug;
use zeroize::Zeroizing;

/// Returns the default signer identity: the current OS user.
///
/// The signer is never embedded in a credential string; encode and decode
/// sides must agree on it out-of-band.
pub fn default_signer() -> String {
    whoami::username()
}

/// Stateful façade over the encode/decode engine.
///
/// Holds only the encoded credential string; username and password are
/// re-decoded from it on every access rather than kept resident in memory.
pub struct CredParser {
    credentials: String,
    signer: String,
    seed_path: Option<PathBuf>,
    config: Config,
}

#[derive(Default)]
pub struct CredParserBuilder {
    username: Option<String>,
    password: Option<String>,
    credentials: Option<String>,
    signer: Option<String>,
    seed_path: Option<PathBuf>,
    config: Option<Config>,
}

impl CredParserBuilder {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    pub fn signer(mut self, signer: impl Into<String>) -> Self {
        self.signer = Some(signer.into());
        self
    }

    pub fn seed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_path = Some(path.into());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the parser.
    ///
    /// A username/password pair is encoded immediately and the resulting
    /// string cached; regenerating it later would draw a new salt and
    /// silently change the output. An existing credential string is stored
    /// verbatim with no cryptographic work until a field is read.
    ///
    /// # Errors
    ///
    /// `Usage` if only one of username/password is given, if a pair and a
    /// credential string are given at once, or if neither form is given.
    /// `Encode` if seed resolution or any encode stage fails.
    pub fn build(self) -> Result<CredParser, CredError> {
        if self.username.is_some() != self.password.is_some() {
            return Err(CredError::Usage(
                "username and password must be set together".to_string(),
            ));
        }
        if self.username.is_some() && self.credentials.is_some() {
            return Err(CredError::Usage(
                "cannot set username and password together with a credential string".to_string(),
            ));
        }

        let config = self.config.unwrap_or_default();
        let signer = self.signer.unwrap_or_else(default_signer);

        let credentials = match (self.username, self.password, self.credentials) {
            (Some(username), Some(password), None) => {
                let seed = seed::resolve(self.seed_path.as_deref())
                    .map_err(|e| CredError::Encode(format!("unable to resolve master seed: {e}")))?;
                let creds = crypto::encode(&seed, &username, &password, &signer, &config)?;
                debug!("generated credential string from username/password");
                creds
            }
            (None, None, Some(credentials)) => {
                debug!("initialized with existing credential string");
                credentials
            }
            _ => {
                return Err(CredError::Usage(
                    "either a username/password pair or a credential string is required"
                        .to_string(),
                ));
            }
        };

        Ok(CredParser {
            credentials,
            signer,
            seed_path: self.seed_path,
            config,
        })
    }
}

impl CredParser {
    pub fn builder() -> CredParserBuilder {
        CredParserBuilder::default()
    }

    /// Encodes a pair under the default signer, seed path, and config.
    pub fn from_pair(username: &str, password: &str) -> Result<Self, CredError> {
        Self::builder().username(username).password(password).build()
    }

    /// Wraps an existing credential string under the default signer, seed
    /// path, and config.
    pub fn from_credentials(credentials: &str) -> Result<Self, CredError> {
        Self::builder().credentials(credentials).build()
    }

    /// The cached credential string. Always present, never regenerated.
    pub fn credentials(&self) -> &str {
        &self.credentials
    }

    pub fn signer(&self) -> &str {
        &self.signer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decodes the cached string and returns the username.
    ///
    /// Re-runs the full seed/derive/decode pipeline on every access; the
    /// plaintext is never stored on the parser.
    ///
    /// # Errors
    ///
    /// `Decode` on a malformed string, wrong seed, or wrong signer.
    pub fn username(&self) -> Result<String, CredError> {
        Ok(self.decode_fields()?.0)
    }

    /// Decodes the cached string and returns the password.
    ///
    /// Same access semantics as [`username`](Self::username); the returned
    /// buffer zeroes itself on drop.
    pub fn password(&self) -> Result<Zeroizing<String>, CredError> {
        Ok(self.decode_fields()?.1)
    }

    /// Replaces the cached string with an existing one. No decoding happens
    /// until a field is next read.
    pub fn load(&mut self, credentials: impl Into<String>) {
        self.credentials = credentials.into();
        debug!("loaded replacement credential string");
    }

    /// Re-encodes from a new pair, drawing a fresh salt and discarding the
    /// prior string. Passing a signer replaces the stored one.
    pub fn reset(
        &mut self,
        username: &str,
        password: &str,
        signer: Option<&str>,
    ) -> Result<(), CredError> {
        if let Some(signer) = signer {
            self.signer = signer.to_string();
        }
        let seed = seed::resolve(self.seed_path.as_deref())
            .map_err(|e| CredError::Encode(format!("unable to resolve master seed: {e}")))?;
        self.credentials = crypto::encode(&seed, username, password, &self.signer, &self.config)?;
        debug!("reset credentials from new username/password pair");
        Ok(())
    }

    fn decode_fields(&self) -> Result<(String, Zeroizing<String>), CredError> {
        let seed = seed::resolve(self.seed_path.as_deref())
            .map_err(|e| CredError::Decode(format!("unable to resolve master seed: {e}")))?;
        crypto::decode(&seed, &self.credentials, &self.signer, &self.config)
    }
}
