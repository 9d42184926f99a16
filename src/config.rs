use crate::error::CredError;

pub const DEFAULT_SALT_LEN: usize = 12;
pub const DEFAULT_MIN_HASH_ROUNDS: u32 = 3;
pub const DEFAULT_MAX_HASH_ROUNDS: u32 = 24;

/// Tunable encoding parameters, validated once and passed by value into
/// every encode/decode call.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    salt_len: usize,
    min_hash_rounds: u32,
    max_hash_rounds: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            salt_len: DEFAULT_SALT_LEN,
            min_hash_rounds: DEFAULT_MIN_HASH_ROUNDS,
            max_hash_rounds: DEFAULT_MAX_HASH_ROUNDS,
        }
    }
}

impl Config {
    pub fn new(
        salt_len: usize,
        min_hash_rounds: u32,
        max_hash_rounds: u32,
    ) -> Result<Self, CredError> {
        let config = Self {
            salt_len,
            min_hash_rounds,
            max_hash_rounds,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }

    pub fn min_hash_rounds(&self) -> u32 {
        self.min_hash_rounds
    }

    pub fn max_hash_rounds(&self) -> u32 {
        self.max_hash_rounds
    }

    pub fn validate(&self) -> Result<(), CredError> {
        if self.salt_len < 8 {
            return Err(CredError::Config(format!(
                "salt length must be >= 8: {}",
                self.salt_len
            )));
        }
        if self.min_hash_rounds < 1 {
            return Err(CredError::Config(format!(
                "minimum hash rounds must be >= 1: {}",
                self.min_hash_rounds
            )));
        }
        if self.max_hash_rounds < self.min_hash_rounds {
            return Err(CredError::Config(format!(
                "maximum hash rounds must be >= minimum: {} < {}",
                self.max_hash_rounds, self.min_hash_rounds
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.salt_len(), 12);
        assert_eq!(config.min_hash_rounds(), 3);
        assert_eq!(config.max_hash_rounds(), 24);
    }

    #[test]
    fn short_salt_fails() {
        match Config::new(7, 3, 24) {
            Err(CredError::Config(_)) => {}
            other => panic!("expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn zero_min_rounds_fails() {
        assert!(Config::new(12, 0, 24).is_err());
    }

    #[test]
    fn inverted_round_bounds_fail() {
        match Config::new(12, 5, 3) {
            Err(CredError::Config(_)) => {}
            other => panic!("expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn equal_round_bounds_are_valid() {
        assert!(Config::new(12, 5, 5).is_ok());
    }
}
