// Runtime configuration
// Defaults, then an optional JSON file, then RSA_FILE_* environment variables

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::rsa::KEY_ROUNDS;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RsaConfig {
    /// Bit width of each prime
    pub prime_bits: u64,

    /// Miller-Rabin rounds per candidate
    pub rounds: u32,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            prime_bits: 512,
            rounds: KEY_ROUNDS,
        }
    }
}

impl RsaConfig {
    pub const ENV_PREFIX: &'static str = "RSA_FILE";

    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(f) = file {
            builder = builder.add_source(File::from(f).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
            .build()?;

        let mut cfg: RsaConfig = config.try_deserialize()?;
        cfg.rounds = cfg.rounds.max(1);

        log::trace!("{:?}", cfg);

        Ok(cfg)
    }

    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds.max(1);
        self
    }
}
