//! RSA signing key material
//!
//! Key files are read fresh on every signing and verification call - a key
//! rotation takes effect on the next call with no restart required, at the
//! cost of repeated disk reads. Paths are injected at construction time.

use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};

use ats_domain::{Error, Result};

/// PEM-encoded RSA key pair locations
#[derive(Debug, Clone)]
pub struct SigningKeys {
    private_key_path: PathBuf,
    public_key_path: PathBuf,
}

impl SigningKeys {
    /// Create key material bound to the given PEM file paths
    pub fn new(private_key_path: impl Into<PathBuf>, public_key_path: impl Into<PathBuf>) -> Self {
        Self {
            private_key_path: private_key_path.into(),
            public_key_path: public_key_path.into(),
        }
    }

    /// Load the private signing key from disk
    pub fn encoding_key(&self) -> Result<EncodingKey> {
        let pem = read_pem(&self.private_key_path)?;
        EncodingKey::from_rsa_pem(&pem)
            .map_err(|e| Error::key_material_with_source("invalid private key", e))
    }

    /// Load the public verification key from disk
    pub fn decoding_key(&self) -> Result<DecodingKey> {
        let pem = read_pem(&self.public_key_path)?;
        DecodingKey::from_rsa_pem(&pem)
            .map_err(|e| Error::key_material_with_source("invalid public key", e))
    }

    /// Validation accepting only the RSA signature family
    ///
    /// Restricting the accepted algorithms defends against
    /// algorithm-substitution ("none"/HMAC) attacks.
    pub fn rsa_validation() -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];
        validation
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        Error::key_material_with_source(format!("cannot read key file {}", path.display()), e)
    })
}
