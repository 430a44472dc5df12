//! Deterministic beacon signer for tests.
//!
//! Real deployments never sign anything; they verify what the beacon
//! network publishes. Tests need the other half: a way to mint valid
//! `(sig, seed)` pairs for a key they control. [`BeaconSigner`] derives a
//! secret key deterministically from caller-supplied key material, so the
//! same IKM always produces the same beacon.

use std::fmt;

use blst::min_pk::SecretKey;
use sha2::{Digest, Sha256};

use crate::error::{BeaconError, Result};
use crate::verify::{BeaconVerifier, DST, PUBLIC_KEY_LEN, SIGNATURE_LEN};

/// Signs round seeds the way the beacon network would.
pub struct BeaconSigner {
    sk: SecretKey,
}

impl BeaconSigner {
    /// Derive a signer from input key material (at least 32 bytes).
    ///
    /// # Errors
    /// Returns [`BeaconError::InvalidKeyMaterial`] if `ikm` is shorter
    /// than the 32 bytes the key-generation procedure requires.
    pub fn from_ikm(ikm: &[u8]) -> Result<Self> {
        let sk = SecretKey::key_gen(ikm, &[]).map_err(|_| BeaconError::InvalidKeyMaterial)?;
        Ok(Self { sk })
    }

    /// The compressed G1 public key matching this signer.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.sk.sk_to_pk().to_bytes()
    }

    /// A verifier configured with this signer's public key.
    ///
    /// # Errors
    /// Never fails in practice; the key comes from a valid secret key.
    pub fn verifier(&self) -> Result<BeaconVerifier> {
        BeaconVerifier::new(&self.public_key_bytes())
    }

    /// Sign `SHA-256(seed)` under the beacon ciphersuite.
    #[must_use]
    pub fn sign_seed(&self, seed: &[u8]) -> [u8; SIGNATURE_LEN] {
        let message = Sha256::digest(seed);
        self.sk.sign(message.as_slice(), DST, &[]).to_bytes()
    }
}

impl fmt::Debug for BeaconSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The secret key never renders.
        write!(f, "BeaconSigner({})", hex::encode(self.public_key_bytes()))
    }
}
