//! BLS verification, digest derivation, and draw selection.

use std::fmt;

use blst::BLST_ERROR;
use blst::min_pk::{PublicKey, Signature};
use sha2::{Digest, Sha256};

use crate::error::{BeaconError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Length of a compressed G1 public key (min-pk variant).
pub const PUBLIC_KEY_LEN: usize = 48;

/// Length of a compressed G2 signature (min-pk variant).
pub const SIGNATURE_LEN: usize = 96;

/// Length of the digest produced by [`derive_randomness`].
pub const DIGEST_LEN: usize = 32;

/// Minimum randomness length accepted by [`select`].
pub const SELECTOR_INPUT_LEN: usize = 16;

/// Domain separation tag for the basic min-pk BLS ciphersuite.
///
/// This is the suite the beacon signs under; changing it invalidates
/// every published signature.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

// ═══════════════════════════════════════════════════════════════════════════════
// VERIFIER
// ═══════════════════════════════════════════════════════════════════════════════

/// Verifies beacon signatures under a fixed deployment public key.
///
/// The key is validated (subgroup-checked) once at construction, so
/// [`verify`](Self::verify) only pays the per-signature pairing cost.
#[derive(Clone)]
pub struct BeaconVerifier {
    /// Validated G1 public key.
    public_key: PublicKey,
    /// Raw compressed bytes, kept for rendering.
    key_bytes: [u8; PUBLIC_KEY_LEN],
}

impl BeaconVerifier {
    /// Create a verifier from a compressed 48-byte G1 public key.
    ///
    /// # Errors
    /// Returns [`BeaconError::InvalidPublicKey`] if the bytes are not a
    /// valid point in the G1 subgroup.
    pub fn new(public_key: &[u8]) -> Result<Self> {
        let key_bytes: [u8; PUBLIC_KEY_LEN] = public_key
            .try_into()
            .map_err(|_| BeaconError::InvalidPublicKey)?;
        let public_key =
            PublicKey::key_validate(&key_bytes).map_err(|_| BeaconError::InvalidPublicKey)?;
        Ok(Self {
            public_key,
            key_bytes,
        })
    }

    /// Create a verifier from a hex-encoded public key (with or without
    /// a 0x prefix).
    ///
    /// # Errors
    /// Returns [`BeaconError::InvalidPublicKey`] if the string is not
    /// valid hex or not a valid key.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| BeaconError::InvalidPublicKey)?;
        Self::new(&bytes)
    }

    /// The compressed public key bytes this verifier checks against.
    #[must_use]
    pub const fn public_key_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.key_bytes
    }

    /// Verify that `sig` signs `SHA-256(seed)` under the beacon key.
    ///
    /// Malformed and forged signatures are indistinguishable to callers;
    /// both fail with the single proof-rejection kind.
    ///
    /// # Errors
    /// Returns [`BeaconError::InvalidProof`] if the signature does not
    /// verify.
    pub fn verify(&self, sig: &[u8], seed: &[u8]) -> Result<()> {
        let signature = Signature::from_bytes(sig).map_err(|_| BeaconError::InvalidProof)?;
        let message = Sha256::digest(seed);

        match signature.verify(true, message.as_slice(), DST, &[], &self.public_key, false) {
            BLST_ERROR::BLST_SUCCESS => Ok(()),
            _ => Err(BeaconError::InvalidProof),
        }
    }
}

impl fmt::Debug for BeaconVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeaconVerifier({})", hex::encode(self.key_bytes))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DERIVATION & SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Derive a 32-byte uniform digest from a verified signature and a
/// binding timestamp.
///
/// Computes `SHA-256(sig || be64(timestamp_ms))`. The timestamp is
/// serialized as 8 big-endian bytes, so replaying the same signature
/// against a different instant yields a different digest. Callers pick
/// the instant deliberately; the engine binds it to a round's committed
/// closing time so the draw cannot vary across settlement attempts.
#[must_use]
pub fn derive_randomness(sig: &[u8], timestamp_ms: u64) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(sig);
    hasher.update(timestamp_ms.to_be_bytes());
    hasher.finalize().into()
}

/// Reduce a uniform randomness buffer to a slot in `[0, n)`.
///
/// Interprets the first 16 bytes of `rnd` as a big-endian unsigned
/// 128-bit integer and returns it modulo `n`. For `n ≤ 2^64` the modular
/// bias is bounded by 2^-64, negligible for wheel-sized moduli.
///
/// # Errors
/// Returns [`BeaconError::InvalidRndLength`] if `rnd` is shorter than 16
/// bytes, and [`BeaconError::ZeroModulus`] if `n == 0`.
pub fn select(n: u8, rnd: &[u8]) -> Result<u8> {
    if n == 0 {
        return Err(BeaconError::ZeroModulus);
    }
    let Some(head) = rnd.get(..SELECTOR_INPUT_LEN) else {
        return Err(BeaconError::InvalidRndLength { len: rnd.len() });
    };
    let mut buf = [0u8; SELECTOR_INPUT_LEN];
    buf.copy_from_slice(head);
    let m = u128::from_be_bytes(buf);

    #[allow(clippy::cast_possible_truncation)] // m % n < n <= u8::MAX
    let slot = (m % u128::from(n)) as u8;
    Ok(slot)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::testing::BeaconSigner;

    const IKM: [u8; 32] = [7u8; 32];
    const SEED: [u8; 32] = hex!("0000000000000000000000000000000000000000000000000000000000000123");

    fn signer() -> BeaconSigner {
        BeaconSigner::from_ikm(&IKM).unwrap()
    }

    mod verifier_tests {
        use super::*;

        #[test]
        fn accepts_valid_signature() {
            let signer = signer();
            let sig = signer.sign_seed(&SEED);
            let verifier = BeaconVerifier::new(&signer.public_key_bytes()).unwrap();
            assert!(verifier.verify(&sig, &SEED).is_ok());
        }

        #[test]
        fn rejects_flipped_bit() {
            let signer = signer();
            let mut sig = signer.sign_seed(&SEED);
            sig[0] ^= 0x10;
            let verifier = BeaconVerifier::new(&signer.public_key_bytes()).unwrap();
            assert_eq!(
                verifier.verify(&sig, &SEED),
                Err(BeaconError::InvalidProof)
            );
        }

        #[test]
        fn rejects_wrong_seed() {
            let signer = signer();
            let sig = signer.sign_seed(&SEED);
            let verifier = BeaconVerifier::new(&signer.public_key_bytes()).unwrap();
            assert_eq!(
                verifier.verify(&sig, b"some other seed"),
                Err(BeaconError::InvalidProof)
            );
        }

        #[test]
        fn rejects_garbage_signature() {
            let signer = signer();
            let verifier = BeaconVerifier::new(&signer.public_key_bytes()).unwrap();
            assert_eq!(
                verifier.verify(&[0xAB; SIGNATURE_LEN], &SEED),
                Err(BeaconError::InvalidProof)
            );
        }

        #[test]
        fn rejects_truncated_signature() {
            let signer = signer();
            let sig = signer.sign_seed(&SEED);
            let verifier = BeaconVerifier::new(&signer.public_key_bytes()).unwrap();
            assert_eq!(
                verifier.verify(&sig[..SIGNATURE_LEN - 1], &SEED),
                Err(BeaconError::InvalidProof)
            );
        }

        #[test]
        fn rejects_wrong_length_key() {
            assert_eq!(
                BeaconVerifier::new(&[1u8; 20]).unwrap_err(),
                BeaconError::InvalidPublicKey
            );
        }

        #[test]
        fn rejects_non_curve_key() {
            assert_eq!(
                BeaconVerifier::new(&[0xFF; PUBLIC_KEY_LEN]).unwrap_err(),
                BeaconError::InvalidPublicKey
            );
        }

        #[test]
        fn from_hex_roundtrip() {
            let signer = signer();
            let key = signer.public_key_bytes();
            let with_prefix = format!("0x{}", hex::encode(key));
            let verifier = BeaconVerifier::from_hex(&with_prefix).unwrap();
            assert_eq!(verifier.public_key_bytes(), &key);
        }
    }

    mod derive_tests {
        use super::*;

        #[test]
        fn deterministic() {
            let digest_a = derive_randomness(&[1, 2, 3], 42);
            let digest_b = derive_randomness(&[1, 2, 3], 42);
            assert_eq!(digest_a, digest_b);
        }

        #[test]
        fn timestamp_changes_digest() {
            let digest_a = derive_randomness(&[1, 2, 3], 42);
            let digest_b = derive_randomness(&[1, 2, 3], 43);
            assert_ne!(digest_a, digest_b);
        }

        #[test]
        fn signature_changes_digest() {
            let digest_a = derive_randomness(&[1, 2, 3], 42);
            let digest_b = derive_randomness(&[1, 2, 4], 42);
            assert_ne!(digest_a, digest_b);
        }

        #[test]
        fn timestamp_is_big_endian() {
            // Manually recompute with an explicit big-endian suffix.
            let mut hasher = Sha256::new();
            hasher.update([9u8; 4]);
            hasher.update([0, 0, 0, 0, 0, 0, 0x01, 0x02]);
            let expected: [u8; 32] = hasher.finalize().into();
            assert_eq!(derive_randomness(&[9u8; 4], 0x0102), expected);
        }
    }

    mod select_tests {
        use super::*;

        #[test]
        fn reads_first_sixteen_bytes_big_endian() {
            let mut rnd = [0u8; 32];
            rnd[15] = 39; // low byte of the u128 window
            assert_eq!(select(38, &rnd).unwrap(), 1);
        }

        #[test]
        fn trailing_bytes_are_ignored() {
            let mut rnd = [0u8; 32];
            rnd[15] = 5;
            rnd[16] = 0xFF;
            assert_eq!(select(38, &rnd).unwrap(), 5);
        }

        #[test]
        fn always_below_modulus() {
            let rnd = [0xFF; 16];
            assert!(select(38, &rnd).unwrap() < 38);
        }

        #[test]
        fn modulus_one_always_zero() {
            assert_eq!(select(1, &[0xAB; 16]).unwrap(), 0);
        }

        #[test]
        fn rejects_short_input() {
            assert_eq!(
                select(38, &[0u8; 15]),
                Err(BeaconError::InvalidRndLength { len: 15 })
            );
        }

        #[test]
        fn rejects_zero_modulus() {
            assert_eq!(select(0, &[0u8; 16]), Err(BeaconError::ZeroModulus));
        }

        #[test]
        fn exactly_sixteen_bytes_accepted() {
            assert!(select(38, &[0u8; 16]).is_ok());
        }
    }
}
