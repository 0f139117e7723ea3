//! Cryptographic operations for the codec.
//!
//! This module provides:
//! - Keccak256 hashing (Ethereum's hash function)
//! - A local secp256k1 [`HashSigner`] (feature `signer`)
//! - Sender address recovery (feature `signer`)
//!
//! # Security
//!
//! - Signing uses RFC 6979 deterministic nonces and low-S normalization (k256)
//! - Secret key material is zeroized on drop

use tiny_keccak::{Hasher as KeccakHasher, Keccak};
use txcodec_common::B256;

#[cfg(feature = "signer")]
pub use signer::{public_key_to_address, recover_address, CryptoError, LocalSigner};

// =============================================================================
// Keccak256
// =============================================================================

/// Keccak256 hash function as used by Ethereum.
pub fn keccak256(data: &[u8]) -> B256 {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    B256::new(output)
}

// =============================================================================
// Signing
// =============================================================================

#[cfg(feature = "signer")]
mod signer {
    use core::fmt;

    use k256::{
        ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey},
        elliptic_curve::sec1::ToEncodedPoint,
        PublicKey,
    };
    use thiserror::Error;
    use txcodec_common::{Address, CodecError, Signature, B256, U256};
    use zeroize::Zeroizing;

    use super::keccak256;
    use crate::signature::HashSigner;

    /// Signing and recovery errors.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum CryptoError {
        #[error("Invalid private key")]
        InvalidKey,

        #[error("Signing failed")]
        SigningFailed,

        #[error("Invalid signature")]
        InvalidSignature,

        #[error("Public key recovery failed")]
        RecoveryFailed,

        #[error("Transaction is not signed")]
        MissingSignature,

        #[error(transparent)]
        Codec(#[from] CodecError),
    }

    /// A secp256k1 key held in memory.
    #[derive(Clone)]
    pub struct LocalSigner {
        key: SigningKey,
    }

    impl LocalSigner {
        /// Creates a signer from a 32-byte secret.
        pub fn from_bytes(secret: &[u8]) -> Result<Self, CryptoError> {
            let key = SigningKey::from_slice(secret).map_err(|_| CryptoError::InvalidKey)?;
            Ok(Self { key })
        }

        /// Creates a signer from a hex secret, with or without `0x`.
        pub fn from_hex(secret: &str) -> Result<Self, CryptoError> {
            let secret = secret.strip_prefix("0x").unwrap_or(secret);
            let bytes = Zeroizing::new(hex::decode(secret).map_err(|_| CryptoError::InvalidKey)?);
            Self::from_bytes(&bytes)
        }

        /// Address controlled by this key.
        pub fn address(&self) -> Address {
            public_key_to_address(&PublicKey::from(self.key.verifying_key()))
        }
    }

    impl fmt::Debug for LocalSigner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("LocalSigner")
                .field("address", &self.address())
                .finish_non_exhaustive()
        }
    }

    impl HashSigner for LocalSigner {
        type Error = CryptoError;

        fn sign_hash(&self, hash: &B256) -> Result<Signature, CryptoError> {
            let (sig, recid) = self
                .key
                .sign_prehash_recoverable(hash.as_slice())
                .map_err(|_| CryptoError::SigningFailed)?;

            let bytes = sig.to_bytes();
            Ok(Signature {
                r: U256::from_be_slice(&bytes[..32]),
                s: U256::from_be_slice(&bytes[32..]),
                y_parity: u8::from(recid.is_y_odd()),
            })
        }
    }

    /// Ethereum address of a public key.
    ///
    /// Address = keccak256(pubkey[1..])[12..32]
    /// (Skip the 0x04 prefix of uncompressed key, take last 20 bytes of hash)
    pub fn public_key_to_address(pubkey: &PublicKey) -> Address {
        let encoded = pubkey.to_encoded_point(false);
        let hash = keccak256(&encoded.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }

    /// Recovers the address that produced `signature` over `hash`.
    pub fn recover_address(hash: &B256, signature: &Signature) -> Result<Address, CryptoError> {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&signature.r.to_be_bytes::<32>());
        bytes[32..].copy_from_slice(&signature.s.to_be_bytes::<32>());

        let sig = K256Signature::from_slice(&bytes).map_err(|_| CryptoError::InvalidSignature)?;
        let recid = RecoveryId::from_byte(signature.y_parity).ok_or(CryptoError::InvalidSignature)?;

        let key = VerifyingKey::recover_from_prehash(hash.as_slice(), &sig, recid)
            .map_err(|_| CryptoError::RecoveryFailed)?;
        Ok(public_key_to_address(&PublicKey::from(&key)))
    }
}
