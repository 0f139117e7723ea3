//! Signing payloads and signature attachment.
//!
//! The signing hash is keccak256 over the unsigned serialization:
//! - Typed: `tag || rlp([fields...])`
//! - Legacy pre-EIP-155: `rlp([fields...])`
//! - Legacy EIP-155: `rlp([fields..., chainId, "", ""])`
//!
//! Blob sidecars never take part in the signing payload. The actual ECDSA
//! arithmetic lives behind [`HashSigner`].

use thiserror::Error;
use txcodec_common::{CodecError, Signature, Transaction, B256, U256};

use crate::crypto::keccak256;
use crate::registry::{Registry, SignatureScheme};
use crate::rlp::RlpItem;
use crate::serialize::{self, serialize_transaction};

/// Anything that can produce a recoverable signature over a 32-byte hash.
pub trait HashSigner {
    type Error;

    fn sign_hash(&self, hash: &B256) -> Result<Signature, Self::Error>;
}

/// Failure while signing a transaction.
#[derive(Debug, Error)]
pub enum SignTransactionError<E> {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Signer failed: {0}")]
    Signer(E),
}

/// Returns the bytes a signature over `tx` is computed on.
pub fn signing_payload(registry: &Registry, tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    let variant = registry.resolve(tx.tx_type)?;
    if variant.signature == SignatureScheme::Unsigned {
        return Err(CodecError::invalid_field(
            variant.name,
            "signature",
            "variant does not carry a signature",
        ));
    }
    let fields = serialize::encode_fields(variant, tx, None)?;
    Ok(serialize::envelope(variant, &RlpItem::List(fields)))
}

/// Keccak256 of the signing payload.
pub fn signing_hash(registry: &Registry, tx: &Transaction) -> Result<B256, CodecError> {
    Ok(keccak256(&signing_payload(registry, tx)?))
}

/// Transaction identifier: keccak256 of the signed serialization.
pub fn transaction_hash(serialized: &[u8]) -> B256 {
    keccak256(serialized)
}

/// Signs `tx` with `signer` and returns the signed serialization.
pub fn sign_transaction<S: HashSigner>(
    registry: &Registry,
    tx: &Transaction,
    signer: &S,
) -> Result<Vec<u8>, SignTransactionError<S::Error>> {
    let hash = signing_hash(registry, tx)?;
    let signature = signer
        .sign_hash(&hash)
        .map_err(SignTransactionError::Signer)?;
    Ok(serialize_transaction(registry, tx, Some(&signature))?)
}

// =============================================================================
// V Value Computation
// =============================================================================

/// Legacy `v` for a recovery parity.
///
/// - With chain ID (EIP-155): v = chain_id * 2 + 35 + y_parity
/// - Without chain ID: v = 27 + y_parity
pub fn legacy_v(y_parity: u8, chain_id: Option<u64>) -> U256 {
    let y = U256::from(y_parity);
    match chain_id {
        Some(chain_id) => U256::from(chain_id) * U256::from(2u8) + U256::from(35u8) + y,
        None => U256::from(27u8) + y,
    }
}

/// Splits a legacy `v` into recovery parity and chain ID.
///
/// Returns `None` for values that are neither 27/28 nor EIP-155 encoded,
/// and for chain IDs that do not fit in 64 bits.
pub fn split_legacy_v(v: U256) -> Option<(u8, Option<u64>)> {
    if v == U256::from(27u8) {
        return Some((0, None));
    }
    if v == U256::from(28u8) {
        return Some((1, None));
    }
    if v < U256::from(35u8) {
        return None;
    }
    let x = v - U256::from(35u8);
    let y = u8::from(x.bit(0));
    let chain_id = u64::try_from(x >> 1usize).ok()?;
    Some((y, Some(chain_id)))
}
