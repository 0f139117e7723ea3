//! Ethereum Transaction Codec
//!
//! Serializes and parses Ethereum-family transactions to and from their
//! canonical wire form, and computes the hashes they are signed over.
//!
//! # Architecture
//!
//! Leaves first:
//! 1. [`rlp`]: Recursive Length Prefix encoding and decoding
//! 2. [`fields`] and [`registry`]: the field model and the table of
//!    transaction variants, keyed by type tag
//! 3. [`serialize`] and [`parse`]: variant-agnostic codec driven by the registry
//! 4. [`signature`] and [`crypto`]: signing payloads, keccak256, ECDSA
//! 5. [`TxCodec`]: facade bundling a registry and a decode policy
//!
//! Chain-specific variants (OP stack deposits, Celo fee currency, zkSync
//! EIP-712) live in [`chains`] and are added by registering their
//! descriptors.
//!
//! # Security
//!
//! - Parsed input is untrusted: sizes and nesting depth are bounded, fixed
//!   width fields are checked, and errors never fall back to defaults
//! - Signing keys never leave [`crypto::LocalSigner`]
//! - Fail closed on any ambiguity
//!
//! # Docs consulted
//!
//! - Ethereum Yellow Paper, Appendix B: RLP
//! - EIP-155, EIP-2718, EIP-2930, EIP-1559, EIP-4844, EIP-7702
//! - OP stack deposit transaction spec, Celo CIP-42 and CIP-64
//! - zkSync Era EIP-712 transaction format

pub mod chains;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod fields;
pub mod parse;
pub mod registry;
pub mod rlp;
pub mod serialize;
pub mod signature;

pub use codec::{from_hex, to_hex, TxCodec};
pub use config::DecodeConfig;
pub use parse::{ParsedTransaction, TransactionParser};
pub use registry::{Registry, SignatureScheme, VariantDescriptor};
pub use rlp::RlpItem;
pub use serialize::serialize_transaction;
pub use signature::{
    sign_transaction, signing_hash, signing_payload, transaction_hash, HashSigner,
    SignTransactionError,
};

#[cfg(feature = "signer")]
pub use crypto::{CryptoError, LocalSigner};

pub use txcodec_common::{
    AccessListItem, Address, BlobSidecar, Bytes, CodecError, PaymasterParams, RlpError,
    Signature, SignedAuthorization, Transaction, TxType, B256, U256,
};
