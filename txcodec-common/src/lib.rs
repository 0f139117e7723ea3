//! Common types for the Ethereum transaction codec.
//!
//! This crate provides the value types shared by the codec and its
//! callers: the transaction model, signatures, and the error types the
//! codec reports. All types are serde-serializable so hosts can describe
//! transactions and codec settings as JSON.
//!
//! # Security Note
//!
//! Values built from these types are not validated on construction.
//! Field-level validation happens in the codec when a value is serialized
//! or when bytes are parsed.

pub mod error;
pub mod types;

pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use error::{CodecError, RlpError};
pub use types::*;

/// Maximum encoded transaction size accepted by the parser (2 MiB).
///
/// Large enough for an EIP-4844 network wrapper carrying several blobs.
pub const MAX_TX_SIZE: usize = 2 * 1024 * 1024;

/// Maximum RLP nesting depth accepted by the decoder.
pub const MAX_RLP_DEPTH: usize = 16;
