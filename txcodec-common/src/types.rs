//! Core types for the transaction codec.
//!
//! A single [`Transaction`] struct carries the union of the fields every
//! supported variant needs. Which fields actually reach the wire, and in
//! which order, is decided by the variant descriptor registered for
//! [`Transaction::tx_type`].

use core::fmt;

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// Transaction Type
// =============================================================================

/// Transaction variant identifier.
///
/// Legacy transactions carry no type byte on the wire. Typed transactions
/// (EIP-2718) start with a tag in `[0x01, 0x7f]`. The numeric form `0`
/// denotes legacy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "u8", into = "u8")]
pub enum TxType {
    /// Untagged legacy transaction.
    #[default]
    Legacy,
    /// EIP-2718 typed transaction with the given tag.
    Typed(u8),
}

impl TxType {
    /// EIP-2930 access list transaction.
    pub const EIP2930: TxType = TxType::Typed(0x01);
    /// EIP-1559 fee market transaction.
    pub const EIP1559: TxType = TxType::Typed(0x02);
    /// EIP-4844 blob-carrying transaction.
    pub const EIP4844: TxType = TxType::Typed(0x03);
    /// EIP-7702 set-code transaction.
    pub const EIP7702: TxType = TxType::Typed(0x04);
    /// zkSync EIP-712 transaction.
    pub const EIP712: TxType = TxType::Typed(0x71);
    /// Celo CIP-64 fee currency transaction.
    pub const CIP64: TxType = TxType::Typed(0x7b);
    /// Celo CIP-42 fee currency transaction.
    pub const CIP42: TxType = TxType::Typed(0x7c);
    /// OP stack deposit transaction.
    pub const DEPOSIT: TxType = TxType::Typed(0x7e);

    /// Returns the wire tag, or `None` for legacy.
    #[inline]
    pub fn tag(self) -> Option<u8> {
        match self {
            TxType::Legacy => None,
            TxType::Typed(tag) => Some(tag),
        }
    }

    /// Returns true for the untagged legacy variant.
    #[inline]
    pub fn is_legacy(self) -> bool {
        matches!(self, TxType::Legacy)
    }
}

impl From<u8> for TxType {
    fn from(value: u8) -> Self {
        match value {
            0 => TxType::Legacy,
            tag => TxType::Typed(tag),
        }
    }
}

impl From<TxType> for u8 {
    fn from(value: TxType) -> Self {
        match value {
            TxType::Legacy => 0,
            TxType::Typed(tag) => tag,
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Legacy => write!(f, "legacy"),
            TxType::Typed(tag) => write!(f, "type 0x{tag:02x}"),
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// An EIP-2930 access list entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    /// Accessed contract.
    pub address: Address,
    /// Storage slots, in declaration order.
    pub storage_keys: Vec<B256>,
}

/// An EIP-7702 authorization tuple.
///
/// Wire order: `[chainId, address, nonce, yParity, r, s]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedAuthorization {
    pub chain_id: u64,
    /// Contract whose code is delegated to.
    pub address: Address,
    pub nonce: u64,
    pub y_parity: u8,
    pub r: U256,
    pub s: U256,
}

/// One blob of an EIP-4844 network wrapper with its KZG commitment and proof.
///
/// All three are carried verbatim; no KZG checks happen here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobSidecar {
    pub blob: Bytes,
    pub commitment: Bytes,
    pub proof: Bytes,
}

/// zkSync paymaster and the input it is called with.
///
/// Wire form: `[paymaster, paymasterInput]`; no paymaster is `[]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterParams {
    pub paymaster: Address,
    pub paymaster_input: Bytes,
}

/// A transaction of any supported variant.
///
/// Fields a variant does not carry are ignored when serializing and left
/// at their defaults when parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    /// Variant of this transaction.
    #[serde(rename = "type")]
    pub tx_type: TxType,
    /// Chain ID. Required for typed variants; optional (EIP-155) for legacy.
    pub chain_id: Option<u64>,
    pub nonce: u64,
    /// Gas limit.
    pub gas: u64,
    /// Gas price (legacy, EIP-2930).
    pub gas_price: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    /// Recipient, `None` for contract creation.
    pub to: Option<Address>,
    /// Value in wei.
    pub value: U256,
    /// Call data, carried verbatim.
    pub data: Bytes,
    pub access_list: Vec<AccessListItem>,

    // EIP-4844
    pub max_fee_per_blob_gas: U256,
    pub blob_versioned_hashes: Vec<B256>,
    /// Network wrapper sidecars. `None` encodes the plain (canonical) form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecars: Option<Vec<BlobSidecar>>,

    // EIP-7702
    pub authorization_list: Vec<SignedAuthorization>,

    // OP stack deposit
    pub source_hash: B256,
    pub from: Address,
    pub mint: U256,
    pub is_system_tx: bool,

    // Celo
    pub fee_currency: Option<Address>,
    pub gateway_fee_recipient: Option<Address>,
    pub gateway_fee: U256,

    // zkSync EIP-712
    pub gas_per_pubdata: U256,
    /// Bytecodes deployed alongside the transaction.
    pub factory_deps: Vec<Bytes>,
    /// Signature carried in the field list; not an ECDSA triple.
    pub custom_signature: Bytes,
    pub paymaster: Option<PaymasterParams>,
}

impl Transaction {
    /// Creates an empty transaction of the given variant.
    pub fn new(tx_type: TxType) -> Self {
        Self {
            tx_type,
            ..Default::default()
        }
    }

    /// Returns true if this is a contract creation.
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// Returns the function selector (first 4 bytes of data) if present.
    pub fn selector(&self) -> Option<[u8; 4]> {
        let mut sel = [0u8; 4];
        sel.copy_from_slice(self.data.get(..4)?);
        Some(sel)
    }
}

// =============================================================================
// Signature
// =============================================================================

/// ECDSA signature components (r, s, yParity).
///
/// The recovery indicator is always kept as a parity bit. Legacy `v`
/// values (27/28 or EIP-155) are derived from it when serializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// R component.
    pub r: U256,
    /// S component.
    pub s: U256,
    /// Recovery parity, 0 or 1.
    pub y_parity: u8,
}

impl Signature {
    pub fn new(r: U256, s: U256, y_parity: u8) -> Self {
        Self { r, s, y_parity }
    }

    /// Returns the signature as a 65-byte array (r || s || yParity).
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        bytes[64] = self.y_parity;
        bytes
    }

    /// Creates a signature from a 65-byte array (r || s || v).
    ///
    /// `v` may be a parity bit or 27/28. Returns `None` for any other `v`;
    /// EIP-155 values carry a chain ID and cannot be decoded here.
    pub fn from_bytes(bytes: &[u8; 65]) -> Option<Self> {
        let y_parity = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            _ => return None,
        };
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        Some(Self {
            r: U256::from_be_bytes(r),
            s: U256::from_be_bytes(s),
            y_parity,
        })
    }
}
