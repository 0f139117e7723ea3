//! Transaction field model.
//!
//! Every wire field a variant can carry is a [`Field`]. Each field has one
//! [`FieldRule`], and each rule states what an empty byte string means on
//! the wire ([`EmptyMeaning`]). Encoding and decoding never guess: a
//! zero gas price and a missing recipient are both `0x80`, but only
//! because their rules say so.

use txcodec_common::{
    AccessListItem, Address, Bytes, CodecError, PaymasterParams, RlpError, SignedAuthorization,
    Transaction, B256, U256,
};

use crate::rlp::RlpItem;

/// A wire field of some transaction variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ChainId,
    Nonce,
    GasPrice,
    MaxPriorityFeePerGas,
    MaxFeePerGas,
    Gas,
    To,
    Value,
    Data,
    AccessList,
    MaxFeePerBlobGas,
    BlobVersionedHashes,
    AuthorizationList,
    SourceHash,
    From,
    Mint,
    IsSystemTx,
    FeeCurrency,
    GatewayFeeRecipient,
    GatewayFee,
    GasPerPubdata,
    FactoryDeps,
    CustomSignature,
    PaymasterParams,
    /// Slot that is always the empty string.
    Reserved,
}

/// Encode/decode rule of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Chain ID; must be set to serialize.
    ChainId,
    /// Integer that fits in 64 bits.
    Quantity64,
    /// 256-bit integer.
    Quantity,
    /// 20-byte address, or nothing.
    OptionalAddress,
    /// 20-byte address.
    Address,
    /// 32-byte hash.
    Hash,
    /// Opaque bytes.
    Data,
    /// Boolean as `0x80` / `0x01`.
    Flag,
    /// List of `[address, [slot, ...]]`.
    AccessList,
    /// List of `[chainId, address, nonce, yParity, r, s]`.
    AuthorizationList,
    /// List of 32-byte hashes.
    HashList,
    /// List of opaque byte strings.
    BytesList,
    /// `[]` or `[paymaster, paymasterInput]`.
    PaymasterParams,
    /// Always the empty string.
    Placeholder,
}

/// What an empty byte string stands for under a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyMeaning {
    /// Numeric zero.
    Zero,
    /// The field is absent.
    Absent,
    /// A present but empty payload.
    EmptyPayload,
    /// Boolean false.
    False,
    /// Not a valid value for this field.
    Rejected,
}

/// A field value, detached from its slot in a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Absent,
    U64(u64),
    U256(U256),
    Address(Address),
    Hash(B256),
    Bytes(Bytes),
    Flag(bool),
    AccessList(Vec<AccessListItem>),
    AuthorizationList(Vec<SignedAuthorization>),
    HashList(Vec<B256>),
    BytesList(Vec<Bytes>),
    Paymaster(PaymasterParams),
}

const RULE_MISMATCH: &str = "value does not match field rule";

impl FieldRule {
    pub const ALL: [FieldRule; 14] = [
        FieldRule::ChainId,
        FieldRule::Quantity64,
        FieldRule::Quantity,
        FieldRule::OptionalAddress,
        FieldRule::Address,
        FieldRule::Hash,
        FieldRule::Data,
        FieldRule::Flag,
        FieldRule::AccessList,
        FieldRule::AuthorizationList,
        FieldRule::HashList,
        FieldRule::BytesList,
        FieldRule::PaymasterParams,
        FieldRule::Placeholder,
    ];

    pub const fn empty_meaning(self) -> EmptyMeaning {
        match self {
            FieldRule::ChainId | FieldRule::Quantity64 | FieldRule::Quantity => EmptyMeaning::Zero,
            FieldRule::OptionalAddress | FieldRule::Placeholder => EmptyMeaning::Absent,
            FieldRule::Data => EmptyMeaning::EmptyPayload,
            FieldRule::Flag => EmptyMeaning::False,
            FieldRule::Address
            | FieldRule::Hash
            | FieldRule::AccessList
            | FieldRule::AuthorizationList
            | FieldRule::HashList
            | FieldRule::BytesList
            | FieldRule::PaymasterParams => EmptyMeaning::Rejected,
        }
    }

    /// The value an empty byte string decodes to, `None` if rejected.
    pub fn empty_value(self) -> Option<FieldValue> {
        match self.empty_meaning() {
            EmptyMeaning::Zero if self == FieldRule::Quantity => Some(FieldValue::U256(U256::ZERO)),
            EmptyMeaning::Zero => Some(FieldValue::U64(0)),
            EmptyMeaning::Absent => Some(FieldValue::Absent),
            EmptyMeaning::EmptyPayload => Some(FieldValue::Bytes(Bytes::new())),
            EmptyMeaning::False => Some(FieldValue::Flag(false)),
            EmptyMeaning::Rejected => None,
        }
    }

    /// Encodes `value` under this rule.
    ///
    /// Values equal to [`FieldRule::empty_value`] become the empty string.
    pub fn encode(self, value: FieldValue) -> Result<RlpItem, &'static str> {
        if self.empty_value().as_ref() == Some(&value) {
            return Ok(RlpItem::empty());
        }
        let item = match (self, value) {
            (FieldRule::ChainId, FieldValue::Absent) => return Err("required"),
            (FieldRule::ChainId | FieldRule::Quantity64, FieldValue::U64(v)) => {
                RlpItem::from_u64(v)
            }
            (FieldRule::Quantity, FieldValue::U256(v)) => RlpItem::from_u256(&v),
            (FieldRule::OptionalAddress | FieldRule::Address, FieldValue::Address(address)) => {
                RlpItem::string(address.as_slice())
            }
            (FieldRule::Hash, FieldValue::Hash(hash)) => RlpItem::string(hash.as_slice()),
            (FieldRule::Data, FieldValue::Bytes(data)) => RlpItem::string(data.to_vec()),
            (FieldRule::Flag, FieldValue::Flag(true)) => RlpItem::string(vec![0x01]),
            (FieldRule::AccessList, FieldValue::AccessList(list)) => encode_access_list(&list),
            (FieldRule::AuthorizationList, FieldValue::AuthorizationList(list)) => {
                encode_authorization_list(&list)
            }
            (FieldRule::HashList, FieldValue::HashList(hashes)) => RlpItem::List(
                hashes
                    .iter()
                    .map(|hash| RlpItem::string(hash.as_slice()))
                    .collect(),
            ),
            (FieldRule::BytesList, FieldValue::BytesList(items)) => RlpItem::List(
                items
                    .iter()
                    .map(|item| RlpItem::string(item.to_vec()))
                    .collect(),
            ),
            (FieldRule::PaymasterParams, FieldValue::Absent) => RlpItem::List(vec![]),
            (FieldRule::PaymasterParams, FieldValue::Paymaster(params)) => RlpItem::List(vec![
                RlpItem::string(params.paymaster.as_slice()),
                RlpItem::string(params.paymaster_input.to_vec()),
            ]),
            _ => return Err(RULE_MISMATCH),
        };
        Ok(item)
    }

    /// Decodes `item` under this rule.
    ///
    /// An empty byte string is resolved by [`FieldRule::empty_meaning`]
    /// alone; the typed readers only ever see non-empty strings and lists.
    pub fn decode(
        self,
        item: &RlpItem,
        dec: &FieldDecoder,
        field: &'static str,
    ) -> Result<FieldValue, CodecError> {
        if item.as_string().is_some_and(<[u8]>::is_empty) {
            return self
                .empty_value()
                .ok_or_else(|| dec.invalid(field, "must not be empty"));
        }
        let value = match self {
            FieldRule::ChainId | FieldRule::Quantity64 => FieldValue::U64(dec.u64(field, item)?),
            FieldRule::Quantity => FieldValue::U256(dec.u256(field, item)?),
            FieldRule::OptionalAddress | FieldRule::Address => {
                FieldValue::Address(dec.address(field, item)?)
            }
            FieldRule::Hash => FieldValue::Hash(dec.hash(field, item)?),
            FieldRule::Data => FieldValue::Bytes(Bytes::copy_from_slice(dec.bytes(field, item)?)),
            FieldRule::Flag => FieldValue::Flag(dec.flag(field, item)?),
            FieldRule::AccessList => FieldValue::AccessList(dec.access_list(field, item)?),
            FieldRule::AuthorizationList => {
                FieldValue::AuthorizationList(dec.authorization_list(field, item)?)
            }
            FieldRule::HashList => FieldValue::HashList(dec.hash_list(field, item)?),
            FieldRule::BytesList => FieldValue::BytesList(dec.bytes_list(field, item)?),
            FieldRule::PaymasterParams => dec
                .paymaster(field, item)?
                .map_or(FieldValue::Absent, FieldValue::Paymaster),
            FieldRule::Placeholder => return Err(dec.invalid(field, "must be empty")),
        };
        Ok(value)
    }
}

impl FieldValue {
    fn optional_address(self) -> Result<Option<Address>, &'static str> {
        match self {
            FieldValue::Absent => Ok(None),
            FieldValue::Address(address) => Ok(Some(address)),
            _ => Err(RULE_MISMATCH),
        }
    }
}

impl Field {
    /// Field name as used in JSON and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Field::ChainId => "chainId",
            Field::Nonce => "nonce",
            Field::GasPrice => "gasPrice",
            Field::MaxPriorityFeePerGas => "maxPriorityFeePerGas",
            Field::MaxFeePerGas => "maxFeePerGas",
            Field::Gas => "gas",
            Field::To => "to",
            Field::Value => "value",
            Field::Data => "data",
            Field::AccessList => "accessList",
            Field::MaxFeePerBlobGas => "maxFeePerBlobGas",
            Field::BlobVersionedHashes => "blobVersionedHashes",
            Field::AuthorizationList => "authorizationList",
            Field::SourceHash => "sourceHash",
            Field::From => "from",
            Field::Mint => "mint",
            Field::IsSystemTx => "isSystemTx",
            Field::FeeCurrency => "feeCurrency",
            Field::GatewayFeeRecipient => "gatewayFeeRecipient",
            Field::GatewayFee => "gatewayFee",
            Field::GasPerPubdata => "gasPerPubdata",
            Field::FactoryDeps => "factoryDeps",
            Field::CustomSignature => "customSignature",
            Field::PaymasterParams => "paymasterParams",
            Field::Reserved => "reserved",
        }
    }

    pub const fn rule(self) -> FieldRule {
        match self {
            Field::ChainId => FieldRule::ChainId,
            Field::Nonce | Field::Gas => FieldRule::Quantity64,
            Field::GasPrice
            | Field::MaxPriorityFeePerGas
            | Field::MaxFeePerGas
            | Field::Value
            | Field::MaxFeePerBlobGas
            | Field::Mint
            | Field::GatewayFee
            | Field::GasPerPubdata => FieldRule::Quantity,
            Field::To | Field::FeeCurrency | Field::GatewayFeeRecipient => {
                FieldRule::OptionalAddress
            }
            Field::From => FieldRule::Address,
            Field::SourceHash => FieldRule::Hash,
            Field::Data | Field::CustomSignature => FieldRule::Data,
            Field::IsSystemTx => FieldRule::Flag,
            Field::AccessList => FieldRule::AccessList,
            Field::AuthorizationList => FieldRule::AuthorizationList,
            Field::BlobVersionedHashes => FieldRule::HashList,
            Field::FactoryDeps => FieldRule::BytesList,
            Field::PaymasterParams => FieldRule::PaymasterParams,
            Field::Reserved => FieldRule::Placeholder,
        }
    }

    /// Reads this field's slot of `tx`.
    pub fn value(self, tx: &Transaction) -> FieldValue {
        match self {
            Field::ChainId => tx.chain_id.map_or(FieldValue::Absent, FieldValue::U64),
            Field::Nonce => FieldValue::U64(tx.nonce),
            Field::Gas => FieldValue::U64(tx.gas),
            Field::GasPrice => FieldValue::U256(tx.gas_price),
            Field::MaxPriorityFeePerGas => FieldValue::U256(tx.max_priority_fee_per_gas),
            Field::MaxFeePerGas => FieldValue::U256(tx.max_fee_per_gas),
            Field::Value => FieldValue::U256(tx.value),
            Field::MaxFeePerBlobGas => FieldValue::U256(tx.max_fee_per_blob_gas),
            Field::Mint => FieldValue::U256(tx.mint),
            Field::GatewayFee => FieldValue::U256(tx.gateway_fee),
            Field::GasPerPubdata => FieldValue::U256(tx.gas_per_pubdata),
            Field::To => tx.to.map_or(FieldValue::Absent, FieldValue::Address),
            Field::FeeCurrency => tx.fee_currency.map_or(FieldValue::Absent, FieldValue::Address),
            Field::GatewayFeeRecipient => tx
                .gateway_fee_recipient
                .map_or(FieldValue::Absent, FieldValue::Address),
            Field::From => FieldValue::Address(tx.from),
            Field::SourceHash => FieldValue::Hash(tx.source_hash),
            Field::Data => FieldValue::Bytes(tx.data.clone()),
            Field::CustomSignature => FieldValue::Bytes(tx.custom_signature.clone()),
            Field::IsSystemTx => FieldValue::Flag(tx.is_system_tx),
            Field::AccessList => FieldValue::AccessList(tx.access_list.clone()),
            Field::AuthorizationList => {
                FieldValue::AuthorizationList(tx.authorization_list.clone())
            }
            Field::BlobVersionedHashes => FieldValue::HashList(tx.blob_versioned_hashes.clone()),
            Field::FactoryDeps => FieldValue::BytesList(tx.factory_deps.clone()),
            Field::PaymasterParams => tx
                .paymaster
                .clone()
                .map_or(FieldValue::Absent, FieldValue::Paymaster),
            Field::Reserved => FieldValue::Absent,
        }
    }

    /// Stores `value` in this field's slot of `tx`.
    ///
    /// A chain ID that appears twice in one variant must agree with itself.
    pub fn assign(self, tx: &mut Transaction, value: FieldValue) -> Result<(), &'static str> {
        match (self, value) {
            (Field::ChainId, FieldValue::U64(id)) => match tx.chain_id {
                Some(prev) if prev != id => return Err("conflicting chain IDs"),
                _ => tx.chain_id = Some(id),
            },
            (Field::Nonce, FieldValue::U64(v)) => tx.nonce = v,
            (Field::Gas, FieldValue::U64(v)) => tx.gas = v,
            (Field::GasPrice, FieldValue::U256(v)) => tx.gas_price = v,
            (Field::MaxPriorityFeePerGas, FieldValue::U256(v)) => tx.max_priority_fee_per_gas = v,
            (Field::MaxFeePerGas, FieldValue::U256(v)) => tx.max_fee_per_gas = v,
            (Field::Value, FieldValue::U256(v)) => tx.value = v,
            (Field::MaxFeePerBlobGas, FieldValue::U256(v)) => tx.max_fee_per_blob_gas = v,
            (Field::Mint, FieldValue::U256(v)) => tx.mint = v,
            (Field::GatewayFee, FieldValue::U256(v)) => tx.gateway_fee = v,
            (Field::GasPerPubdata, FieldValue::U256(v)) => tx.gas_per_pubdata = v,
            (Field::To, value) => tx.to = value.optional_address()?,
            (Field::FeeCurrency, value) => tx.fee_currency = value.optional_address()?,
            (Field::GatewayFeeRecipient, value) => {
                tx.gateway_fee_recipient = value.optional_address()?
            }
            (Field::From, FieldValue::Address(address)) => tx.from = address,
            (Field::SourceHash, FieldValue::Hash(hash)) => tx.source_hash = hash,
            (Field::Data, FieldValue::Bytes(data)) => tx.data = data,
            (Field::CustomSignature, FieldValue::Bytes(data)) => tx.custom_signature = data,
            (Field::IsSystemTx, FieldValue::Flag(flag)) => tx.is_system_tx = flag,
            (Field::AccessList, FieldValue::AccessList(list)) => tx.access_list = list,
            (Field::AuthorizationList, FieldValue::AuthorizationList(list)) => {
                tx.authorization_list = list
            }
            (Field::BlobVersionedHashes, FieldValue::HashList(hashes)) => {
                tx.blob_versioned_hashes = hashes
            }
            (Field::FactoryDeps, FieldValue::BytesList(deps)) => tx.factory_deps = deps,
            (Field::PaymasterParams, FieldValue::Absent) => tx.paymaster = None,
            (Field::PaymasterParams, FieldValue::Paymaster(params)) => tx.paymaster = Some(params),
            (Field::Reserved, FieldValue::Absent) => {}
            _ => return Err(RULE_MISMATCH),
        }
        Ok(())
    }

    /// Encodes this field of `tx` under its rule.
    pub fn encode(self, tx: &Transaction, variant: &'static str) -> Result<RlpItem, CodecError> {
        self.rule()
            .encode(self.value(tx))
            .map_err(|reason| CodecError::invalid_field(variant, self.name(), reason))
    }

    /// Decodes `item` under this field's rule into its slot of `tx`.
    pub fn decode(
        self,
        item: &RlpItem,
        tx: &mut Transaction,
        dec: &FieldDecoder,
    ) -> Result<(), CodecError> {
        let value = self.rule().decode(item, dec, self.name())?;
        self.assign(tx, value)
            .map_err(|reason| dec.invalid(self.name(), reason))
    }
}

// =============================================================================
// Encoding helpers
// =============================================================================

fn encode_optional_address(address: Option<&Address>) -> RlpItem {
    match address {
        Some(address) => RlpItem::string(address.as_slice()),
        None => RlpItem::empty(),
    }
}

fn encode_access_list(list: &[AccessListItem]) -> RlpItem {
    RlpItem::List(
        list.iter()
            .map(|entry| {
                RlpItem::List(vec![
                    RlpItem::string(entry.address.as_slice()),
                    RlpItem::List(
                        entry
                            .storage_keys
                            .iter()
                            .map(|key| RlpItem::string(key.as_slice()))
                            .collect(),
                    ),
                ])
            })
            .collect(),
    )
}

fn encode_authorization_list(list: &[SignedAuthorization]) -> RlpItem {
    RlpItem::List(
        list.iter()
            .map(|auth| {
                RlpItem::List(vec![
                    RlpItem::from_u64(auth.chain_id),
                    RlpItem::string(auth.address.as_slice()),
                    RlpItem::from_u64(auth.nonce),
                    RlpItem::from_u64(auth.y_parity.into()),
                    RlpItem::from_u256(&auth.r),
                    RlpItem::from_u256(&auth.s),
                ])
            })
            .collect(),
    )
}

// =============================================================================
// Decoding helpers
// =============================================================================

/// Typed readers over decoded RLP items.
///
/// Errors name the variant and field being read. In strict mode integers
/// with leading zero bytes are rejected; otherwise they are accepted.
#[derive(Debug, Clone, Copy)]
pub struct FieldDecoder {
    pub variant: &'static str,
    pub strict: bool,
}

impl FieldDecoder {
    pub fn new(variant: &'static str, strict: bool) -> Self {
        Self { variant, strict }
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> CodecError {
        CodecError::invalid_field(self.variant, field, reason)
    }

    /// Reads a byte string.
    pub fn bytes<'a>(
        &self,
        field: &'static str,
        item: &'a RlpItem,
    ) -> Result<&'a [u8], CodecError> {
        item.as_string()
            .ok_or_else(|| self.invalid(field, "expected byte string, found list"))
    }

    /// Reads a list.
    pub fn list<'a>(
        &self,
        field: &'static str,
        item: &'a RlpItem,
    ) -> Result<&'a [RlpItem], CodecError> {
        item.as_list()
            .ok_or_else(|| self.invalid(field, "expected list, found byte string"))
    }

    /// Reads a big-endian integer, returning its significant bytes.
    fn integer<'a>(
        &self,
        field: &'static str,
        item: &'a RlpItem,
    ) -> Result<&'a [u8], CodecError> {
        let data = self.bytes(field, item)?;
        let start = data.iter().position(|&b| b != 0).unwrap_or(data.len());
        if start > 0 && self.strict {
            return Err(CodecError::MalformedEncoding(RlpError::NonCanonical(
                "integer has leading zero bytes",
            )));
        }
        Ok(&data[start..])
    }

    pub fn u64(&self, field: &'static str, item: &RlpItem) -> Result<u64, CodecError> {
        let data = self.integer(field, item)?;
        if data.len() > 8 {
            return Err(self.invalid(field, "does not fit in 64 bits"));
        }
        Ok(data.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    pub fn u256(&self, field: &'static str, item: &RlpItem) -> Result<U256, CodecError> {
        let data = self.integer(field, item)?;
        U256::try_from_be_slice(data)
            .ok_or_else(|| self.invalid(field, "does not fit in 256 bits"))
    }

    /// Reads a 0/1 recovery parity.
    pub fn y_parity(&self, field: &'static str, item: &RlpItem) -> Result<u8, CodecError> {
        match self.u64(field, item)? {
            y @ (0 | 1) => Ok(y as u8),
            y => Err(self.invalid(field, format!("must be 0 or 1, got {y}"))),
        }
    }

    pub fn flag(&self, field: &'static str, item: &RlpItem) -> Result<bool, CodecError> {
        match self.u64(field, item)? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(self.invalid(field, format!("must be 0 or 1, got {v}"))),
        }
    }

    pub fn address(&self, field: &'static str, item: &RlpItem) -> Result<Address, CodecError> {
        let data = self.bytes(field, item)?;
        if data.len() != 20 {
            return Err(self.invalid(field, format!("expected 20 bytes, got {}", data.len())));
        }
        Ok(Address::from_slice(data))
    }

    /// Reads an address where the empty string means "absent".
    pub fn optional_address(
        &self,
        field: &'static str,
        item: &RlpItem,
    ) -> Result<Option<Address>, CodecError> {
        if self.bytes(field, item)?.is_empty() {
            return Ok(None);
        }
        self.address(field, item).map(Some)
    }

    pub fn hash(&self, field: &'static str, item: &RlpItem) -> Result<B256, CodecError> {
        let data = self.bytes(field, item)?;
        if data.len() != 32 {
            return Err(self.invalid(field, format!("expected 32 bytes, got {}", data.len())));
        }
        Ok(B256::from_slice(data))
    }

    pub fn hash_list(
        &self,
        field: &'static str,
        item: &RlpItem,
    ) -> Result<Vec<B256>, CodecError> {
        self.list(field, item)?
            .iter()
            .map(|hash| self.hash(field, hash))
            .collect()
    }

    pub fn bytes_list(
        &self,
        field: &'static str,
        item: &RlpItem,
    ) -> Result<Vec<Bytes>, CodecError> {
        self.list(field, item)?
            .iter()
            .map(|entry| self.bytes(field, entry).map(Bytes::copy_from_slice))
            .collect()
    }

    /// Reads `[]` or `[paymaster, paymasterInput]`.
    pub fn paymaster(
        &self,
        field: &'static str,
        item: &RlpItem,
    ) -> Result<Option<PaymasterParams>, CodecError> {
        match self.list(field, item)? {
            [] => Ok(None),
            [paymaster, input] => Ok(Some(PaymasterParams {
                paymaster: self.address(field, paymaster)?,
                paymaster_input: Bytes::copy_from_slice(self.bytes(field, input)?),
            })),
            _ => Err(self.invalid(field, "must be [] or [paymaster, paymasterInput]")),
        }
    }

    pub fn access_list(
        &self,
        field: &'static str,
        item: &RlpItem,
    ) -> Result<Vec<AccessListItem>, CodecError> {
        self.list(field, item)?
            .iter()
            .map(|entry| {
                let [address, keys] = self.list(field, entry)? else {
                    return Err(self.invalid(field, "entry must be [address, storageKeys]"));
                };
                Ok(AccessListItem {
                    address: self.address(field, address)?,
                    storage_keys: self.hash_list(field, keys)?,
                })
            })
            .collect()
    }

    pub fn authorization_list(
        &self,
        field: &'static str,
        item: &RlpItem,
    ) -> Result<Vec<SignedAuthorization>, CodecError> {
        self.list(field, item)?
            .iter()
            .map(|entry| {
                let [chain_id, address, nonce, y_parity, r, s] = self.list(field, entry)? else {
                    return Err(self.invalid(
                        field,
                        "entry must be [chainId, address, nonce, yParity, r, s]",
                    ));
                };
                Ok(SignedAuthorization {
                    chain_id: self.u64(field, chain_id)?,
                    address: self.address(field, address)?,
                    nonce: self.u64(field, nonce)?,
                    y_parity: self.y_parity(field, y_parity)?,
                    r: self.u256(field, r)?,
                    s: self.u256(field, s)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txcodec_common::TxType;

    fn lenient() -> FieldDecoder {
        FieldDecoder::new("test", false)
    }

    #[test]
    fn test_every_rule_declares_empty_meaning() {
        assert_eq!(Field::Gas.rule().empty_meaning(), EmptyMeaning::Zero);
        assert_eq!(Field::To.rule().empty_meaning(), EmptyMeaning::Absent);
        assert_eq!(Field::FeeCurrency.rule().empty_meaning(), EmptyMeaning::Absent);
        assert_eq!(Field::Data.rule().empty_meaning(), EmptyMeaning::EmptyPayload);
        assert_eq!(Field::IsSystemTx.rule().empty_meaning(), EmptyMeaning::False);
        assert_eq!(Field::From.rule().empty_meaning(), EmptyMeaning::Rejected);
        assert_eq!(Field::SourceHash.rule().empty_meaning(), EmptyMeaning::Rejected);
        assert_eq!(Field::Reserved.rule().empty_meaning(), EmptyMeaning::Absent);
    }

    #[test]
    fn test_empty_string_follows_declared_meaning() {
        let empty = RlpItem::empty();
        for rule in FieldRule::ALL {
            let decoded = rule.decode(&empty, &lenient(), "field").ok();
            assert_eq!(decoded, rule.empty_value(), "{rule:?}");
            assert_eq!(
                decoded.is_none(),
                rule.empty_meaning() == EmptyMeaning::Rejected,
                "{rule:?}"
            );
            if let Some(value) = decoded {
                assert_eq!(rule.encode(value), Ok(RlpItem::empty()), "{rule:?}");
            }
        }
    }

    #[test]
    fn test_rule_decides_empty_string() {
        // the same empty string, read under different rules
        let empty = RlpItem::empty();
        let dec = lenient();
        assert_eq!(
            FieldRule::OptionalAddress.decode(&empty, &dec, "to"),
            Ok(FieldValue::Absent)
        );
        assert_eq!(
            FieldRule::Address.decode(&empty, &dec, "to"),
            Err(CodecError::invalid_field("test", "to", "must not be empty"))
        );
        assert_eq!(
            FieldRule::Quantity.decode(&empty, &dec, "to"),
            Ok(FieldValue::U256(U256::ZERO))
        );
        assert_eq!(
            FieldRule::Data.decode(&empty, &dec, "to"),
            Ok(FieldValue::Bytes(Bytes::new()))
        );
        assert_eq!(
            FieldRule::Flag.decode(&empty, &dec, "to"),
            Ok(FieldValue::Flag(false))
        );
    }

    #[test]
    fn test_rule_mismatch() {
        assert_eq!(
            FieldRule::Quantity.encode(FieldValue::Flag(true)),
            Err(RULE_MISMATCH)
        );
        let mut tx = Transaction::new(TxType::Legacy);
        assert_eq!(
            Field::Nonce.assign(&mut tx, FieldValue::Absent),
            Err(RULE_MISMATCH)
        );
    }

    #[test]
    fn test_repeated_chain_id() {
        let mut tx = Transaction::new(TxType::EIP712);
        Field::ChainId.decode(&RlpItem::from_u64(280), &mut tx, &lenient()).unwrap();
        Field::ChainId.decode(&RlpItem::from_u64(280), &mut tx, &lenient()).unwrap();
        assert_eq!(tx.chain_id, Some(280));
        assert_eq!(
            Field::ChainId.decode(&RlpItem::from_u64(1), &mut tx, &lenient()),
            Err(CodecError::invalid_field("test", "chainId", "conflicting chain IDs"))
        );
    }

    #[test]
    fn test_reserved_must_be_empty() {
        let mut tx = Transaction::new(TxType::EIP712);
        Field::Reserved.decode(&RlpItem::empty(), &mut tx, &lenient()).unwrap();
        assert_eq!(
            Field::Reserved.decode(&RlpItem::from_u64(1), &mut tx, &lenient()),
            Err(CodecError::invalid_field("test", "reserved", "must be empty"))
        );
        assert_eq!(Field::Reserved.encode(&tx, "test"), Ok(RlpItem::empty()));
    }

    #[test]
    fn test_paymaster_params() {
        let params = PaymasterParams {
            paymaster: Address::repeat_byte(0x4b),
            paymaster_input: Bytes::from(vec![0x8c, 0x5a]),
        };
        let mut tx = Transaction::new(TxType::EIP712);
        assert_eq!(
            Field::PaymasterParams.encode(&tx, "test"),
            Ok(RlpItem::List(vec![]))
        );

        tx.paymaster = Some(params.clone());
        let item = Field::PaymasterParams.encode(&tx, "test").unwrap();
        let mut back = Transaction::new(TxType::EIP712);
        Field::PaymasterParams.decode(&item, &mut back, &lenient()).unwrap();
        assert_eq!(back.paymaster, Some(params));

        Field::PaymasterParams
            .decode(&RlpItem::List(vec![]), &mut back, &lenient())
            .unwrap();
        assert_eq!(back.paymaster, None);

        let short = RlpItem::List(vec![RlpItem::string(vec![0x4b; 20])]);
        assert!(Field::PaymasterParams.decode(&short, &mut back, &lenient()).is_err());
        assert!(Field::PaymasterParams
            .decode(&RlpItem::empty(), &mut back, &lenient())
            .is_err());
    }

    #[test]
    fn test_factory_deps() {
        let mut tx = Transaction::new(TxType::EIP712);
        tx.factory_deps = vec![Bytes::from(vec![0x60, 0x80]), Bytes::new()];
        let item = Field::FactoryDeps.encode(&tx, "test").unwrap();
        assert_eq!(
            item,
            RlpItem::List(vec![RlpItem::string(vec![0x60, 0x80]), RlpItem::empty()])
        );
        let mut back = Transaction::new(TxType::EIP712);
        Field::FactoryDeps.decode(&item, &mut back, &lenient()).unwrap();
        assert_eq!(back.factory_deps, tx.factory_deps);
    }

    #[test]
    fn test_empty_string_per_rule() {
        let empty = RlpItem::empty();
        let mut tx = Transaction::new(TxType::Legacy);
        tx.gas = 7;
        tx.to = Some(Address::repeat_byte(0x11));
        tx.is_system_tx = true;

        Field::Gas.decode(&empty, &mut tx, &lenient()).unwrap();
        Field::To.decode(&empty, &mut tx, &lenient()).unwrap();
        Field::IsSystemTx.decode(&empty, &mut tx, &lenient()).unwrap();
        assert_eq!(tx.gas, 0);
        assert_eq!(tx.to, None);
        assert!(!tx.is_system_tx);

        assert!(matches!(
            Field::From.decode(&empty, &mut tx, &lenient()),
            Err(CodecError::InvalidFieldValue { field: "from", .. })
        ));
        assert!(matches!(
            Field::AccessList.decode(&empty, &mut tx, &lenient()),
            Err(CodecError::InvalidFieldValue { field: "accessList", .. })
        ));
    }

    #[test]
    fn test_address_width() {
        let short = RlpItem::string(vec![0x11; 19]);
        let err = lenient().address("to", &short).unwrap_err();
        assert_eq!(
            err,
            CodecError::invalid_field("test", "to", "expected 20 bytes, got 19")
        );
        assert!(lenient().optional_address("to", &RlpItem::string(vec![0x11; 21])).is_err());
        assert_eq!(
            lenient()
                .optional_address("to", &RlpItem::string(vec![0x11; 20]))
                .unwrap(),
            Some(Address::repeat_byte(0x11))
        );
    }

    #[test]
    fn test_integers() {
        let dec = lenient();
        assert_eq!(dec.u64("nonce", &RlpItem::from_u64(785)).unwrap(), 785);
        assert_eq!(dec.u64("nonce", &RlpItem::string(vec![0; 9])).unwrap(), 0);
        assert!(dec.u64("nonce", &RlpItem::string(vec![1; 9])).is_err());
        assert_eq!(
            dec.u256("value", &RlpItem::string(vec![0xff; 32])).unwrap(),
            U256::MAX
        );
        assert!(dec.u256("value", &RlpItem::string(vec![0x01; 33])).is_err());
        assert!(dec.u64("nonce", &RlpItem::List(vec![])).is_err());
    }

    #[test]
    fn test_strict_integers() {
        let padded = RlpItem::string(vec![0x00, 0x01]);
        assert_eq!(lenient().u64("nonce", &padded).unwrap(), 1);
        assert!(matches!(
            FieldDecoder::new("test", true).u64("nonce", &padded),
            Err(CodecError::MalformedEncoding(RlpError::NonCanonical(_)))
        ));
        // A bare 0x00 is a non-minimal zero
        assert!(FieldDecoder::new("test", true)
            .u64("nonce", &RlpItem::string(vec![0x00]))
            .is_err());
    }

    #[test]
    fn test_flag() {
        let dec = lenient();
        assert!(dec.flag("isSystemTx", &RlpItem::string(vec![0x01])).unwrap());
        assert!(!dec.flag("isSystemTx", &RlpItem::empty()).unwrap());
        assert!(dec.flag("isSystemTx", &RlpItem::string(vec![0x02])).is_err());
    }

    #[test]
    fn test_access_list_order() {
        let list = vec![
            AccessListItem {
                address: Address::repeat_byte(0x01),
                storage_keys: vec![B256::repeat_byte(0x0b), B256::repeat_byte(0x0a)],
            },
            AccessListItem {
                address: Address::repeat_byte(0x02),
                storage_keys: vec![],
            },
        ];
        let item = encode_access_list(&list);
        assert_eq!(lenient().access_list("accessList", &item).unwrap(), list);

        let bad = RlpItem::List(vec![RlpItem::List(vec![RlpItem::string(vec![0x01; 20])])]);
        assert!(lenient().access_list("accessList", &bad).is_err());
    }

    #[test]
    fn test_authorization_list() {
        let list = vec![SignedAuthorization {
            chain_id: 10,
            address: Address::ZERO,
            nonce: 69,
            y_parity: 1,
            r: U256::from(1u64),
            s: U256::from(2u64),
        }];
        let item = encode_authorization_list(&list);
        assert_eq!(
            lenient().authorization_list("authorizationList", &item).unwrap(),
            list
        );

        let RlpItem::List(mut entries) = item else {
            unreachable!()
        };
        let RlpItem::List(fields) = &mut entries[0] else {
            unreachable!()
        };
        fields[3] = RlpItem::from_u64(2);
        assert!(lenient()
            .authorization_list("authorizationList", &RlpItem::List(entries))
            .is_err());
    }

    #[test]
    fn test_missing_chain_id() {
        let tx = Transaction::new(TxType::EIP1559);
        assert_eq!(
            Field::ChainId.encode(&tx, "eip1559"),
            Err(CodecError::invalid_field("eip1559", "chainId", "required"))
        );
    }
}
