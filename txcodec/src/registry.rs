//! Transaction variant registry.
//!
//! A [`VariantDescriptor`] is an immutable record of one transaction
//! shape: its type, its ordered wire fields and how a signature is
//! attached. A [`Registry`] maps transaction types to descriptors. The
//! serializer and parser only ever look variants up here, so chain
//! modules add new shapes by registering descriptors.

use std::collections::BTreeMap;

use txcodec_common::{CodecError, TxType};

use crate::fields::Field;

/// How a signature is attached to the field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// Legacy `[v, r, s]` with EIP-155 folding of the chain ID into `v`.
    /// Unsigned EIP-155 transactions carry `[chainId, "", ""]` instead.
    Eip155,
    /// `[yParity, r, s]`.
    YParity,
    /// The variant never carries a signature.
    Unsigned,
}

/// Immutable description of one transaction variant.
#[derive(Debug, PartialEq, Eq)]
pub struct VariantDescriptor {
    /// Short name used in logs and errors.
    pub name: &'static str,
    pub tx_type: TxType,
    /// Ordered fields of the unsigned form.
    pub fields: &'static [Field],
    pub signature: SignatureScheme,
    /// Whether the EIP-4844 network wrapper (blob sidecars) is allowed.
    pub blob_sidecars: bool,
}

/// Number of fields a signature appends.
pub const SIGNATURE_FIELDS: usize = 3;

impl VariantDescriptor {
    /// Element counts a decoded field list may have, unsigned shape first.
    pub fn expected_arities(&self) -> Vec<usize> {
        let n = self.fields.len();
        match self.signature {
            SignatureScheme::Eip155 | SignatureScheme::YParity => vec![n, n + SIGNATURE_FIELDS],
            SignatureScheme::Unsigned => vec![n],
        }
    }

    /// Returns true if `count` elements carry trailing signature fields.
    pub fn has_signature_fields(&self, count: usize) -> bool {
        self.signature != SignatureScheme::Unsigned
            && count == self.fields.len() + SIGNATURE_FIELDS
    }
}

// =============================================================================
// Ethereum variants
// =============================================================================

pub static LEGACY: VariantDescriptor = VariantDescriptor {
    name: "legacy",
    tx_type: TxType::Legacy,
    fields: &[
        Field::Nonce,
        Field::GasPrice,
        Field::Gas,
        Field::To,
        Field::Value,
        Field::Data,
    ],
    signature: SignatureScheme::Eip155,
    blob_sidecars: false,
};

pub static EIP2930: VariantDescriptor = VariantDescriptor {
    name: "eip2930",
    tx_type: TxType::EIP2930,
    fields: &[
        Field::ChainId,
        Field::Nonce,
        Field::GasPrice,
        Field::Gas,
        Field::To,
        Field::Value,
        Field::Data,
        Field::AccessList,
    ],
    signature: SignatureScheme::YParity,
    blob_sidecars: false,
};

pub static EIP1559: VariantDescriptor = VariantDescriptor {
    name: "eip1559",
    tx_type: TxType::EIP1559,
    fields: &[
        Field::ChainId,
        Field::Nonce,
        Field::MaxPriorityFeePerGas,
        Field::MaxFeePerGas,
        Field::Gas,
        Field::To,
        Field::Value,
        Field::Data,
        Field::AccessList,
    ],
    signature: SignatureScheme::YParity,
    blob_sidecars: false,
};

pub static EIP4844: VariantDescriptor = VariantDescriptor {
    name: "eip4844",
    tx_type: TxType::EIP4844,
    fields: &[
        Field::ChainId,
        Field::Nonce,
        Field::MaxPriorityFeePerGas,
        Field::MaxFeePerGas,
        Field::Gas,
        Field::To,
        Field::Value,
        Field::Data,
        Field::AccessList,
        Field::MaxFeePerBlobGas,
        Field::BlobVersionedHashes,
    ],
    signature: SignatureScheme::YParity,
    blob_sidecars: true,
};

pub static EIP7702: VariantDescriptor = VariantDescriptor {
    name: "eip7702",
    tx_type: TxType::EIP7702,
    fields: &[
        Field::ChainId,
        Field::Nonce,
        Field::MaxPriorityFeePerGas,
        Field::MaxFeePerGas,
        Field::Gas,
        Field::To,
        Field::Value,
        Field::Data,
        Field::AccessList,
        Field::AuthorizationList,
    ],
    signature: SignatureScheme::YParity,
    blob_sidecars: false,
};

// =============================================================================
// Registry
// =============================================================================

/// Map from transaction type to variant descriptor.
///
/// Build it once, then share it by reference; lookups never mutate.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    variants: BTreeMap<TxType, &'static VariantDescriptor>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Legacy, EIP-2930, EIP-1559, EIP-4844 and EIP-7702.
    pub fn ethereum() -> Self {
        let mut registry = Self::new();
        for variant in [&LEGACY, &EIP2930, &EIP1559, &EIP4844, &EIP7702] {
            registry.insert(variant);
        }
        registry
    }

    /// Registers a variant.
    ///
    /// Typed variants must use a tag in `[0x01, 0x7f]` so they cannot be
    /// confused with an RLP list prefix, and each type can be registered once.
    pub fn register(&mut self, variant: &'static VariantDescriptor) -> Result<(), CodecError> {
        if let TxType::Typed(tag) = variant.tx_type {
            if tag == 0 || tag > 0x7f {
                return Err(CodecError::InvalidTag { tag });
            }
        }
        if self.variants.contains_key(&variant.tx_type) {
            return Err(CodecError::DuplicateVariant {
                tx_type: variant.tx_type,
            });
        }
        self.insert(variant);
        Ok(())
    }

    /// Builder form of [`Registry::register`].
    pub fn with(mut self, variant: &'static VariantDescriptor) -> Result<Self, CodecError> {
        self.register(variant)?;
        Ok(self)
    }

    /// Adds a built-in variant whose tag is known to be valid.
    pub(crate) fn insert(&mut self, variant: &'static VariantDescriptor) {
        debug_assert!(variant.tx_type.tag().map_or(true, |tag| (0x01..=0x7f).contains(&tag)));
        log::debug!(
            "txcodec: registered {} variant ({})",
            variant.name,
            variant.tx_type
        );
        self.variants.insert(variant.tx_type, variant);
    }

    /// Looks up the descriptor for a type.
    pub fn get(&self, tx_type: TxType) -> Option<&'static VariantDescriptor> {
        self.variants.get(&tx_type).copied()
    }

    /// Looks up the descriptor for a type, failing with `UnsupportedVariant`.
    pub fn resolve(&self, tx_type: TxType) -> Result<&'static VariantDescriptor, CodecError> {
        self.get(tx_type)
            .ok_or(CodecError::UnsupportedVariant { tx_type })
    }

    pub fn contains(&self, tx_type: TxType) -> bool {
        self.variants.contains_key(&tx_type)
    }

    /// Registered variants, legacy first, then by tag.
    pub fn variants(&self) -> impl Iterator<Item = &'static VariantDescriptor> + '_ {
        self.variants.values().copied()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CUSTOM: VariantDescriptor = VariantDescriptor {
        name: "custom",
        tx_type: TxType::Typed(0x42),
        fields: &[Field::ChainId, Field::Nonce, Field::Data],
        signature: SignatureScheme::YParity,
        blob_sidecars: false,
    };

    static LIST_PREFIX: VariantDescriptor = VariantDescriptor {
        name: "list-prefix",
        tx_type: TxType::Typed(0xc0),
        fields: &[Field::Nonce],
        signature: SignatureScheme::Unsigned,
        blob_sidecars: false,
    };

    #[test]
    fn test_ethereum_registry() {
        let registry = Registry::ethereum();
        assert_eq!(registry.len(), 5);
        let names: Vec<_> = registry.variants().map(|v| v.name).collect();
        assert_eq!(
            names,
            ["legacy", "eip2930", "eip1559", "eip4844", "eip7702"]
        );
        assert!(registry.contains(TxType::Legacy));
        assert!(!registry.contains(TxType::DEPOSIT));
    }

    #[test]
    fn test_arities() {
        assert_eq!(LEGACY.expected_arities(), vec![6, 9]);
        assert_eq!(EIP2930.expected_arities(), vec![8, 11]);
        assert_eq!(EIP1559.expected_arities(), vec![9, 12]);
        assert_eq!(EIP4844.expected_arities(), vec![11, 14]);
        assert_eq!(EIP7702.expected_arities(), vec![10, 13]);
        assert!(EIP1559.has_signature_fields(12));
        assert!(!EIP1559.has_signature_fields(9));
    }

    #[test]
    fn test_register() {
        let mut registry = Registry::ethereum();
        registry.register(&CUSTOM).unwrap();
        assert_eq!(registry.get(TxType::Typed(0x42)), Some(&CUSTOM));

        assert_eq!(
            registry.register(&CUSTOM),
            Err(CodecError::DuplicateVariant {
                tx_type: TxType::Typed(0x42)
            })
        );
        assert_eq!(
            registry.register(&EIP1559),
            Err(CodecError::DuplicateVariant {
                tx_type: TxType::EIP1559
            })
        );
        assert_eq!(
            Registry::new().register(&LIST_PREFIX),
            Err(CodecError::InvalidTag { tag: 0xc0 })
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = Registry::new().with(&CUSTOM).unwrap();
        assert!(registry.resolve(TxType::Typed(0x42)).is_ok());
        assert_eq!(
            registry.resolve(TxType::Legacy),
            Err(CodecError::UnsupportedVariant {
                tx_type: TxType::Legacy
            })
        );
    }
}
