//! zkSync EIP-712 transactions (`0x71`).
//!
//! The account signs EIP-712 typed data, not the serialized transaction,
//! and the result travels inside the field list as `customSignature`.
//! There are no trailing signature fields, so the descriptor is
//! [`SignatureScheme::Unsigned`] and the codec never computes a signing
//! hash for it.
//!
//! Wire order:
//! `[nonce, maxPriorityFeePerGas, maxFeePerGas, gas, to, value, data,
//! chainId, "", "", chainId, from, gasPerPubdata, factoryDeps,
//! customSignature, paymasterParams]`

use crate::fields::Field;
use crate::registry::{Registry, SignatureScheme, VariantDescriptor};
use txcodec_common::TxType;

pub static EIP712: VariantDescriptor = VariantDescriptor {
    name: "eip712",
    tx_type: TxType::EIP712,
    fields: &[
        Field::Nonce,
        Field::MaxPriorityFeePerGas,
        Field::MaxFeePerGas,
        Field::Gas,
        Field::To,
        Field::Value,
        Field::Data,
        Field::ChainId,
        Field::Reserved,
        Field::Reserved,
        Field::ChainId,
        Field::From,
        Field::GasPerPubdata,
        Field::FactoryDeps,
        Field::CustomSignature,
        Field::PaymasterParams,
    ],
    signature: SignatureScheme::Unsigned,
    blob_sidecars: false,
};

/// Ethereum variants plus EIP-712.
pub fn registry() -> Registry {
    let mut registry = Registry::ethereum();
    registry.insert(&EIP712);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeConfig;
    use crate::parse::TransactionParser;
    use crate::rlp::{self, RlpItem};
    use crate::serialize::serialize_transaction;
    use crate::signature::signing_hash;
    use txcodec_common::{Address, Bytes, CodecError, Signature, Transaction, U256};

    fn minimal() -> Transaction {
        Transaction {
            tx_type: TxType::EIP712,
            chain_id: Some(280),
            from: Address::repeat_byte(0xf7),
            ..Default::default()
        }
    }

    fn payload(tx_bytes: &[u8]) -> Vec<RlpItem> {
        let item = rlp::decode_exact(&tx_bytes[1..], &DecodeConfig::default()).unwrap();
        item.as_list().unwrap().to_vec()
    }

    #[test]
    fn test_chain_id_twice() {
        let out = serialize_transaction(&registry(), &minimal(), None).unwrap();
        assert_eq!(out[0], 0x71);

        let fields = payload(&out);
        assert_eq!(fields.len(), 16);
        assert_eq!(fields[7], RlpItem::from_u64(280));
        assert_eq!(fields[8], RlpItem::empty());
        assert_eq!(fields[9], RlpItem::empty());
        assert_eq!(fields[10], RlpItem::from_u64(280));
        // no paymaster
        assert_eq!(fields[15], RlpItem::List(vec![]));

        let parsed = TransactionParser::new(&registry(), DecodeConfig::default())
            .parse(&out)
            .unwrap();
        assert!(!parsed.is_signed());
        assert_eq!(parsed.transaction, minimal());
    }

    #[test]
    fn test_conflicting_chain_ids() {
        let out = serialize_transaction(&registry(), &minimal(), None).unwrap();
        let mut fields = payload(&out);
        fields[10] = RlpItem::from_u64(324);
        let mut data = vec![0x71];
        data.extend(rlp::encode(&RlpItem::List(fields)));

        assert_eq!(
            TransactionParser::new(&registry(), DecodeConfig::default()).parse(&data),
            Err(CodecError::invalid_field(
                "eip712",
                "chainId",
                "conflicting chain IDs"
            ))
        );
    }

    #[test]
    fn test_requires_chain_id() {
        let tx = Transaction {
            chain_id: None,
            ..minimal()
        };
        assert_eq!(
            serialize_transaction(&registry(), &tx, None),
            Err(CodecError::invalid_field("eip712", "chainId", "required"))
        );
    }

    #[test]
    fn test_signature_is_a_field() {
        let registry = registry();
        let tx = Transaction {
            custom_signature: Bytes::from(vec![0x59; 65]),
            ..minimal()
        };
        let sig = Signature::new(U256::from(1u64), U256::from(1u64), 0);
        assert!(matches!(
            serialize_transaction(&registry, &tx, Some(&sig)),
            Err(CodecError::InvalidFieldValue {
                field: "signature",
                ..
            })
        ));
        assert!(signing_hash(&registry, &tx).is_err());

        let out = serialize_transaction(&registry, &tx, None).unwrap();
        let parsed = TransactionParser::new(&registry, DecodeConfig::default())
            .parse(&out)
            .unwrap();
        assert_eq!(parsed.signature, None);
        assert_eq!(parsed.transaction.custom_signature, tx.custom_signature);
    }

    #[test]
    fn test_registry_contents() {
        let registry = registry();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.get(TxType::EIP712), Some(&EIP712));
        assert!(!registry.contains(TxType::DEPOSIT));
    }
}
